//! Formatted output helpers for CLI commands.

use std::fmt::Write;

use nsresolve_common::config::FilterConfig;
use nsresolve_common::types::ResolvedIdentity;

/// Renders a resolved identity as a two-line key/value table.
#[must_use]
pub fn identity_table(ifname: &str, identity: &ResolvedIdentity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<12} {:<12}", "IFNAME", "IFINDEX", "NETNS");
    let shown = if ifname.is_empty() { "-" } else { ifname };
    let _ = writeln!(
        out,
        "{:<10} {:<12} {:<12}",
        shown, identity.ifindex, identity.netns_id
    );
    out
}

/// Renders a filter configuration as one `key value` line per field.
#[must_use]
pub fn config_table(cfg: &FilterConfig) -> String {
    let rows: [(&str, u32); 10] = [
        ("filter_netns", cfg.filter_netns),
        ("filter_mark", cfg.filter_mark),
        ("filter_ifindex", cfg.filter_ifindex),
        ("output_relative_ts", cfg.output_relative_ts.into()),
        ("output_meta", cfg.output_meta.into()),
        ("output_tuple", cfg.output_tuple.into()),
        ("output_skb", cfg.output_skb.into()),
        ("output_stack", cfg.output_stack.into()),
        ("is_set", cfg.is_set.into()),
        ("track_skb", cfg.track_skb.into()),
    ];
    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "{key:<20} {value}");
    }
    out
}
