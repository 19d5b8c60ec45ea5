//! Construction of the filter record from parsed flags.

use nsresolve_common::config::{FilterConfig, FilterFlags};
use nsresolve_common::error::Result;

use crate::namespace::NamespaceOps;
use crate::resolver::Resolver;

/// Builds the filter record for `flags` using the running kernel.
///
/// # Errors
///
/// Returns any error of [`Resolver::resolve`] or [`Resolver::namespace_id`].
pub fn build_filter_config(flags: &FilterFlags) -> Result<FilterConfig> {
    build_filter_config_with(&Resolver::new(), flags)
}

/// Builds the filter record for `flags` with the given resolver.
///
/// Without an interface name no lookup is needed, so the namespace key is
/// read without switching namespaces; with neither flag set both keys stay 0.
///
/// # Errors
///
/// Returns any error of [`Resolver::resolve`] or [`Resolver::namespace_id`].
pub fn build_filter_config_with<O: NamespaceOps>(
    resolver: &Resolver<O>,
    flags: &FilterFlags,
) -> Result<FilterConfig> {
    let mut cfg = FilterConfig::from_flags(flags);

    match (flags.filter_ifname.as_str(), flags.filter_netns.as_str()) {
        ("", "") => {}
        ("", netns) => cfg.filter_netns = resolver.namespace_id(netns)?,
        (ifname, netns) => {
            let identity = resolver.resolve(ifname, netns)?;
            cfg.filter_ifindex = identity.ifindex;
            cfg.filter_netns = identity.netns_id;
        }
    }

    tracing::info!(
        filter_ifindex = cfg.filter_ifindex,
        filter_netns = cfg.filter_netns,
        "filter configuration built"
    );
    Ok(cfg)
}
