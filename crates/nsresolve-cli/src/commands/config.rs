//! `nsresolve config` — Build the filter configuration from flags.

use clap::Args;
use nsresolve_common::config::FilterFlags;

use crate::output;

/// Arguments for the `config` command.
#[allow(clippy::struct_excessive_bools)]
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Filter on this interface.
    #[arg(long, default_value = "")]
    pub filter_ifname: String,

    /// Filter on this network namespace: a path or `inode:<n>`.
    #[arg(long, default_value = "")]
    pub filter_netns: String,

    /// Filter on this packet mark (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0", value_parser = parse_mark)]
    pub filter_mark: u32,

    /// Keep tracking a buffer once it matched the filter.
    #[arg(long)]
    pub filter_track_skb: bool,

    /// Dump the full buffer.
    #[arg(long)]
    pub output_skb: bool,

    /// Print buffer metadata.
    #[arg(long)]
    pub output_meta: bool,

    /// Print the L4 tuple.
    #[arg(long)]
    pub output_tuple: bool,

    /// Print the kernel stack.
    #[arg(long)]
    pub output_stack: bool,

    /// Print timestamps relative to the previous event.
    #[arg(long)]
    pub output_relative_ts: bool,

    /// Print the configuration as JSON.
    #[arg(long)]
    pub json: bool,
}

impl From<ConfigArgs> for FilterFlags {
    fn from(args: ConfigArgs) -> Self {
        Self {
            filter_ifname: args.filter_ifname,
            filter_netns: args.filter_netns,
            filter_mark: args.filter_mark,
            filter_track_skb: args.filter_track_skb,
            output_skb: args.output_skb,
            output_meta: args.output_meta,
            output_tuple: args.output_tuple,
            output_stack: args.output_stack,
            output_relative_ts: args.output_relative_ts,
        }
    }
}

/// Parses a packet mark given in decimal or `0x` hexadecimal.
fn parse_mark(raw: &str) -> Result<u32, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    parsed.map_err(|e| format!("invalid mark {raw:?}: {e}"))
}

/// Executes the `config` command.
///
/// # Errors
///
/// Returns an error if namespace or interface resolution fails.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let json = args.json;
    let flags = FilterFlags::from(args);
    let cfg = nsresolve_core::filter::build_filter_config(&flags).map_err(super::report)?;

    if json {
        println!("{}", cfg.to_json().map_err(super::report)?);
    } else {
        print!("{}", output::config_table(&cfg));
    }
    Ok(())
}
