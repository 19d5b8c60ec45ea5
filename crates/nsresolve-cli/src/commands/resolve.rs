//! `nsresolve resolve` — Resolve one interface inside a namespace.

use clap::Args;
use nsresolve_core::Resolver;

use crate::output;

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Interface name to look up.
    pub ifname: String,

    /// Network namespace: empty for the current one, a path such as
    /// `/run/netns/blue`, or `inode:<n>`.
    #[arg(long, default_value = "", env = "NSRESOLVE_NETNS")]
    pub netns: String,

    /// Resolve on a dedicated thread instead of the main thread.
    #[arg(long)]
    pub isolated: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `resolve` command.
///
/// # Errors
///
/// Returns an error if resolution fails.
pub fn execute(args: &ResolveArgs) -> anyhow::Result<()> {
    let resolver = Resolver::new();
    let resolved = if args.isolated {
        resolver.resolve_isolated(&args.ifname, &args.netns)
    } else {
        resolver.resolve(&args.ifname, &args.netns)
    };
    let identity = resolved.map_err(super::report)?;

    tracing::info!(ifname = %args.ifname, netns = %args.netns, %identity, "resolved");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
    } else {
        print!("{}", output::identity_table(&args.ifname, &identity));
    }
    Ok(())
}
