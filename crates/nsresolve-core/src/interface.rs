//! Network interface lookup.

use nsresolve_common::error::{NsResolveError, Result};

/// Returns the kernel index of interface `name` in the calling thread's
/// current network namespace.
///
/// # Errors
///
/// Returns `InterfaceNotFound` if `if_nametoindex(3)` fails. An empty
/// name is rejected by the kernel with `ENODEV`.
#[cfg(target_os = "linux")]
pub fn index_by_name(name: &str) -> Result<u32> {
    let index = nix::net::if_::if_nametoindex(name).map_err(|e| {
        NsResolveError::InterfaceNotFound {
            name: name.to_owned(),
            source: e.into(),
        }
    })?;
    tracing::debug!(name, index, "resolved interface");
    Ok(index)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error. Namespace-scoped lookups require Linux.
#[cfg(not(target_os = "linux"))]
pub fn index_by_name(name: &str) -> Result<u32> {
    Err(NsResolveError::InterfaceNotFound {
        name: name.to_owned(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "network namespaces require Linux",
        ),
    })
}
