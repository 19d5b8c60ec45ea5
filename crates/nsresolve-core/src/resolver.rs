//! Namespace-aware interface resolution.
//!
//! Turns an interface name and a namespace specifier into the pair of keys
//! used downstream as filters: the interface index and the namespace inode.
//!
//! Resolving an interface means looking it up from inside the target
//! namespace, so the calling thread is switched into it for the duration
//! of the lookup. The switch runs under a [`SwitchGuard`], which keeps the
//! thread pinned, and the thread is back in its origin namespace by the
//! time [`Resolver::resolve`] returns, on success and failure alike.

use nsresolve_common::constants::{INODE_PREFIX, RESOLVER_THREAD_NAME};
use nsresolve_common::error::{NsResolveError, Result};
use nsresolve_common::types::{NamespaceSpecifier, ResolvedIdentity};

use crate::namespace::network::SwitchGuard;
use crate::namespace::{NamespaceOps, SystemNamespaceOps};

/// Resolves interface names against network namespaces.
#[derive(Debug, Clone, Default)]
pub struct Resolver<O = SystemNamespaceOps> {
    ops: O,
}

impl Resolver {
    /// Creates a resolver backed by the running kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ops: SystemNamespaceOps,
        }
    }
}

impl<O: NamespaceOps> Resolver<O> {
    /// Creates a resolver on top of custom OS primitives.
    pub const fn with_ops(ops: O) -> Self {
        Self { ops }
    }

    /// Resolves `ifname` inside the namespace named by `specifier`.
    ///
    /// `specifier` is empty for the calling thread's namespace, a
    /// `/`-prefixed namespace path, or `inode:<n>`. The inode form names a
    /// namespace without a way to enter it, so it only resolves when
    /// `ifname` is empty and yields an index of 0.
    ///
    /// # Errors
    ///
    /// - `InvalidSpecifier` if `specifier` has none of the forms above.
    /// - `ConfigConflict` for an inode specifier with a non-empty `ifname`.
    /// - `NamespaceUnavailable` if a namespace handle cannot be opened or stat'ed.
    /// - `NamespaceSwitchFailed` if the kernel refuses the switch.
    /// - `InterfaceNotFound` if `ifname` does not exist in the namespace,
    ///   including when it is empty.
    /// - `RestoreFailed` if the lookup succeeded but the thread could not
    ///   be moved back to its origin namespace.
    pub fn resolve(&self, ifname: &str, specifier: &str) -> Result<ResolvedIdentity> {
        self.resolve_specifier(ifname, &NamespaceSpecifier::classify(specifier))
    }

    /// Same as [`Resolver::resolve`] with an already classified specifier.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve_specifier(
        &self,
        ifname: &str,
        specifier: &NamespaceSpecifier,
    ) -> Result<ResolvedIdentity> {
        let target = match specifier {
            NamespaceSpecifier::Inode(inode) => {
                if !ifname.is_empty() {
                    return Err(NsResolveError::ConfigConflict {
                        message: format!(
                            "{INODE_PREFIX}{inode} cannot be combined with interface {ifname:?}"
                        ),
                    });
                }
                return Ok(ResolvedIdentity {
                    ifindex: 0,
                    netns_id: *inode,
                });
            }
            NamespaceSpecifier::Invalid(raw) => {
                return Err(NsResolveError::InvalidSpecifier {
                    specifier: raw.clone(),
                });
            }
            NamespaceSpecifier::Current => self.ops.current()?,
            NamespaceSpecifier::Path(path) => self.ops.open(path)?,
        };

        let guard = SwitchGuard::record(&self.ops)?;
        let outcome = self.lookup_in(&guard, &target, ifname);
        let restored = guard.restore();

        match (outcome, restored) {
            (Ok(identity), Ok(())) => {
                tracing::debug!(ifname, %specifier, %identity, "resolved interface");
                Ok(identity)
            }
            (Ok(_), Err(restore)) => {
                tracing::error!(error = %restore, ifname, %specifier, "namespace restore failed");
                Err(restore)
            }
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(restore)) => {
                tracing::error!(
                    error = %restore,
                    primary = %primary,
                    ifname,
                    %specifier,
                    "namespace restore failed after resolution error"
                );
                Err(primary)
            }
        }
    }

    fn lookup_in(
        &self,
        guard: &SwitchGuard<'_, O>,
        target: &O::Handle,
        ifname: &str,
    ) -> Result<ResolvedIdentity> {
        guard.enter(target)?;
        let ifindex = self.ops.interface_index(ifname)?;
        let netns_id = self.ops.inode(target)?;
        Ok(ResolvedIdentity { ifindex, netns_id })
    }

    /// Returns the inode of the namespace named by `specifier` without
    /// switching the calling thread.
    ///
    /// # Errors
    ///
    /// - `InvalidSpecifier` if `specifier` is malformed.
    /// - `NamespaceUnavailable` if the namespace cannot be opened or stat'ed.
    pub fn namespace_id(&self, specifier: &str) -> Result<u32> {
        match NamespaceSpecifier::classify(specifier) {
            NamespaceSpecifier::Inode(inode) => Ok(inode),
            NamespaceSpecifier::Invalid(raw) => {
                Err(NsResolveError::InvalidSpecifier { specifier: raw })
            }
            NamespaceSpecifier::Current => self.ops.inode(&self.ops.current()?),
            NamespaceSpecifier::Path(path) => self.ops.inode(&self.ops.open(&path)?),
        }
    }
}

impl<O: NamespaceOps + Sync> Resolver<O> {
    /// Runs [`Resolver::resolve`] on a dedicated OS thread.
    ///
    /// The calling thread never changes namespace, which makes this the
    /// variant to use from async runtimes and thread pools.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`]. Additionally returns `Io` if the worker
    /// thread cannot be spawned.
    pub fn resolve_isolated(&self, ifname: &str, specifier: &str) -> Result<ResolvedIdentity> {
        std::thread::scope(|scope| {
            let worker = std::thread::Builder::new()
                .name(RESOLVER_THREAD_NAME.to_owned())
                .spawn_scoped(scope, || self.resolve(ifname, specifier))
                .map_err(|e| NsResolveError::Io {
                    operation: "spawning resolver thread",
                    source: e,
                })?;
            match worker.join() {
                Ok(resolved) => resolved,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        })
    }
}

/// Resolves `ifname` inside the namespace named by `specifier` using the
/// running kernel.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve(ifname: &str, specifier: &str) -> Result<ResolvedIdentity> {
    Resolver::new().resolve(ifname, specifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingOps;

    const BLUE: &str = "/run/netns/blue";

    fn blue_ops() -> RecordingOps {
        RecordingOps::new().with_namespace(BLUE, 4_026_532_300, "eth0", 7)
    }

    #[test]
    fn inode_specifier_short_circuits() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let id = resolver.resolve("", "inode:42").expect("should resolve");
        assert_eq!(
            id,
            ResolvedIdentity {
                ifindex: 0,
                netns_id: 42
            }
        );
        assert!(resolver.ops.calls().is_empty());
    }

    #[test]
    fn inode_specifier_with_interface_conflicts() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let err = resolver.resolve("eth0", "inode:42").expect_err("should conflict");
        assert!(matches!(err, NsResolveError::ConfigConflict { .. }));
        assert!(resolver.ops.calls().is_empty());
    }

    #[test]
    fn invalid_specifier_is_rejected() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let err = resolver
            .resolve("eth0", "not-a-valid-spec")
            .expect_err("should reject");
        assert!(matches!(
            err,
            NsResolveError::InvalidSpecifier { ref specifier } if specifier == "not-a-valid-spec"
        ));
        assert!(resolver.ops.calls().is_empty());
    }

    #[test]
    fn current_namespace_resolves_loopback() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let id = resolver.resolve("lo", "").expect("should resolve");
        assert_eq!(
            id,
            ResolvedIdentity {
                ifindex: 1,
                netns_id: RecordingOps::ORIGIN_INODE
            }
        );
        assert_eq!(resolver.ops.active(), RecordingOps::ORIGIN);
    }

    #[test]
    fn path_namespace_follows_protocol_order() {
        let resolver = Resolver::with_ops(blue_ops());
        let id = resolver.resolve("eth0", BLUE).expect("should resolve");
        assert_eq!(id.ifindex, 7);
        assert_eq!(id.netns_id, 4_026_532_300);
        assert_eq!(
            resolver.ops.calls(),
            vec![
                format!("open {BLUE}"),
                "current".to_owned(),
                format!("enter {BLUE}"),
                "lookup eth0".to_owned(),
                format!("inode {BLUE}"),
                "enter origin".to_owned(),
            ]
        );
        assert_eq!(resolver.ops.active(), RecordingOps::ORIGIN);
    }

    #[test]
    fn interface_is_looked_up_inside_target() {
        // `lo` exists in the origin namespace only.
        let resolver = Resolver::with_ops(blue_ops());
        let err = resolver.resolve("lo", BLUE).expect_err("should not find lo");
        assert_eq!(err.kind(), "interface_not_found");
        assert_eq!(resolver.ops.active(), RecordingOps::ORIGIN);
    }

    #[test]
    fn missing_interface_restores_origin() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let err = resolver.resolve("nonexistent0", "").expect_err("should fail");
        assert_eq!(err.kind(), "interface_not_found");
        assert_eq!(resolver.ops.active(), RecordingOps::ORIGIN);
        assert_eq!(resolver.ops.calls().last().map(String::as_str), Some("enter origin"));
    }

    #[test]
    fn empty_interface_name_is_not_found() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let err = resolver.resolve("", "").expect_err("should fail");
        assert!(matches!(err, NsResolveError::InterfaceNotFound { ref name, .. } if name.is_empty()));
    }

    #[test]
    fn missing_path_fails_before_switch() {
        let resolver = Resolver::with_ops(RecordingOps::new().missing(BLUE));
        let err = resolver.resolve("eth0", BLUE).expect_err("should fail");
        assert_eq!(err.kind(), "namespace_unavailable");
        assert_eq!(resolver.ops.calls(), vec![format!("open {BLUE}")]);
    }

    #[test]
    fn unreadable_origin_never_switches() {
        let resolver = Resolver::with_ops(blue_ops().unreadable(RecordingOps::ORIGIN));
        let err = resolver.resolve("eth0", BLUE).expect_err("should fail");
        assert_eq!(err.kind(), "namespace_unavailable");
        assert!(!resolver.ops.calls().iter().any(|c| c.starts_with("enter")));
    }

    #[test]
    fn refused_switch_still_restores() {
        let resolver = Resolver::with_ops(blue_ops().refuse(BLUE));
        let err = resolver.resolve("eth0", BLUE).expect_err("should fail");
        assert_eq!(err.kind(), "namespace_switch_failed");
        assert_eq!(resolver.ops.calls().last().map(String::as_str), Some("enter origin"));
        assert_eq!(resolver.ops.active(), RecordingOps::ORIGIN);
    }

    #[test]
    fn restore_failure_does_not_mask_primary_error() {
        let resolver = Resolver::with_ops(blue_ops().refuse(RecordingOps::ORIGIN));
        let err = resolver.resolve("lo", BLUE).expect_err("should fail");
        assert_eq!(err.kind(), "interface_not_found");
    }

    #[test]
    fn restore_failure_after_success_is_reported() {
        let resolver = Resolver::with_ops(blue_ops().refuse(RecordingOps::ORIGIN));
        let err = resolver.resolve("eth0", BLUE).expect_err("should fail");
        assert!(matches!(
            err,
            NsResolveError::RestoreFailed { ref path, .. } if path.as_os_str() == "origin"
        ));
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let resolver = Resolver::with_ops(blue_ops());
        let first = resolver.resolve("eth0", BLUE).expect("should resolve");
        let second = resolver.resolve("eth0", BLUE).expect("should resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn namespace_id_does_not_switch() {
        let resolver = Resolver::with_ops(blue_ops());
        assert_eq!(resolver.namespace_id(BLUE).expect("should stat"), 4_026_532_300);
        assert_eq!(
            resolver.namespace_id("").expect("should stat"),
            RecordingOps::ORIGIN_INODE
        );
        assert_eq!(resolver.namespace_id("inode:9").expect("should parse"), 9);
        assert!(!resolver.ops.calls().iter().any(|c| c.starts_with("enter")));
    }

    #[test]
    fn namespace_id_rejects_invalid_specifier() {
        let resolver = Resolver::with_ops(RecordingOps::new());
        let err = resolver.namespace_id("blue").expect_err("should reject");
        assert_eq!(err.kind(), "invalid_specifier");
    }
}
