//! Network namespace switching.
//!
//! [`SwitchGuard`] records the namespace a thread starts in and moves the
//! thread back there when it is restored or dropped, whatever happened in
//! between.

use nsresolve_common::error::{NsResolveError, Result};

use super::{NamespaceHandle, NamespaceOps};
use crate::thread::ThreadPin;

/// Moves the calling thread into the network namespace behind `handle`.
///
/// # Errors
///
/// Returns `NamespaceSwitchFailed` if `setns(2)` fails, typically `EPERM`
/// without `CAP_SYS_ADMIN` or `EINVAL` when the handle is not a network
/// namespace.
#[cfg(target_os = "linux")]
pub fn join_network_namespace(handle: &NamespaceHandle) -> Result<()> {
    use nix::sched::{CloneFlags, setns};
    use std::os::fd::AsFd;

    setns(handle.as_fd(), CloneFlags::CLONE_NEWNET).map_err(|e| {
        NsResolveError::NamespaceSwitchFailed {
            path: handle.path().to_path_buf(),
            source: e.into(),
        }
    })?;
    tracing::debug!(path = %handle.path().display(), "joined network namespace");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error. Network namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn join_network_namespace(handle: &NamespaceHandle) -> Result<()> {
    Err(NsResolveError::NamespaceSwitchFailed {
        path: handle.path().to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "network namespaces require Linux",
        ),
    })
}

/// Restores the calling thread's origin namespace on every exit path.
///
/// Created with [`SwitchGuard::record`] before any switch happens. An
/// explicit [`SwitchGuard::restore`] reports the outcome to the caller;
/// otherwise the restore runs on drop and a failure is logged.
///
/// The guard holds a [`ThreadPin`] for its whole lifetime, so it is
/// released on the thread it switched:
///
/// ```compile_fail
/// use nsresolve_core::namespace::SystemNamespaceOps;
/// use nsresolve_core::namespace::network::SwitchGuard;
///
/// let ops = SystemNamespaceOps;
/// let guard = SwitchGuard::record(&ops).unwrap();
/// std::thread::scope(|s| {
///     s.spawn(move || drop(guard));
/// });
/// ```
pub struct SwitchGuard<'a, O: NamespaceOps> {
    ops: &'a O,
    origin: Option<O::Handle>,
    _pin: ThreadPin,
}

impl<'a, O: NamespaceOps> SwitchGuard<'a, O> {
    /// Pins the calling thread and records the namespace it is in.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if the origin cannot be read.
    pub fn record(ops: &'a O) -> Result<Self> {
        let pin = ThreadPin::acquire();
        let origin = ops.current()?;
        Ok(Self {
            ops,
            origin: Some(origin),
            _pin: pin,
        })
    }

    /// Moves the calling thread into `target`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceSwitchFailed` if the switch is refused. The thread
    /// is still restored to its origin when the guard goes away.
    pub fn enter(&self, target: &O::Handle) -> Result<()> {
        self.ops.enter(target)
    }

    /// Moves the calling thread back into its origin namespace.
    ///
    /// # Errors
    ///
    /// Returns `RestoreFailed` if the thread could not be moved back. The
    /// thread is then left in whatever namespace it was in.
    pub fn restore(mut self) -> Result<()> {
        self.restore_origin()
    }

    fn restore_origin(&mut self) -> Result<()> {
        let Some(origin) = self.origin.take() else {
            return Ok(());
        };
        self.ops.enter(&origin).map_err(|e| match e {
            NsResolveError::NamespaceSwitchFailed { path, source } => {
                NsResolveError::RestoreFailed { path, source }
            }
            other => other,
        })
    }
}

impl<O: NamespaceOps> Drop for SwitchGuard<'_, O> {
    fn drop(&mut self) {
        if let Err(e) = self.restore_origin() {
            tracing::error!(error = %e, "thread left outside its origin network namespace");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingOps;

    #[test]
    fn drop_restores_origin() {
        let ops = RecordingOps::new();
        {
            let guard = SwitchGuard::record(&ops).expect("should record origin");
            guard.enter(&"/run/netns/blue".to_owned()).expect("should enter");
            assert_eq!(ops.active(), "/run/netns/blue");
        }
        assert_eq!(ops.active(), RecordingOps::ORIGIN);
    }

    #[test]
    fn restore_is_attempted_after_refused_switch() {
        let ops = RecordingOps::new().refuse("/run/netns/blue");
        let guard = SwitchGuard::record(&ops).expect("should record origin");
        let err = guard
            .enter(&"/run/netns/blue".to_owned())
            .expect_err("switch should be refused");
        assert_eq!(err.kind(), "namespace_switch_failed");
        guard.restore().expect("no-op restore should succeed");
        assert_eq!(
            ops.calls(),
            vec!["current", "enter /run/netns/blue", "enter origin"]
        );
    }

    #[test]
    fn restore_runs_once() {
        let ops = RecordingOps::new();
        let guard = SwitchGuard::record(&ops).expect("should record origin");
        guard.enter(&"/run/netns/blue".to_owned()).expect("should enter");
        guard.restore().expect("should restore");
        let restores = ops
            .calls()
            .iter()
            .filter(|c| c.as_str() == "enter origin")
            .count();
        assert_eq!(restores, 1);
    }

    #[test]
    fn failed_restore_is_reported() {
        let ops = RecordingOps::new().refuse(RecordingOps::ORIGIN);
        let guard = SwitchGuard::record(&ops).expect("should record origin");
        guard.enter(&"/run/netns/blue".to_owned()).expect("should enter");
        let err = guard.restore().expect_err("restore should fail");
        assert_eq!(err.kind(), "restore_failed");
        assert_eq!(ops.active(), "/run/netns/blue");
    }
}
