//! Linux network namespace handles.
//!
//! A namespace is addressed through a file descriptor on an `nsfs` object,
//! either `/proc/thread-self/ns/net` or a bind mount such as
//! `/run/netns/<name>`. The descriptor's inode number is the namespace's
//! identity.

pub mod network;

use std::fs::File;
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use nsresolve_common::constants::THREAD_SELF_NETNS;
use nsresolve_common::error::{NsResolveError, Result};

/// OS primitives the resolver is built from.
///
/// Every method acts on the calling thread only. Implementations report
/// failures with the error kind named on each method.
pub trait NamespaceOps {
    /// An open reference to a namespace, released on drop.
    type Handle;

    /// Opens the namespace the calling thread is currently in.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if the handle cannot be obtained.
    fn current(&self) -> Result<Self::Handle>;

    /// Opens the namespace object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if the path cannot be opened.
    fn open(&self, path: &Path) -> Result<Self::Handle>;

    /// Moves the calling thread into the namespace behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceSwitchFailed` if the kernel refuses the switch.
    fn enter(&self, handle: &Self::Handle) -> Result<()>;

    /// Returns the inode number identifying the namespace behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if the handle cannot be stat'ed.
    fn inode(&self, handle: &Self::Handle) -> Result<u32>;

    /// Looks up an interface index in the namespace the thread is in.
    ///
    /// # Errors
    ///
    /// Returns `InterfaceNotFound` if no such interface exists.
    fn interface_index(&self, name: &str) -> Result<u32>;
}

/// An open file descriptor on a network namespace object.
#[derive(Debug)]
pub struct NamespaceHandle {
    file: File,
    path: PathBuf,
}

impl NamespaceHandle {
    /// Opens the namespace object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if the path cannot be opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| NsResolveError::NamespaceUnavailable {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "opened namespace handle");
        Ok(Self { file, path })
    }

    /// Opens the network namespace of the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if procfs is not mounted or the
    /// kernel predates `/proc/thread-self`.
    pub fn current() -> Result<Self> {
        Self::open(THREAD_SELF_NETNS)
    }

    /// Path the handle was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the inode number of the namespace object.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceUnavailable` if `fstat(2)` fails or the inode
    /// does not fit in 32 bits.
    pub fn inode(&self) -> Result<u32> {
        let metadata = self
            .file
            .metadata()
            .map_err(|e| NsResolveError::NamespaceUnavailable {
                path: self.path.clone(),
                source: e,
            })?;
        u32::try_from(metadata.ino()).map_err(|e| NsResolveError::NamespaceUnavailable {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}

impl AsFd for NamespaceHandle {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

/// [`NamespaceOps`] backed by the running kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNamespaceOps;

impl NamespaceOps for SystemNamespaceOps {
    type Handle = NamespaceHandle;

    fn current(&self) -> Result<NamespaceHandle> {
        NamespaceHandle::current()
    }

    fn open(&self, path: &Path) -> Result<NamespaceHandle> {
        NamespaceHandle::open(path)
    }

    fn enter(&self, handle: &NamespaceHandle) -> Result<()> {
        network::join_network_namespace(handle)
    }

    fn inode(&self, handle: &NamespaceHandle) -> Result<u32> {
        handle.inode()
    }

    fn interface_index(&self, name: &str) -> Result<u32> {
        crate::interface::index_by_name(name)
    }
}
