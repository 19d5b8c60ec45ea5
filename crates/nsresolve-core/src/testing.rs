//! In-memory [`NamespaceOps`] used by unit tests.
//!
//! Namespaces are plain strings. The origin namespace is `"origin"`, a
//! path-opened namespace is named after its path.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nsresolve_common::error::{NsResolveError, Result};

use crate::namespace::NamespaceOps;

pub struct RecordingOps {
    active: RefCell<String>,
    calls: RefCell<Vec<String>>,
    missing: HashSet<String>,
    refused: HashSet<String>,
    unreadable: HashSet<String>,
    inodes: HashMap<String, u32>,
    interfaces: HashMap<(String, String), u32>,
}

impl RecordingOps {
    pub const ORIGIN: &'static str = "origin";
    pub const ORIGIN_INODE: u32 = 4_026_531_840;

    pub fn new() -> Self {
        let mut inodes = HashMap::new();
        let _ = inodes.insert(Self::ORIGIN.to_owned(), Self::ORIGIN_INODE);
        let mut interfaces = HashMap::new();
        let _ = interfaces.insert((Self::ORIGIN.to_owned(), "lo".to_owned()), 1);
        Self {
            active: RefCell::new(Self::ORIGIN.to_owned()),
            calls: RefCell::new(Vec::new()),
            missing: HashSet::new(),
            refused: HashSet::new(),
            unreadable: HashSet::new(),
            inodes,
            interfaces,
        }
    }

    /// Adds a namespace reachable by path, with one interface in it.
    pub fn with_namespace(mut self, path: &str, inode: u32, ifname: &str, ifindex: u32) -> Self {
        let _ = self.inodes.insert(path.to_owned(), inode);
        let _ = self
            .interfaces
            .insert((path.to_owned(), ifname.to_owned()), ifindex);
        self
    }

    pub fn missing(mut self, path: &str) -> Self {
        let _ = self.missing.insert(path.to_owned());
        self
    }

    pub fn refuse(mut self, namespace: &str) -> Self {
        let _ = self.refused.insert(namespace.to_owned());
        self
    }

    pub fn unreadable(mut self, namespace: &str) -> Self {
        let _ = self.unreadable.insert(namespace.to_owned());
        self
    }

    pub fn active(&self) -> String {
        self.active.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl NamespaceOps for RecordingOps {
    type Handle = String;

    fn current(&self) -> Result<String> {
        self.record("current".to_owned());
        let active = self.active();
        if self.unreadable.contains(&active) {
            return Err(NsResolveError::NamespaceUnavailable {
                path: PathBuf::from("/proc/thread-self/ns/net"),
                source: Errno::EACCES.into(),
            });
        }
        Ok(active)
    }

    fn open(&self, path: &Path) -> Result<String> {
        let name = path.display().to_string();
        self.record(format!("open {name}"));
        if self.missing.contains(&name) {
            return Err(NsResolveError::NamespaceUnavailable {
                path: path.to_path_buf(),
                source: Errno::ENOENT.into(),
            });
        }
        Ok(name)
    }

    fn enter(&self, handle: &String) -> Result<()> {
        self.record(format!("enter {handle}"));
        if self.refused.contains(handle) {
            return Err(NsResolveError::NamespaceSwitchFailed {
                path: PathBuf::from(handle),
                source: Errno::EPERM.into(),
            });
        }
        *self.active.borrow_mut() = handle.clone();
        Ok(())
    }

    fn inode(&self, handle: &String) -> Result<u32> {
        self.record(format!("inode {handle}"));
        self.inodes
            .get(handle)
            .copied()
            .ok_or_else(|| NsResolveError::NamespaceUnavailable {
                path: PathBuf::from(handle),
                source: Errno::EBADF.into(),
            })
    }

    fn interface_index(&self, name: &str) -> Result<u32> {
        self.record(format!("lookup {name}"));
        self.interfaces
            .get(&(self.active(), name.to_owned()))
            .copied()
            .ok_or_else(|| NsResolveError::InterfaceNotFound {
                name: name.to_owned(),
                source: Errno::ENODEV.into(),
            })
    }
}
