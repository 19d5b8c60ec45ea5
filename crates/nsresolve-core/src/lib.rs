//! # nsresolve-core
//!
//! Resolves a network interface name to its kernel index inside an
//! arbitrary network namespace, together with that namespace's inode.
//!
//! This crate provides safe abstractions over:
//! - **Namespace handles**: opening `/proc/thread-self/ns/net` or a
//!   namespace path, and reading its inode.
//! - **Namespace switching**: `setns(2)` behind a guard that always moves
//!   the thread back to where it started.
//! - **Thread pinning**: a `!Send` scope that keeps the switch on one OS thread.
//! - **Interface lookup**: `if_nametoindex(3)`.
//!
//! No unsafe code is needed; every syscall goes through `nix`.

pub mod filter;
pub mod interface;
pub mod namespace;
pub mod resolver;
pub mod thread;

#[cfg(test)]
pub(crate) mod testing;

pub use resolver::{Resolver, resolve};
