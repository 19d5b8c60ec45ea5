//! Pinning a unit of work to the OS thread it runs on.
//!
//! Network namespace membership belongs to the OS thread, not to whatever
//! task happens to run on it. [`ThreadPin`] is `!Send`, so a namespace
//! switch bracketed by it cannot be carried across an `.await` point or
//! handed to another thread before the pin is released.

use std::marker::PhantomData;
use std::thread::{self, ThreadId};

/// Scope during which the caller must stay on the current OS thread.
///
/// Released exactly once, when dropped. It cannot leave the thread that
/// acquired it:
///
/// ```compile_fail
/// use nsresolve_core::thread::ThreadPin;
///
/// let pin = ThreadPin::acquire();
/// std::thread::spawn(move || drop(pin));
/// ```
#[derive(Debug)]
pub struct ThreadPin {
    thread: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl ThreadPin {
    /// Pins the caller to the current OS thread.
    #[must_use = "the pin is released as soon as it is dropped"]
    pub fn acquire() -> Self {
        let current = thread::current();
        tracing::trace!(thread = ?current.id(), name = current.name(), "thread pinned");
        Self {
            thread: current.id(),
            _not_send: PhantomData,
        }
    }

    /// Thread the pin holds.
    #[must_use]
    pub const fn thread(&self) -> ThreadId {
        self.thread
    }
}

impl Drop for ThreadPin {
    fn drop(&mut self) {
        tracing::trace!(thread = ?self.thread, "thread unpinned");
    }
}
