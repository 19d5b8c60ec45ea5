//! System-wide constants and well-known paths.

/// Network namespace of the calling thread, as exposed by procfs.
///
/// `/proc/self/ns/net` names the namespace of the thread-group leader,
/// which differs from the calling thread's once a switch is in effect.
pub const THREAD_SELF_NETNS: &str = "/proc/thread-self/ns/net";

/// Prefix of the inode form of a namespace specifier (`inode:<n>`).
pub const INODE_PREFIX: &str = "inode:";

/// Name given to the worker thread used for isolated resolutions.
pub const RESOLVER_THREAD_NAME: &str = "nsresolve-worker";
