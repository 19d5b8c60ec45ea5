//! Domain primitive types used across the nsresolve workspace.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::INODE_PREFIX;

/// Which network namespace a resolution runs against.
///
/// Classification is purely syntactic: a `Path` is never checked against
/// the filesystem here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespaceSpecifier {
    /// Empty input: the namespace of the calling thread.
    Current,
    /// Input starting with `/`: a namespace object on the filesystem,
    /// such as `/proc/<pid>/ns/net` or `/run/netns/<name>`.
    Path(PathBuf),
    /// `inode:<n>`: a namespace known only by its inode number.
    Inode(u32),
    /// Anything else, kept verbatim for error reporting.
    Invalid(String),
}

impl NamespaceSpecifier {
    /// Classifies a user-supplied specifier string.
    ///
    /// Exactly one variant applies to any input. An `inode:` prefix whose
    /// suffix is not a decimal number fitting in 32 bits is `Invalid`.
    #[must_use]
    pub fn classify(input: &str) -> Self {
        if input.is_empty() {
            return Self::Current;
        }
        if input.starts_with('/') {
            return Self::Path(PathBuf::from(input));
        }
        if let Some(digits) = input.strip_prefix(INODE_PREFIX) {
            // `u32::from_str` accepts a leading '+', which is not a decimal number here.
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(inode) = digits.parse::<u32>() {
                    return Self::Inode(inode);
                }
            }
        }
        Self::Invalid(input.to_owned())
    }
}

impl fmt::Display for NamespaceSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Inode(inode) => write!(f, "{INODE_PREFIX}{inode}"),
            Self::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

/// Successful output of a resolution.
///
/// `ifindex` is only meaningful inside the namespace that was active when
/// it was resolved. `netns_id` is the namespace's inode number and stays
/// stable for the namespace's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Kernel interface index, or 0 when no interface was resolved.
    pub ifindex: u32,
    /// Inode number of the network namespace.
    pub netns_id: u32,
}

impl fmt::Display for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ifindex={} netns={}", self.ifindex, self.netns_id)
    }
}
