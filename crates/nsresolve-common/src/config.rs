//! Filter configuration model.
//!
//! [`FilterFlags`] is the already-parsed flag record handed over by the
//! CLI. [`FilterConfig`] is the flat record consumed downstream as filter
//! keys; its switches are bytes so it can be copied verbatim into a
//! fixed-layout map value.

use serde::{Deserialize, Serialize};

/// Parsed filter and output flags.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFlags {
    /// Interface to filter on. Empty means no interface filter.
    pub filter_ifname: String,
    /// Namespace specifier: empty, a `/`-prefixed path, or `inode:<n>`.
    pub filter_netns: String,
    /// Packet mark to filter on.
    pub filter_mark: u32,
    /// Keep tracking a buffer once it matched the filter.
    pub filter_track_skb: bool,
    /// Dump the full buffer.
    pub output_skb: bool,
    /// Print buffer metadata.
    pub output_meta: bool,
    /// Print the L4 tuple.
    pub output_tuple: bool,
    /// Print the kernel stack.
    pub output_stack: bool,
    /// Print timestamps relative to the previous event.
    pub output_relative_ts: bool,
}

/// Flat filter record with resolved namespace and interface keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Namespace inode to filter on, 0 for any.
    pub filter_netns: u32,
    /// Packet mark to filter on.
    pub filter_mark: u32,
    /// Interface index to filter on, 0 for any.
    pub filter_ifindex: u32,
    /// Relative timestamps switch.
    pub output_relative_ts: u8,
    /// Metadata output switch.
    pub output_meta: u8,
    /// Tuple output switch.
    pub output_tuple: u8,
    /// Buffer dump switch.
    pub output_skb: u8,
    /// Stack output switch.
    pub output_stack: u8,
    /// Set to 1 once the record has been populated.
    pub is_set: u8,
    /// Buffer tracking switch.
    pub track_skb: u8,
}

impl FilterConfig {
    /// Builds the flag-derived part of the record.
    ///
    /// Namespace and interface keys are left at 0; filling them needs a
    /// resolver and happens in the core crate.
    #[must_use]
    pub fn from_flags(flags: &FilterFlags) -> Self {
        Self {
            filter_mark: flags.filter_mark,
            output_relative_ts: u8::from(flags.output_relative_ts),
            output_meta: u8::from(flags.output_meta),
            output_tuple: u8::from(flags.output_tuple),
            output_skb: u8::from(flags.output_skb),
            output_stack: u8::from(flags.output_stack),
            is_set: 1,
            track_skb: u8::from(flags.filter_track_skb),
            ..Self::default()
        }
    }

    /// Serializes the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
