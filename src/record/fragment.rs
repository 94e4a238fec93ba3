//! Fragment records
//!
//! One node of a file's chain.

use serde::{Deserialize, Serialize};

use super::Locator;

/// Maximum number of payload characters per fragment
pub const MAX_FRAGMENT_LEN: usize = 20;

/// A single fragment of a logical file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    /// Up to `MAX_FRAGMENT_LEN` characters of the file's content
    pub payload: String,

    /// Locator of the following fragment, `None` for the last one
    #[serde(rename = "nextFragmentPath")]
    pub next_fragment: Option<Locator>,

    /// End-of-chain marker, mirrors `next_fragment.is_none()`
    pub is_end: bool,
}

impl FragmentRecord {
    /// Create a fragment; the end marker follows from `next_fragment`
    pub fn new(payload: impl Into<String>, next_fragment: Option<Locator>) -> Self {
        let is_end = next_fragment.is_none();
        Self {
            payload: payload.into(),
            next_fragment,
            is_end,
        }
    }

    /// Payload length in characters
    pub fn char_len(&self) -> usize {
        self.payload.chars().count()
    }

    /// Describe the first structural problem with this record, if any
    pub fn defect(&self) -> Option<String> {
        let len = self.char_len();
        if len > MAX_FRAGMENT_LEN {
            return Some(format!(
                "payload holds {} characters (max {})",
                len, MAX_FRAGMENT_LEN
            ));
        }
        if self.is_end != self.next_fragment.is_none() {
            return Some(format!(
                "end marker is {} but next fragment is {:?}",
                self.is_end,
                self.next_fragment.as_ref().map(Locator::as_str)
            ));
        }
        None
    }
}
