//! Record codec
//!
//! Records are stored as pretty-printed JSON documents so they stay readable
//! when inspecting the data directory by hand.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FatError, Result};

/// Encode a record to bytes
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(record).map_err(|e| FatError::Serialization(e.to_string()))
}

/// Decode a record from bytes
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| FatError::Serialization(e.to_string()))
}
