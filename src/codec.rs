//! Boundary over the YAML codec.
//!
//! Everything that touches the on-disk text format goes through this module;
//! the rest of the crate deals in decoded values only. Callers attach the
//! file path when wrapping a decode failure, since only they know which
//! document the bytes came from.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Decode a YAML document.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_slice(bytes)
}

/// Encode `value` as a YAML document.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_yaml::Error> {
    Ok(serde_yaml::to_string(value)?.into_bytes())
}
