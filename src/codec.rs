//! JSON wire codec.
//!
//! Every structured body that crosses the engine goes through these two
//! functions, so the body format is decided in one place.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Content type of bodies produced by [`encode`].
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize a value into a JSON body.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Deserialize a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(bytes)
}
