//! Helpers shared by the repositories.

use log::warn;
use serde::de::DeserializeOwned;

/// Maximum number of bound values per `IN (...)` list; SQLite's default
/// variable limit is 999.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks small enough for one `IN (...)` query.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Decodes a JSON text column, falling back to the default (and logging)
/// when the stored value is malformed.
pub fn decode_json_column<T: DeserializeOwned + Default>(column: &str, raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Malformed JSON in column {}: {}", column, e);
        T::default()
    })
}
