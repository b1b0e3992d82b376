//! JSON output formatter

use super::FormatError;
use serde::Serialize;

/// Format any serializable value as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}
