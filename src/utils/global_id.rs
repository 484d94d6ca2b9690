//! Relay-style global identifiers: `base64("<Type>:<id>")`.

use crate::api::error::AppError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const ACTUALITY: &str = "Actuality";
pub const PHOTO: &str = "Photo";
pub const VIDEO: &str = "Video";
pub const TAG: &str = "Tag";
pub const PRODUCTION: &str = "Production";

pub fn encode_global_id(type_name: &str, id: i32) -> String {
    STANDARD.encode(format!("{type_name}:{id}"))
}

/// Decodes a global id and checks it belongs to `expected_type`.
pub fn decode_global_id(expected_type: &str, global_id: &str) -> Result<i32, AppError> {
    let invalid = || AppError::InvalidId(global_id.to_string());

    let bytes = STANDARD.decode(global_id.trim()).map_err(|_| invalid())?;
    let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (type_name, id) = raw.split_once(':').ok_or_else(invalid)?;

    if type_name != expected_type {
        return Err(invalid());
    }

    id.parse::<i32>().map_err(|_| invalid())
}

pub fn decode_global_ids<'a, I>(expected_type: &str, global_ids: I) -> Result<Vec<i32>, AppError>
where
    I: IntoIterator<Item = &'a String>,
{
    global_ids
        .into_iter()
        .map(|id| decode_global_id(expected_type, id))
        .collect()
}
