//! Shared key layout for the import bucket.
//!
//! Uploads land under `uploaded/`; once a file has been parsed it is moved to the same name
//! under `parsed/`.

use crate::traits::{StorageError, StorageResult};
use storefront_core::constants::{DONE_PREFIX, INCOMING_PREFIX};

/// Key an upload for `file_name` is written to.
pub fn incoming_key(file_name: &str) -> String {
    format!("{}{}", INCOMING_PREFIX, file_name)
}

pub fn is_incoming(key: &str) -> bool {
    key.starts_with(INCOMING_PREFIX)
}

/// Destination of a parsed incoming object, or `None` for keys outside `uploaded/`.
pub fn done_key_for(key: &str) -> Option<String> {
    key.strip_prefix(INCOMING_PREFIX)
        .map(|rest| format!("{}{}", DONE_PREFIX, rest))
}

/// Decode an object key as it appears in a bucket event notification.
///
/// Event keys are form-encoded: `+` stands for a space and everything else is percent-encoded.
pub fn decode_event_key(raw: &str) -> StorageResult<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| StorageError::InvalidKey(format!("Undecodable event key {}: {}", raw, e)))
}
