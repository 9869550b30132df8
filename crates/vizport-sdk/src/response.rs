//! Interpreting response fields
//!
//! The wire carries no status. The conventions below are applied per
//! command by the session, never by the connector.

use crate::error::{SdkError, SdkResult};

/// Whether `fields` is the single-empty-field sentinel
pub fn is_empty_sentinel(fields: &[String]) -> bool {
    matches!(fields, [only] if only.is_empty())
}

/// Result of a command with no return value
///
/// The sentinel means success; anything else is the application's error
/// message.
pub fn expect_void(command: &str, fields: Vec<String>) -> SdkResult<()> {
    if is_empty_sentinel(&fields) || fields.is_empty() {
        Ok(())
    } else {
        Err(SdkError::remote(command, &fields))
    }
}

/// Result of a listing command
///
/// The sentinel means "no items". A real single empty name can't be told
/// apart from it and is dropped too.
pub fn expect_list(fields: Vec<String>) -> Vec<String> {
    if is_empty_sentinel(&fields) {
        Vec::new()
    } else {
        fields
    }
}
