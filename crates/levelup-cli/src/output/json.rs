use std::io;

use levelup_client::contracts::envelope::failure_from_error;
use levelup_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

/// `{ok, version, data}` for every command; the command name stays internal.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
