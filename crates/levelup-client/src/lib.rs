mod batch;
pub mod commands;
pub mod contracts;
pub mod error;
mod ledger;
pub mod matching;
pub mod migrations;
pub mod setup;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

/// Contract version stamped on every success envelope.
pub const API_VERSION: &str = "v1";
