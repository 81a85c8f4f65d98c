// View controllers: upload, edit and preview pages wired to the API client.

pub mod editor;
pub mod preview;
pub mod upload;

use thiserror::Error;
use tracing::error;

use crate::client::ClientError;
use crate::form::validation::AGGREGATE_NOTICE;
use crate::form::ValidationReport;

pub use editor::EditorView;
pub use preview::PreviewView;
pub use upload::UploadView;

/// Why a user action did not complete. `Display` is the notice shown to the user.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    InputRejected(&'static str),

    #[error("{}", AGGREGATE_NOTICE)]
    Validation { report: ValidationReport },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    MissingData(&'static str),

    #[error("Action already in progress")]
    Busy,

    #[error("Failed to store session data: {0}")]
    Session(#[from] serde_json::Error),
}

impl ActionError {
    /// Maps a transport failure to the server's message, or `fallback` when
    /// the server gave none.
    pub(crate) fn transport(err: ClientError, fallback: &str) -> Self {
        error!("Request failed: {err}");
        let message = err.server_message().unwrap_or(fallback).to_string();
        ActionError::Transport(message)
    }

    pub fn notice(&self) -> String {
        self.to_string()
    }
}
