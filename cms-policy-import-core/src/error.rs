//! Error types for template loading and provisioning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the template or talking to the CMS.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The template file could not be read from disk.
    #[error("Failed to read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template file is not a valid RBAC document.
    #[error("Failed to parse template {}: {source}", .path.display())]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The login endpoint rejected the admin credentials.
    #[error("Authentication failed ({status}): {body}")]
    Authentication {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The API answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Transport-level failure (connect, timeout, malformed response body).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A payload could not be serialized for submission.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
