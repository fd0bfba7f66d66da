use std::{fmt::Display, path::Path, path::PathBuf};

use thiserror::Error;

/// Errors produced by the fetch and render stages.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The remote service answered with a non-2xx status.
    #[error("request to {url} failed with status {status}: {body}")]
    RemoteRequest {
        url: String,
        status: u16,
        body: String,
    },

    /// The request timed out or no connection could be established.
    #[error("{url} is unavailable: {source}")]
    RemoteUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not JSON, or a required field was missing or mistyped.
    #[error("malformed response: field `{field}`: {detail}")]
    MalformedResponse { field: String, detail: String },

    /// A chart or document could not be written.
    #[error("failed to render {}: {detail}", path.display())]
    Render { path: PathBuf, detail: String },

    #[error("invalid endpoint '{url}': {detail}")]
    InvalidEndpoint { url: String, detail: String },
}

impl ReportError {
    pub fn malformed(field: impl Into<String>, detail: impl Display) -> Self {
        Self::MalformedResponse {
            field: field.into(),
            detail: detail.to_string(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::malformed(field, "missing from response")
    }

    pub fn render(path: &Path, detail: impl Display) -> Self {
        Self::Render {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }

    /// True for errors raised before any artifact is rendered.
    pub fn is_fetch(&self) -> bool {
        !matches!(self, Self::Render { .. })
    }

    /// HTTP status carried by a [`ReportError::RemoteRequest`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
