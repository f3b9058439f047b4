//! Caller-visible import results.

use crate::error::ImportError;
use crate::sink::Response;
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Success,
    Failure,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Result of an import.
///
/// On success `message` is the id of the created (or reused) release or
/// project, and the counts come from the response tree. Failures that may
/// have left entities behind report `-1` for both counts; failures caught
/// before the first write report `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub request_status: RequestStatus,
    pub total_affected_elements: i64,
    pub total_elements: i64,
    pub message: String,
}

impl RequestSummary {
    #[must_use]
    pub fn success(response: &Response) -> Self {
        Self {
            request_status: RequestStatus::Success,
            total_affected_elements: to_count(response.count_affected()),
            total_elements: to_count(response.count()),
            message: response.id().to_string(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            request_status: RequestStatus::Failure,
            total_affected_elements: 0,
            total_elements: 0,
            message: message.into(),
        }
    }

    /// Failure summary for an error raised during an import.
    ///
    /// The message carries the whole source chain.
    #[must_use]
    pub fn from_error(err: &ImportError) -> Self {
        let mut summary = Self::failure(error_chain(err));
        if err.may_have_written() {
            summary.total_affected_elements = -1;
            summary.total_elements = -1;
        }
        summary
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.request_status == RequestStatus::Success
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !cause_text.is_empty() && !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

fn to_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Message used by [`ImportPreparation`] when the file cannot be read.
pub const ERROR_READ_FILE: &str = "error-read-file";

/// Preview of what an import would create. Produced without writing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreparation {
    pub request_status: Option<RequestStatus>,
    /// Names of every package in the document
    pub component_names: Vec<String>,
    /// `"name version"` of every versioned package
    pub release_names: Vec<String>,
    /// Version of every package, `""` when absent
    pub versions: Vec<String>,
    pub message: String,
}

impl ImportPreparation {
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            request_status: Some(RequestStatus::Failure),
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.request_status == Some(RequestStatus::Success)
    }
}
