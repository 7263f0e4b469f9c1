//! API problem documents for failed operations.
//!
//! Every failure the controller can recover from ends up here: a status code
//! and a detail (plain text or an error value) become a [`ProblemDocument`]
//! with the fields `describedBy`, `title`, `httpStatus` and `detail`.
//! Rendering also sets the status line of the in-flight response.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;

/// Content type for problem documents under the JSON representation.
pub const API_PROBLEM_CONTENT_TYPE: &str = "application/api-problem+json";

/// Reference used when no problem type URI is supplied.
pub const DEFAULT_DESCRIBED_BY: &str = "http://www.w3.org/Protocols/rfc2616/rfc2616-sec10.html";

/// Title used when the status has no well-known title.
pub const DEFAULT_TITLE: &str = "Unknown";

/// Structured error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDocument {
    /// URI reference describing the problem type
    pub described_by: String,
    /// Short, human-readable summary
    pub title: String,
    /// HTTP status code of this occurrence
    pub http_status: u16,
    /// Human-readable explanation of this occurrence
    pub detail: String,
}

/// Detail handed to the renderer.
#[derive(Debug)]
pub enum ProblemDetail<'a> {
    /// Ready-made text
    Text(String),
    /// An error whose message (and optionally causes) becomes the text
    Error(&'a (dyn Error + 'static)),
}

impl<'a> ProblemDetail<'a> {
    pub fn error(error: &'a (dyn Error + 'static)) -> Self {
        Self::Error(error)
    }
}

impl From<&str> for ProblemDetail<'_> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ProblemDetail<'_> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Renders problem documents.
#[derive(Debug, Clone)]
pub struct ProblemRenderer {
    detail_includes_stack_trace: bool,
    status_titles: BTreeMap<u16, String>,
}

impl Default for ProblemRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemRenderer {
    /// Renderer with the standard title table and message-only details.
    pub fn new() -> Self {
        let status_titles = [
            (404, "Not Found"),
            (409, "Conflict"),
            (422, "Unprocessable Entity"),
            (500, "Internal Server Error"),
        ]
        .into_iter()
        .map(|(status, title)| (status, title.to_string()))
        .collect();

        Self {
            detail_includes_stack_trace: false,
            status_titles,
        }
    }

    /// Include the debug representation of an error and its causes in the
    /// detail.
    pub fn with_stack_trace(mut self, flag: bool) -> Self {
        self.detail_includes_stack_trace = flag;
        self
    }

    /// Add or replace the title used for a status.
    pub fn with_status_title(mut self, status: u16, title: impl Into<String>) -> Self {
        self.status_titles.insert(status, title.into());
        self
    }

    pub fn detail_includes_stack_trace(&self) -> bool {
        self.detail_includes_stack_trace
    }

    /// Well-known title for a status, if any.
    pub fn title_for(&self, status: u16) -> Option<&str> {
        self.status_titles.get(&status).map(String::as_str)
    }

    /// Render a problem document and set the response status.
    ///
    /// The title table only applies when neither `described_by` nor `title`
    /// is overridden; passing the default values counts as not overriding.
    /// Status codes the `http` crate rejects put 500 on the status line but
    /// are kept verbatim in the document.
    pub fn render(
        &self,
        response_status: &mut StatusCode,
        http_status: u16,
        detail: ProblemDetail<'_>,
        described_by: Option<&str>,
        title: Option<&str>,
    ) -> ProblemDocument {
        let described_by = described_by.unwrap_or(DEFAULT_DESCRIBED_BY);
        let mut title = title.unwrap_or(DEFAULT_TITLE);

        if title == DEFAULT_TITLE && described_by == DEFAULT_DESCRIBED_BY {
            if let Some(known) = self.title_for(http_status) {
                title = known;
            }
        }

        let detail = match detail {
            ProblemDetail::Text(text) => text,
            ProblemDetail::Error(error) => self.detail_from_error(error),
        };

        *response_status =
            StatusCode::from_u16(http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        ProblemDocument {
            described_by: described_by.to_string(),
            title: title.to_string(),
            http_status,
            detail,
        }
    }

    /// Text for an error detail.
    ///
    /// Message only by default. With stack traces enabled, every error in
    /// the `source()` chain contributes its message and debug form, newline
    /// joined.
    pub fn detail_from_error(&self, error: &(dyn Error + 'static)) -> String {
        if !self.detail_includes_stack_trace {
            return error.to_string();
        }

        let mut detail = String::new();
        let mut current = Some(error);
        while let Some(e) = current {
            detail.push_str(&e.to_string());
            detail.push('\n');
            detail.push_str(&format!("{:?}", e));
            detail.push('\n');
            current = e.source();
        }
        detail.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    fn render(renderer: &ProblemRenderer, status: u16, detail: &str) -> (StatusCode, ProblemDocument) {
        let mut response_status = StatusCode::OK;
        let problem = renderer.render(&mut response_status, status, detail.into(), None, None);
        (response_status, problem)
    }

    #[test]
    fn test_known_status_title() {
        let (status, problem) = render(&ProblemRenderer::new(), 404, "Item not found.");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(problem.title, "Not Found");
        assert_eq!(problem.described_by, DEFAULT_DESCRIBED_BY);
        assert_eq!(problem.http_status, 404);
        assert_eq!(problem.detail, "Item not found.");
    }

    #[test]
    fn test_unmapped_status_is_unknown() {
        let (status, problem) = render(&ProblemRenderer::new(), 418, "short and stout");
        assert_eq!(status.as_u16(), 418);
        assert_eq!(problem.title, "Unknown");
        assert_eq!(problem.described_by, DEFAULT_DESCRIBED_BY);
    }

    #[test]
    fn test_overrides_skip_title_table() {
        let renderer = ProblemRenderer::new();
        let mut status = StatusCode::OK;

        let problem = renderer.render(
            &mut status,
            404,
            "gone".into(),
            Some("https://example.com/problems/gone"),
            None,
        );
        assert_eq!(problem.title, "Unknown");
        assert_eq!(problem.described_by, "https://example.com/problems/gone");

        let problem = renderer.render(&mut status, 409, "dup".into(), None, Some("Duplicate"));
        assert_eq!(problem.title, "Duplicate");
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_custom_status_title() {
        let renderer = ProblemRenderer::new().with_status_title(418, "I'm a teapot");
        let (_, problem) = render(&renderer, 418, "short and stout");
        assert_eq!(problem.title, "I'm a teapot");
    }

    #[test]
    fn test_error_detail_message_only() {
        let error = BackendError::creation("failed")
            .with_source(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let detail = ProblemRenderer::new().detail_from_error(&error);
        assert_eq!(detail, "failed");
    }

    #[test]
    fn test_error_detail_with_causes() {
        let error = BackendError::creation("failed")
            .with_source(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let detail = ProblemRenderer::new()
            .with_stack_trace(true)
            .detail_from_error(&error);

        let lines: Vec<&str> = detail.lines().collect();
        assert_eq!(lines[0], "failed");
        assert!(lines[1].starts_with("Creation"));
        assert!(lines.contains(&"disk full"));
        assert!(!detail.ends_with('\n'));
    }

    #[test]
    fn test_invalid_status_code_falls_back_on_status_line() {
        let (status, problem) = render(&ProblemRenderer::new(), 42, "odd");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.http_status, 42);
    }

    #[test]
    fn test_problem_round_trip() {
        let (_, problem) = render(&ProblemRenderer::new(), 422, "Unable to delete item.");
        let json = serde_json::to_string(&problem).unwrap();
        assert!(json.contains("\"describedBy\""));
        assert!(json.contains("\"httpStatus\":422"));

        let parsed: ProblemDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, problem);
    }
}
