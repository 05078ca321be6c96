//! Check-run API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a check run.
///
/// Transitions run `Queued → InProgress → Completed`; `Completed` is
/// terminal and the only state where a conclusion is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
}

impl CheckStatus {
    /// Wire value, as used in query parameters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Queued => "queued",
            CheckStatus::InProgress => "in_progress",
            CheckStatus::Completed => "completed",
        }
    }
}

/// Final verdict of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Success,
    Skipped,
    Stale,
    TimedOut,
}

impl CheckConclusion {
    /// Wire value, as used in query parameters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckConclusion::ActionRequired => "action_required",
            CheckConclusion::Cancelled => "cancelled",
            CheckConclusion::Failure => "failure",
            CheckConclusion::Neutral => "neutral",
            CheckConclusion::Success => "success",
            CheckConclusion::Skipped => "skipped",
            CheckConclusion::Stale => "stale",
            CheckConclusion::TimedOut => "timed_out",
        }
    }
}

/// A check run - fields we need from the API response.
///
/// This struct is used to deserialize API responses. We define only the
/// fields we need, which makes the code resilient to API changes.
///
/// API docs: https://docs.github.com/rest/checks/runs
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    /// Server-assigned check run id.
    pub id: u64,
    /// Name of the check.
    pub name: String,
    /// The commit SHA the check reports against. Immutable once created.
    pub head_sha: String,
    /// Current lifecycle state.
    pub status: CheckStatus,
    /// Final verdict, present only once the run is completed.
    pub conclusion: Option<CheckConclusion>,
    /// Reference id on an external system.
    #[serde(default)]
    pub external_id: Option<String>,
    /// URL with the full details of the run on an external site.
    #[serde(default)]
    pub details_url: Option<String>,
    /// API URL of this run.
    #[serde(default)]
    pub url: Option<String>,
    /// Web URL of this run.
    #[serde(default)]
    pub html_url: Option<String>,
    /// When the run started.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the run completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Output summary, if any was attached.
    #[serde(default)]
    pub output: Option<CheckRunOutput>,
}

/// Output attached to a check run response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunOutput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub annotations_count: u32,
}

/// Response envelope for check-run listings.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunList {
    /// Total matching check runs across all pages.
    pub total_count: u32,
    /// Check runs on this page, in server order.
    pub check_runs: Vec<CheckRun>,
}

/// Severity of a check-run annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

/// A single annotation attached to a check run.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAnnotation {
    /// Path of the annotated file.
    pub path: String,
    /// First annotated line.
    pub start_line: u32,
    /// Last annotated line.
    pub end_line: u32,
    pub annotation_level: AnnotationLevel,
    pub message: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub raw_details: Option<String>,
}

/// Payload for creating a check run.
///
/// `name` and `head_sha` are required and immutable; everything else is
/// optional and omitted from the JSON body when unset (the server then
/// applies its own defaults, e.g. status `queued`).
#[derive(Debug, Clone, Serialize)]
pub struct NewCheckRun {
    pub name: String,
    pub head_sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<NewCheckRunOutput>,
}

impl NewCheckRun {
    /// Create a payload for `name` reporting against `head_sha`.
    pub fn new(name: impl Into<String>, head_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head_sha: head_sha.into(),
            status: None,
            conclusion: None,
            details_url: None,
            external_id: None,
            started_at: None,
            completed_at: None,
            output: None,
        }
    }

    /// Set the initial status.
    #[must_use]
    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the conclusion (implies a completed run).
    #[must_use]
    pub fn with_conclusion(mut self, conclusion: CheckConclusion) -> Self {
        self.conclusion = Some(conclusion);
        self
    }

    /// Set the external details URL.
    #[must_use]
    pub fn with_details_url(mut self, url: impl Into<String>) -> Self {
        self.details_url = Some(url.into());
        self
    }

    /// Set the external reference id.
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Attach output.
    #[must_use]
    pub fn with_output(mut self, output: NewCheckRunOutput) -> Self {
        self.output = Some(output);
        self
    }
}

/// Partial update for an existing check run.
///
/// Unset fields are omitted from the payload entirely (never sent as null),
/// so the server leaves the corresponding remote state unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckRunUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<NewCheckRunOutput>,
}

impl CheckRunUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the check run.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Move the run to a new status.
    #[must_use]
    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Record the final verdict.
    #[must_use]
    pub fn with_conclusion(mut self, conclusion: CheckConclusion) -> Self {
        self.conclusion = Some(conclusion);
        self
    }

    /// Set when the run completed.
    #[must_use]
    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Attach output.
    #[must_use]
    pub fn with_output(mut self, output: NewCheckRunOutput) -> Self {
        self.output = Some(output);
        self
    }
}

/// Output payload for create/update requests.
#[derive(Debug, Clone, Serialize)]
pub struct NewCheckRunOutput {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl NewCheckRunOutput {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            text: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Which check runs a listing should return for a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRunSelector {
    /// Only the latest run per check suite (the API default).
    Latest,
    /// Every run, including superseded ones.
    All,
}

impl CheckRunSelector {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckRunSelector::Latest => "latest",
            CheckRunSelector::All => "all",
        }
    }
}

/// Server-side filter for check-run listings.
#[derive(Debug, Clone, Default)]
pub struct CheckRunFilter {
    /// Only runs with this check name.
    pub check_name: Option<String>,
    /// Only runs in this status.
    pub status: Option<CheckStatus>,
    /// Latest-per-suite vs all runs.
    pub selector: Option<CheckRunSelector>,
}

impl CheckRunFilter {
    /// An empty filter (everything the reference has).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by check name.
    #[must_use]
    pub fn with_check_name(mut self, name: impl Into<String>) -> Self {
        self.check_name = Some(name.into());
        self
    }

    /// Filter by status.
    #[must_use]
    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Choose between latest-per-suite and all runs.
    #[must_use]
    pub fn with_selector(mut self, selector: CheckRunSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Render as query parameters, in a stable order.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref name) = self.check_name {
            pairs.push(("check_name", name.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(selector) = self.selector {
            pairs.push(("filter", selector.as_str().to_string()));
        }
        pairs
    }
}
