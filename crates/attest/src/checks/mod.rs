//! Check-run operations.
//!
//! This module provides the typed client for the check-runs resource in both
//! calling conventions.
//!
//! # Module Structure
//!
//! - [`types`] - Request/response data structures and enums
//! - [`client`] - The task-based client
//! - [`stream`] - The observable (stream-based) adapter
//!
//! # Example
//!
//! ```ignore
//! use attest::checks::{ChecksClient, NewCheckRun};
//! use attest::{Credential, RepoAddress};
//!
//! let client = ChecksClient::new(Credential::installation(token))?;
//!
//! // Either addressing form reaches the same repository
//! let by_slug = RepoAddress::slug("acme", "widgets");
//! let by_id = RepoAddress::id(5430905);
//!
//! let run = client
//!     .create(&by_slug, &NewCheckRun::new("build", head_sha))
//!     .await?;
//! ```

pub mod client;
pub mod stream;
pub mod types;

// Re-export the client
pub use client::{ChecksClient, GITHUB_API_ROOT};

// Re-export the observable adapter
pub use stream::ObservableChecksClient;

// Re-export data types
pub use types::{
    AnnotationLevel, CheckAnnotation, CheckConclusion, CheckRun, CheckRunFilter, CheckRunList,
    CheckRunOutput, CheckRunSelector, CheckRunUpdate, CheckStatus, NewCheckRun, NewCheckRunOutput,
};
