//! attest - a typed async client for the GitHub Checks API.
//!
//! This library maps the check-runs resource onto strongly-typed Rust
//! operations, in two calling conventions: plain `async` methods on
//! [`ChecksClient`], and lazy streams on [`ObservableChecksClient`].
//!
//! Repositories are addressed through [`RepoAddress`], which accepts either
//! an `owner/name` slug or a numeric repository id; both resolve to the same
//! remote entity.
//!
//! # Example
//!
//! ```ignore
//! use attest::checks::{CheckRunUpdate, CheckStatus, NewCheckRun};
//! use attest::{ChecksClient, Credential, RepoAddress};
//!
//! let client = ChecksClient::new(Credential::installation(installation_token))?;
//! let repo = RepoAddress::slug("acme", "widgets");
//!
//! let run = client
//!     .create(&repo, &NewCheckRun::new("build", head_sha).with_status(CheckStatus::Queued))
//!     .await?;
//!
//! let run = client
//!     .update(&repo, run.id, &CheckRunUpdate::new().with_status(CheckStatus::InProgress))
//!     .await?;
//! ```

pub mod address;
pub mod auth;
pub mod checks;
pub mod error;
pub mod http;
pub mod pagination;
pub mod rate_limit;
pub mod retry;

pub use address::RepoAddress;
pub use auth::Credential;
pub use checks::{ChecksClient, ObservableChecksClient};
pub use error::{Error, Result, is_rate_limit_error, short_error_message};
pub use pagination::PageInfo;
pub use rate_limit::{ApiRateLimiter, DEFAULT_RPS, RateLimitInfo};
