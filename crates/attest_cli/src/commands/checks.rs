//! Check-run subcommand handlers.

use std::error::Error;

use clap::ValueEnum;
use futures::TryStreamExt;
use serde::Serialize;
use tabled::{Table, Tabled};

use attest::checks::{
    CheckAnnotation, CheckConclusion, CheckRun, CheckRunFilter, CheckRunSelector, CheckRunUpdate,
    CheckStatus, ChecksClient, NewCheckRun, ObservableChecksClient,
};
use attest::retry::with_retry;
use attest::{RepoAddress, is_rate_limit_error};

use crate::commands::limits::OutputFormat;
use crate::config::Config;

/// Check-run status accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum StatusArg {
    Queued,
    InProgress,
    Completed,
}

impl From<StatusArg> for CheckStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Queued => CheckStatus::Queued,
            StatusArg::InProgress => CheckStatus::InProgress,
            StatusArg::Completed => CheckStatus::Completed,
        }
    }
}

/// Check-run conclusion accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ConclusionArg {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Success,
    Skipped,
    Stale,
    TimedOut,
}

impl From<ConclusionArg> for CheckConclusion {
    fn from(arg: ConclusionArg) -> Self {
        match arg {
            ConclusionArg::ActionRequired => CheckConclusion::ActionRequired,
            ConclusionArg::Cancelled => CheckConclusion::Cancelled,
            ConclusionArg::Failure => CheckConclusion::Failure,
            ConclusionArg::Neutral => CheckConclusion::Neutral,
            ConclusionArg::Success => CheckConclusion::Success,
            ConclusionArg::Skipped => CheckConclusion::Skipped,
            ConclusionArg::Stale => CheckConclusion::Stale,
            ConclusionArg::TimedOut => CheckConclusion::TimedOut,
        }
    }
}

/// Client for read operations; any configured token will do.
pub(crate) fn read_client(config: &Config) -> Result<ChecksClient, Box<dyn Error>> {
    let credential = config.read_credential().ok_or(
        "A GitHub token is required. Set ATTEST_GITHUB_TOKEN or [github].token in the config file.",
    )?;
    Ok(ChecksClient::with_api_root(&config.api_root(), credential)?)
}

/// Client for mutating operations; refuses to run without an installation
/// token, since the API rejects check-run mutations from user tokens.
fn write_client(config: &Config) -> Result<ChecksClient, Box<dyn Error>> {
    let credential = config.write_credential().ok_or(
        "An installation token is required to create or update check runs. \
         Set ATTEST_GITHUB_INSTALLATION or [github].installation in the config file.",
    )?;
    Ok(ChecksClient::with_api_root(&config.api_root(), credential)?)
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn handle_create(
    config: &Config,
    repo: &str,
    name: String,
    head_sha: String,
    status: Option<StatusArg>,
    details_url: Option<String>,
    external_id: Option<String>,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let addr: RepoAddress = repo.parse()?;
    let client = write_client(config)?;

    let mut new_run = NewCheckRun::new(name, head_sha);
    if let Some(status) = status {
        new_run = new_run.with_status(status.into());
    }
    if let Some(url) = details_url {
        new_run = new_run.with_details_url(url);
    }
    if let Some(id) = external_id {
        new_run = new_run.with_external_id(id);
    }

    let run = with_retry(
        || client.create(&addr, &new_run),
        is_rate_limit_error,
        "create check run",
    )
    .await?;

    tracing::info!(id = run.id, "created check run");
    print_runs(&[run], output)
}

pub(crate) async fn handle_update(
    config: &Config,
    repo: &str,
    id: u64,
    name: Option<String>,
    status: Option<StatusArg>,
    conclusion: Option<ConclusionArg>,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let addr: RepoAddress = repo.parse()?;
    let client = write_client(config)?;

    let mut update = CheckRunUpdate::new();
    if let Some(name) = name {
        update = update.with_name(name);
    }
    if let Some(status) = status {
        update = update.with_status(status.into());
    }
    if let Some(conclusion) = conclusion {
        update = update.with_conclusion(conclusion.into());
    }

    let run = with_retry(
        || client.update(&addr, id, &update),
        is_rate_limit_error,
        "update check run",
    )
    .await?;

    print_runs(&[run], output)
}

pub(crate) async fn handle_get(
    config: &Config,
    repo: &str,
    id: u64,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let addr: RepoAddress = repo.parse()?;
    let client = read_client(config)?;

    let run = client.get(&addr, id).await?;
    print_runs(&[run], output)
}

pub(crate) async fn handle_list(
    config: &Config,
    repo: &str,
    git_ref: &str,
    check_name: Option<String>,
    status: Option<StatusArg>,
    all: bool,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let addr: RepoAddress = repo.parse()?;
    let client = ObservableChecksClient::new(read_client(config)?);

    let mut filter = CheckRunFilter::new();
    if let Some(name) = check_name {
        filter = filter.with_check_name(name);
    }
    if let Some(status) = status {
        filter = filter.with_status(status.into());
    }
    if all {
        filter = filter.with_selector(CheckRunSelector::All);
    }

    let runs: Vec<CheckRun> = client
        .for_reference(&addr, git_ref, &filter)
        .try_collect()
        .await?;

    print_runs(&runs, output)
}

pub(crate) async fn handle_annotations(
    config: &Config,
    repo: &str,
    id: u64,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let addr: RepoAddress = repo.parse()?;
    let client = read_client(config)?;

    let annotations = client.list_annotations(&addr, id).await?;
    print_annotations(&annotations, output)
}

/// One row of check-run output.
#[derive(Debug, Clone, Serialize, Tabled)]
struct CheckRunDisplay {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Conclusion")]
    conclusion: String,
    #[tabled(rename = "Head SHA")]
    head_sha: String,
}

impl From<&CheckRun> for CheckRunDisplay {
    fn from(run: &CheckRun) -> Self {
        Self {
            id: run.id,
            name: run.name.clone(),
            status: run.status.as_str().to_string(),
            conclusion: run
                .conclusion
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            head_sha: run.head_sha.clone(),
        }
    }
}

fn print_runs(runs: &[CheckRun], output: OutputFormat) -> Result<(), Box<dyn Error>> {
    let rows: Vec<CheckRunDisplay> = runs.iter().map(CheckRunDisplay::from).collect();
    match output {
        OutputFormat::Table if rows.is_empty() => println!("No check runs."),
        OutputFormat::Table => println!("{}", Table::new(&rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

/// One row of annotation output.
#[derive(Debug, Clone, Serialize, Tabled)]
struct AnnotationDisplay {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Lines")]
    lines: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&CheckAnnotation> for AnnotationDisplay {
    fn from(annotation: &CheckAnnotation) -> Self {
        let lines = if annotation.start_line == annotation.end_line {
            annotation.start_line.to_string()
        } else {
            format!("{}-{}", annotation.start_line, annotation.end_line)
        };
        Self {
            path: annotation.path.clone(),
            lines,
            level: format!("{:?}", annotation.annotation_level).to_lowercase(),
            message: annotation.message.clone(),
        }
    }
}

fn print_annotations(
    annotations: &[CheckAnnotation],
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let rows: Vec<AnnotationDisplay> = annotations.iter().map(AnnotationDisplay::from).collect();
    match output {
        OutputFormat::Table if rows.is_empty() => println!("No annotations."),
        OutputFormat::Table => println!("{}", Table::new(&rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}
