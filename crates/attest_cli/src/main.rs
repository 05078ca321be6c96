//! attest CLI - manage GitHub check runs from the command line.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::checks::{ConclusionArg, StatusArg};
use crate::commands::limits::OutputFormat;

#[derive(Parser)]
#[command(name = "attest")]
#[command(version)]
#[command(about = "Manage GitHub check runs")]
#[command(
    long_about = "Attest creates, updates, and inspects GitHub check runs. Repositories can \
be addressed either as owner/name or by their numeric id; both forms reach \
the same repository."
)]
#[command(after_long_help = r#"EXAMPLES
    Create a queued check run for a commit:
        $ attest create acme/widgets build 4a5b6c7d --status queued

    The same repository, addressed by numeric id:
        $ attest create 5430905 build 4a5b6c7d --status queued

    Move a check run to in-progress and rename it:
        $ attest update acme/widgets 42 --name new-name --status in-progress

    Record a final verdict:
        $ attest update acme/widgets 42 --status completed --conclusion success

    List in-progress runs named "build" for a branch:
        $ attest list acme/widgets my-feature --check-name build --status in-progress

    Generate shell completions:
        $ attest completions bash > ~/.local/share/bash-completion/completions/attest

CONFIGURATION
    Attest reads configuration from:
      1. ~/.config/attest/config.toml (or $XDG_CONFIG_HOME/attest/config.toml)
      2. ./attest.toml
      3. Environment variables (ATTEST_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    ATTEST_GITHUB_TOKEN          User access token (read operations)
    ATTEST_GITHUB_INSTALLATION   App installation token (required for create/update)
    ATTEST_GITHUB_HOST           API root (default: https://api.github.com)
"#)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a check run for a commit
    Create {
        /// Repository as owner/name, or a numeric repository id
        repo: String,

        /// Name of the check
        name: String,

        /// Commit SHA the check reports against
        head_sha: String,

        /// Initial status (server defaults to queued)
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// URL with full details on an external site
        #[arg(long)]
        details_url: Option<String>,

        /// Reference id on an external system
        #[arg(long)]
        external_id: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Update an existing check run
    Update {
        /// Repository as owner/name, or a numeric repository id
        repo: String,

        /// Check run id
        id: u64,

        /// New name for the check run
        #[arg(short, long)]
        name: Option<String>,

        /// New status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Final verdict (meaningful with --status completed)
        #[arg(short, long, value_enum)]
        conclusion: Option<ConclusionArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show a single check run
    Get {
        /// Repository as owner/name, or a numeric repository id
        repo: String,

        /// Check run id
        id: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// List check runs for a commit-ish reference
    List {
        /// Repository as owner/name, or a numeric repository id
        repo: String,

        /// Commit SHA, branch, or tag
        git_ref: String,

        /// Only runs with this check name
        #[arg(short = 'N', long)]
        check_name: Option<String>,

        /// Only runs in this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Include superseded runs, not just the latest per suite
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// List annotations attached to a check run
    Annotations {
        /// Repository as owner/name, or a numeric repository id
        repo: String,

        /// Check run id
        id: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show current rate limit status
    Limits {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("attest=info,attest_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Handle commands that don't require configuration first
    if let Commands::Completions { shell } = &cli.command {
        return commands::meta::handle_completions(*shell);
    }

    let config = config::Config::load();

    match cli.command {
        Commands::Create {
            repo,
            name,
            head_sha,
            status,
            details_url,
            external_id,
            output,
        } => {
            commands::checks::handle_create(
                &config,
                &repo,
                name,
                head_sha,
                status,
                details_url,
                external_id,
                output,
            )
            .await
        }
        Commands::Update {
            repo,
            id,
            name,
            status,
            conclusion,
            output,
        } => {
            commands::checks::handle_update(&config, &repo, id, name, status, conclusion, output)
                .await
        }
        Commands::Get { repo, id, output } => {
            commands::checks::handle_get(&config, &repo, id, output).await
        }
        Commands::List {
            repo,
            git_ref,
            check_name,
            status,
            all,
            output,
        } => {
            commands::checks::handle_list(
                &config, &repo, &git_ref, check_name, status, all, output,
            )
            .await
        }
        Commands::Annotations { repo, id, output } => {
            commands::checks::handle_annotations(&config, &repo, id, output).await
        }
        Commands::Limits { output } => commands::limits::handle_limits(&config, output).await,
        Commands::Completions { .. } => Ok(()),
    }
}
