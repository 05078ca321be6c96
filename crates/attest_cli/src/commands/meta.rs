//! Meta commands that operate on the CLI itself.

use std::error::Error;

use clap::CommandFactory;

/// Generate shell completions on stdout.
pub(crate) fn handle_completions(shell: clap_complete::Shell) -> Result<(), Box<dyn Error>> {
    let mut cmd = crate::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
