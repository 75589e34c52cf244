// CLI interface
pub mod commands;

use crate::config::{ConfigStore, CONFIG_FILE_NAME};
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "camunda-cli")]
#[command(
    about = "A TUI for managing Camunda platform credentials and browsing clusters",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path of the platforms file
    #[arg(long, env = "CAMUNDA_CLI_CONFIG", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored platforms (secrets are never printed)
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate shell completion scripts
    ///
    /// INSTALLATION:
    ///
    /// Bash:
    ///   eval "$(camunda-cli completions bash)"    # Add to ~/.bashrc
    ///
    /// Zsh:
    ///   eval "$(camunda-cli completions zsh)"     # Add to ~/.zshrc
    ///
    /// Fish:
    ///   camunda-cli completions fish > ~/.config/fish/completions/camunda-cli.fish
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

pub async fn execute(args: Cli) -> Result<()> {
    let store = ConfigStore::new(args.config);
    match args.command {
        Some(Commands::List { format }) => commands::list::execute(&store, format),
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell);
            Ok(())
        }
        None => {
            // No command specified, launch TUI
            use crate::ui::App;
            let mut app = App::new(store);
            app.run().await
        }
    }
}
