//! Command-line interface for the StudyQuest backend.

use clap::{Parser, Subcommand};

/// StudyQuest - study tracking backend
#[derive(Parser)]
#[command(name = "studyquest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a credential record for a password
    HashPassword {
        password: String,
    },

    /// Check a password against a credential record
    VerifyPassword {
        password: String,

        /// Record in `<hex_digest>.<hex_salt>` form
        record: String,
    },
}

impl Cli {
    /// The subcommand to run, falling back to `serve`.
    #[must_use]
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Serve { port: None })
    }
}
