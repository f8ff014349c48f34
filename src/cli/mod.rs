//! CLI module - Command-line interface for notekeeper
//!
//! `serve` runs the HTTP server; the remaining commands are a text front end
//! over [`crate::clients::NotesClient`].

mod commands;

use clap::{Args, Parser, Subcommand};

use crate::constants::http::DEFAULT_SERVER_URL;

/// notekeeper - a small notes server with session login
#[derive(Parser)]
#[command(name = "notekeeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create default config file
    Init,

    /// Create an account on a running server
    Signup {
        #[command(flatten)]
        server: ServerArgs,
        /// Email address for the new account
        #[arg(long)]
        email: String,
    },

    /// Show the account the credentials belong to
    Whoami {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Manage notes on a running server
    Notes {
        #[command(flatten)]
        server: ServerArgs,
        #[command(subcommand)]
        command: NoteCommands,
    },
}

/// Connection and credentials shared by the client commands.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Base URL of the notekeeper server
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    #[arg(long, short)]
    pub username: String,

    #[arg(long, short)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// List all notes
    #[command(alias = "ls")]
    List,
    /// Show a single note
    Show {
        /// Note ID
        id: String,
    },
    /// Create a note
    Add {
        title: String,
        /// Note body
        #[arg(long)]
        text: Option<String>,
    },
    /// Replace a note's title and text
    Edit {
        /// Note ID
        id: String,
        title: String,
        /// New body; omitted clears it
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: String,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["notekeeper"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_note_edit() {
        let cli = Cli::try_parse_from([
            "notekeeper",
            "notes",
            "-u",
            "alice",
            "-p",
            "secret",
            "edit",
            "some-id",
            "New title",
            "--text",
            "body",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Notes {
                server,
                command: NoteCommands::Edit { id, title, text },
            }) => {
                assert_eq!(server.server, DEFAULT_SERVER_URL);
                assert_eq!(server.username, "alice");
                assert_eq!(id, "some-id");
                assert_eq!(title, "New title");
                assert_eq!(text.as_deref(), Some("body"));
            }
            _ => panic!("expected notes edit"),
        }
    }
}
