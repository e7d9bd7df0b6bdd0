use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "letter-writer",
    version,
    about = "Write letters locally and keep them as Google Docs in Drive"
)]
pub struct Cli {
    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keep the draft in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with the local draft.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Type a letter on stdin, autosaving as you go.
    Compose(ComposeArgs),

    /// Letters stored in Google Drive.
    Letters {
        #[command(subcommand)]
        command: LettersCommand,
    },

    /// Sign-in status.
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Print the current draft.
    Show,

    /// Set the draft title and save.
    Title { title: String },

    /// Replace the draft content (HTML) and save.
    Content(ContentArgs),

    /// Save the draft as it is, refreshing its timestamp.
    Save,

    /// Delete the draft.
    Clear,
}

#[derive(Args, Debug)]
pub struct ContentArgs {
    /// HTML content.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub html: Option<String>,

    /// Read the HTML content from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Set the title before writing.
    #[arg(long)]
    pub title: Option<String>,

    /// Upload to Drive once input ends.
    #[arg(long)]
    pub send: bool,
}

#[derive(Subcommand, Debug)]
pub enum LettersCommand {
    /// Upload the current draft as a new Google Doc.
    Send,

    /// List letters in the Drive folder.
    List {
        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the Drive folder id, creating the folder if needed.
    Folder,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in with the configured identity and show who you are.
    Status,

    /// Sign in, then sign out again, revoking any token this tool obtained.
    SignOut,
}
