// This is the entry point of the letter writer.
//
// **Architecture Overview:**
// - `core/` = Business logic (drafts, letters, auth session)
// - `infra/` = Implementations of core traits (files, Google APIs)
// - `cli/` = Command-line adapter (argument parsing, output)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Dispatch the requested command

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::cli::args::{Cli, Command};
use crate::cli::{commands, Data};
use crate::core::auth::{AuthSession, IdentityProvider};
use crate::core::drafts::{DraftService, KeyValueStore};
use crate::core::letters::{LetterService, UploadFormat, LETTERS_FOLDER_NAME};
use crate::infra::drafts::{InMemoryKeyValueStore, JsonFileKeyValueStore};
use crate::infra::google_auth::{EnvTokenProvider, ServiceAccountProvider, UnavailableProvider};
use crate::infra::google_drive::{GoogleDriveClient, DEFAULT_DRIVE_BASE_URL};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_AUTOSAVE_SECS: u64 = 30;

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
struct Settings {
    data_dir: PathBuf,
    drive_base_url: String,
    folder_name: String,
    upload_format: UploadFormat,
    autosave_interval: Duration,
}

impl Settings {
    fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let upload_format = match lookup("LETTER_UPLOAD_FORMAT") {
            Some(raw) => raw.parse::<UploadFormat>().map_err(anyhow::Error::msg)?,
            None => UploadFormat::default(),
        };

        let autosave_secs = match lookup("AUTOSAVE_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "AUTOSAVE_INTERVAL_SECS must be a positive number, got '{}'",
                        raw
                    )
                })?,
            None => DEFAULT_AUTOSAVE_SECS,
        };

        Ok(Self {
            data_dir: lookup("LETTER_WRITER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            drive_base_url: lookup("DRIVE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DRIVE_BASE_URL.to_string()),
            folder_name: lookup("LETTERS_FOLDER_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| LETTERS_FOLDER_NAME.to_string()),
            upload_format,
            autosave_interval: Duration::from_secs(autosave_secs),
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Picks the configured identity. A broken service-account setup only
/// affects commands that sign in; local draft commands still run.
async fn identity_provider() -> Box<dyn IdentityProvider> {
    match ServiceAccountProvider::from_env().await {
        Ok(Some(provider)) => {
            tracing::debug!("Using service account identity");
            return Box::new(provider);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::debug!("Service account is unusable: {}", e);
            return Box::new(UnavailableProvider::new(e.to_string()));
        }
    }

    let provider = EnvTokenProvider::from_env();
    if !provider.has_token() {
        tracing::debug!("No GOOGLE_ACCESS_TOKEN set; Drive commands will not be able to sign in");
    }
    Box::new(provider)
}

fn build_data(
    settings: &Settings,
    ephemeral: bool,
    identity: Box<dyn IdentityProvider>,
) -> anyhow::Result<Data> {
    let store: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(InMemoryKeyValueStore::new())
    } else {
        Box::new(JsonFileKeyValueStore::new(
            settings.data_dir.join("drafts.json"),
        ))
    };
    let drafts = Arc::new(DraftService::new(store));

    let session = Arc::new(AuthSession::new(identity));

    let drive_client = GoogleDriveClient::with_base_url(settings.drive_base_url.clone())?;
    let letters = Arc::new(
        LetterService::new(drive_client, Arc::clone(&session))
            .with_folder_name(settings.folder_name.clone())
            .with_upload_format(settings.upload_format),
    );

    Ok(Data {
        session,
        drafts,
        letters,
        autosave_interval: settings.autosave_interval,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();
    let settings = Settings::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let data = build_data(&settings, cli.ephemeral, identity_provider().await)?;

    match cli.command {
        Command::Draft { command } => commands::draft::run(&data, command).await,
        Command::Compose(args) => commands::compose::run(&data, args).await,
        Command::Letters { command } => commands::letters::run(&data, command).await,
        Command::Auth { command } => commands::auth::run(&data, command).await,
    }
}
