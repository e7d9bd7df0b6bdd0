// Drive commands.
//
// **Pattern:**
// 1. Make sure somebody is signed in
// 2. Call the letter service
// 3. Print the result

use super::auth::ensure_signed_in;
use crate::cli::args::LettersCommand;
use crate::cli::formatting::letter_card;
use crate::cli::{Data, Error};
use crate::core::letters::LetterError;
use chrono::Utc;

pub async fn run(data: &Data, command: LettersCommand) -> Result<(), Error> {
    ensure_signed_in(data).await;

    match command {
        LettersCommand::Send => {
            data.drafts.load().await;
            send(data).await
        }
        LettersCommand::List { json } => list(data, json).await,
        LettersCommand::Folder => {
            let id = data.letters.folder().await.map_err(explain)?;
            tracing::info!("Using Drive folder \"{}\"", data.letters.folder_name());
            println!("{}", id);
            Ok(())
        }
    }
}

/// Uploads the in-memory draft. The draft is kept locally afterwards.
pub async fn send(data: &Data) -> Result<(), Error> {
    let draft = data.drafts.current().await;
    let letter = data
        .letters
        .save_draft_to_drive(&draft)
        .await
        .map_err(explain)?;

    println!("Letter Saved: \"{}\"", letter.name);
    println!("{}", letter.view_link);
    Ok(())
}

async fn list(data: &Data, json: bool) -> Result<(), Error> {
    let letters = data.letters.letters().await.map_err(explain)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&letters)?);
        return Ok(());
    }

    if letters.is_empty() {
        println!("No Letters Found");
        println!("You haven't saved any letters to Google Drive yet.");
        return Ok(());
    }

    let now = Utc::now();
    for letter in &letters {
        println!("{}\n", letter_card(letter, now));
    }
    Ok(())
}

fn explain(err: LetterError) -> Error {
    match err {
        LetterError::NotSignedIn => anyhow::anyhow!(
            "Authentication Required: set GOOGLE_ACCESS_TOKEN or a service account key to use Google Drive"
        ),
        LetterError::TitleRequired => anyhow::anyhow!("Title Required: {}", err),
        LetterError::ContentRequired => anyhow::anyhow!("Content Required: {}", err),
        other => anyhow::Error::new(other),
    }
}
