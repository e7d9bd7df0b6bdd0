// Compose mode: every stdin line becomes a paragraph of the draft while the
// autosave timer runs in the background.

use super::auth::ensure_signed_in;
use super::letters::send;
use crate::cli::args::ComposeArgs;
use crate::cli::{Data, Error};
use crate::core::drafts::spawn_autosave;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(data: &Data, args: ComposeArgs) -> Result<(), Error> {
    data.drafts.load().await;
    if let Some(title) = args.title {
        data.drafts.set_title(title).await;
    }

    let autosave = spawn_autosave(Arc::clone(&data.drafts), data.autosave_interval);
    tracing::info!(
        "Autosaving every {}s; end input with Ctrl-D",
        data.autosave_interval.as_secs()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = async {
        while let Some(line) = lines.next_line().await? {
            let mut content = data.drafts.current().await.content;
            content.push_str(&paragraph(&line));
            data.drafts.set_content(content).await;
        }
        Ok::<(), std::io::Error>(())
    }
    .await;
    autosave.abort();
    result?;

    if data.drafts.is_saving() {
        tracing::debug!("Autosave was interrupted; the final save replaces it");
    }

    let saved = data.drafts.save().await?;
    println!("Draft saved ({} bytes)", saved.content.len());

    if args.send {
        ensure_signed_in(data).await;
        send(data).await?;
    }
    Ok(())
}

/// Wraps one line of typed text the way a rich-text editor stores it.
fn paragraph(line: &str) -> String {
    if line.trim().is_empty() {
        return "<p><br></p>".to_string();
    }

    let escaped = line
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<p>{}</p>", escaped)
}
