// Draft commands. Every edit is saved right away, since each CLI run
// is a fresh process.

use crate::cli::args::{ContentArgs, DraftCommand};
use crate::cli::formatting::draft_summary;
use crate::cli::{Data, Error};

pub async fn run(data: &Data, command: DraftCommand) -> Result<(), Error> {
    data.drafts.load().await;

    match command {
        DraftCommand::Show => {
            let draft = data.drafts.current().await;
            if draft.is_empty() {
                println!("No draft saved");
            } else {
                println!("{}", draft_summary(&draft));
            }
        }
        DraftCommand::Title { title } => {
            data.drafts.set_title(title).await;
            let saved = data.drafts.save().await?;
            println!("Title set to \"{}\"", saved.title);
        }
        DraftCommand::Content(args) => {
            let html = read_content(args).await?;
            data.drafts.set_content(html).await;
            let saved = data.drafts.save().await?;
            println!("Content saved ({} bytes)", saved.content.len());
        }
        DraftCommand::Save => {
            data.drafts.save().await?;
            println!("Draft saved");
        }
        DraftCommand::Clear => {
            data.drafts.clear().await?;
            println!("Draft cleared");
        }
    }

    Ok(())
}

async fn read_content(args: ContentArgs) -> Result<String, Error> {
    match (args.html, args.file) {
        (Some(html), _) => Ok(html),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(&path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read {}: {}", path.display(), e)
        })?),
        (None, None) => Err(anyhow::anyhow!("Provide HTML content or --file")),
    }
}
