use crate::cli::args::AuthCommand;
use crate::cli::{Data, Error};

pub async fn run(data: &Data, command: AuthCommand) -> Result<(), Error> {
    match command {
        AuthCommand::Status => {
            status(data).await;
            Ok(())
        }
        AuthCommand::SignOut => sign_out(data).await,
    }
}

/// Signs in with the configured identity. Failure is reported, not fatal:
/// Drive commands then stop with a "not signed in" error of their own.
pub async fn ensure_signed_in(data: &Data) {
    if data.session.current_user().await.is_some() {
        return;
    }

    if let Err(e) = data.session.sign_in().await {
        tracing::warn!("{}", e);
    }
}

async fn status(data: &Data) {
    match data.session.sign_in().await {
        Ok(user) => match user.display_name {
            Some(name) => println!("Signed in as {} ({})", user.email, name),
            None => println!("Signed in as {}", user.email),
        },
        Err(e) => println!("Not signed in: {}", e),
    }
}

async fn sign_out(data: &Data) -> Result<(), Error> {
    ensure_signed_in(data).await;
    let Some(user) = data.session.current_user().await else {
        println!("Not signed in");
        return Ok(());
    };

    data.session.sign_out().await?;
    println!("Signed out {}", user.email);
    Ok(())
}
