mod account;
mod notes;

pub use account::{cmd_signup, cmd_whoami};
pub use notes::cmd_notes;

use anyhow::Context;

use crate::cli::ServerArgs;
use crate::clients::{LoginCredentials, NotesClient};

/// Open a client and log in with the supplied credentials.
async fn logged_in_client(server: &ServerArgs) -> anyhow::Result<NotesClient> {
    let client = NotesClient::new(&server.server)?;
    client
        .login(&LoginCredentials {
            username: server.username.clone(),
            password: server.password.clone(),
        })
        .await
        .context("Login failed")?;
    Ok(client)
}
