//! Account command handlers

use crate::cli::ServerArgs;
use crate::clients::{NotesClient, SignupCredentials};

pub async fn cmd_signup(server: &ServerArgs, email: &str) -> anyhow::Result<()> {
    let client = NotesClient::new(&server.server)?;

    let user = client
        .signup(&SignupCredentials {
            username: server.username.clone(),
            email: email.to_string(),
            password: server.password.clone(),
        })
        .await?;

    println!("✓ Account created: {} <{}>", user.username, user.email);
    Ok(())
}

pub async fn cmd_whoami(server: &ServerArgs) -> anyhow::Result<()> {
    let client = super::logged_in_client(server).await?;

    let user = client.get_logged_in_user().await?;
    println!("{} <{}>", user.username, user.email);
    println!("  ID: {}", user.id);

    client.logout().await?;
    Ok(())
}
