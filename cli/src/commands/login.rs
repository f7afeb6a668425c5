use anyhow::{Context, Result};

use crate::client::AdminClient;

/// Sign in and print shell exports for the returned credentials.
pub async fn run(client: &AdminClient, email: &str, password: &str) -> Result<()> {
    let login = client
        .login(email.trim(), password)
        .await
        .context("login failed")?;
    tracing::info!(role = %login.role, "signed in as {}", login.name);
    println!("export GASDASH_TOKEN={}", login.token);
    println!("export GASDASH_ROLE={}", login.role);
    Ok(())
}
