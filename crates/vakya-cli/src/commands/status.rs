//! The `vakya status` and `vakya profile` commands.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use vakya_client::ApiClient;
use vakya_core::session::Route;

use super::{open_session, require};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, gate) = open_session(config_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        Cell::new("Session"),
        Cell::new(if gate.is_authenticated() {
            "logged in"
        } else {
            "logged out"
        }),
    ]);
    if let Some(saved_at) = gate.store().saved_at()? {
        table.add_row(vec![
            Cell::new("Since"),
            Cell::new(saved_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]);
    }
    if let Some(email) = gate
        .store()
        .user()?
        .and_then(|u| u.get("email").and_then(|e| e.as_str()).map(str::to_string))
    {
        table.add_row(vec![Cell::new("User"), Cell::new(email)]);
    }
    table.add_row(vec![Cell::new("Auth service"), Cell::new(&config.auth_url)]);
    table.add_row(vec![
        Cell::new("Sentence service"),
        Cell::new(&config.sentence_url),
    ]);
    table.add_row(vec![
        Cell::new("Token file"),
        Cell::new(config.token_path().display()),
    ]);

    println!("{table}");
    Ok(())
}

pub async fn profile(config_path: Option<PathBuf>) -> Result<()> {
    let (config, gate) = open_session(config_path)?;
    require(&gate, Route::Dashboard)?;

    let mut client = ApiClient::new(&config)?;
    if let Some(token) = gate.token() {
        client = client.with_token(token);
    }
    let profile = client.profile().await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
