//! The `vakya login`, `vakya register` and `vakya logout` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vakya_client::{ApiClient, FileTokenStore};
use vakya_core::auth::{AuthResponse, LoginRequest, RegisterRequest, LOGIN_SUCCESS, REGISTER_SUCCESS};
use vakya_core::error::AuthError;
use vakya_core::session::SessionGate;

use super::open_session;

pub async fn login(config_path: Option<PathBuf>, email: String, password: String) -> Result<()> {
    let (config, mut gate) = open_session(config_path)?;
    let client = ApiClient::new(&config)?;

    let outcome = client.login(&LoginRequest { email, password }).await;
    finish(&mut gate, outcome, LOGIN_SUCCESS)
}

pub async fn register(
    config_path: Option<PathBuf>,
    full_name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<()> {
    let (config, mut gate) = open_session(config_path)?;
    let client = ApiClient::new(&config)?;

    let request = RegisterRequest {
        full_name,
        email,
        password,
        confirm_password,
    };
    let outcome = client.register(&request).await;
    finish(&mut gate, outcome, REGISTER_SUCCESS)
}

fn finish(
    gate: &mut SessionGate<FileTokenStore>,
    outcome: Result<AuthResponse, AuthError>,
    success: &str,
) -> Result<()> {
    let response = outcome?;
    gate.login(&response.token)
        .context("failed to store credential token")?;
    if !response.user.is_null() {
        gate.store()
            .save_user(&response.user)
            .context("failed to store user record")?;
    }
    println!("{success}");
    Ok(())
}

pub fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let (_, mut gate) = open_session(config_path)?;
    if !gate.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    gate.logout().context("failed to clear credential token")?;
    println!("Logged out.");
    Ok(())
}
