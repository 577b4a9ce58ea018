pub mod auth;
pub mod init;
pub mod play;
pub mod status;
pub mod verb_quiz;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vakya_client::{load_config_from, FileTokenStore, VakyaConfig};
use vakya_core::session::{Route, SessionGate};

/// Loads the configuration and restores the session from its token file.
pub fn open_session(
    config_path: Option<PathBuf>,
) -> Result<(VakyaConfig, SessionGate<FileTokenStore>)> {
    let config = load_config_from(config_path.as_deref())?;
    let store = FileTokenStore::new(config.token_path());
    tracing::debug!(token_path = %store.path().display(), "restoring session");
    let gate = SessionGate::restore(store).context("failed to restore session")?;
    Ok((config, gate))
}

/// Fails unless the gate lets the learner through to `route`.
pub fn require(gate: &SessionGate<FileTokenStore>, route: Route) -> Result<()> {
    if gate.resolve(route) != route {
        anyhow::bail!("not logged in. Run `vakya login --email <email> --password <password>` first");
    }
    Ok(())
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}
