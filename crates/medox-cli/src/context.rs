//! Shared setup for all commands: config, keystore, session, cancellation.

use std::time::Duration;

use anyhow::Context;
use medox_client::{Keystore, Session};
use medox_config::MedoxConfig;
use medox_task::PollPolicy;
use tokio_util::sync::CancellationToken;

pub fn load_config() -> anyhow::Result<MedoxConfig> {
    Ok(medox_config::load_config()?)
}

pub fn keystore() -> anyhow::Result<Keystore> {
    Ok(Keystore::new(medox_config::key_file_path()?))
}

/// A session with no credential, for key issuance.
pub fn anonymous_session(config: &MedoxConfig) -> anyhow::Result<Session> {
    Ok(Session::new(&config.base_url)?)
}

/// A session carrying the stored key; fails if none has been created yet.
pub fn authed_session(config: &MedoxConfig) -> anyhow::Result<Session> {
    let stored = keystore()?
        .load()?
        .context("no API key stored; run `medox key create` first")?;
    Ok(Session::with_key(&config.base_url, stored.key)?)
}

pub fn poll_policy(config: &MedoxConfig) -> PollPolicy {
    PollPolicy::new(
        Duration::from_secs(config.poll.interval_secs),
        config.poll.max_attempts,
    )
}

/// Cancellation token that fires on Ctrl-C, so an in-flight poll loop stops
/// instead of leaving the task orphaned.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trip = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trip.cancel();
        }
    });
    cancel
}
