//! `medox key` — issue, inspect and revoke API keys.

use anyhow::Context;

use crate::context;

pub async fn create() -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::anonymous_session(&config)?;

    let issued = session.create_api_key().await?;
    let stored = context::keystore()?.save(&issued.key)?;

    println!("API key created and stored:");
    println!("  key: {}", stored.key);
    println!("  issued at: {}", stored.issued_at);
    Ok(())
}

pub fn show() -> anyhow::Result<()> {
    match context::keystore()?.load()? {
        Some(stored) => {
            println!("key: {}", stored.key);
            println!("issued at: {}", stored.issued_at);
        }
        None => println!("no API key stored; run `medox key create`"),
    }
    Ok(())
}

pub async fn validate() -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::anonymous_session(&config)?;
    let stored = context::keystore()?
        .load()?
        .context("no API key stored; run `medox key create` first")?;

    if session.validate_key(&stored.key).await? {
        println!("key is valid");
    } else {
        println!("key is NOT accepted by the server");
    }
    Ok(())
}

pub async fn revoke() -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::anonymous_session(&config)?;
    let store = context::keystore()?;
    let stored = store
        .load()?
        .context("no API key stored; nothing to revoke")?;

    session.revoke_key(&stored.key).await?;
    store.clear()?;
    println!("key revoked and removed from local storage");
    Ok(())
}

pub async fn list() -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;

    let keys = session.list_keys().await?;
    if keys.is_empty() {
        println!("no keys issued");
        return Ok(());
    }
    println!("issued keys (prefixes):");
    for entry in keys {
        println!("  {}", entry.key);
    }
    Ok(())
}
