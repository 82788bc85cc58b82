//! `medox speak` / `medox describe-image` / `medox transcribe`.

use std::path::{Path, PathBuf};

use medox_client::ImageOptions;

use crate::context;

pub async fn speak(text: &str, voice: Option<&str>, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;
    let cancel = context::cancel_on_ctrl_c();

    let artifact = session
        .speak(text, voice, context::poll_policy(&config), &cancel)
        .await?;

    let out = out.unwrap_or_else(|| PathBuf::from(artifact.file_name()));
    tokio::fs::write(&out, &artifact.audio).await?;
    println!(
        "Speech ready: {} ({} bytes, task {})",
        out.display(),
        artifact.audio.len(),
        artifact.task_id
    );
    Ok(())
}

pub async fn describe_image(
    path: &Path,
    model: Option<String>,
    image_size: Option<u32>,
) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;

    let mut options = ImageOptions::default();
    if let Some(model) = model {
        options.model = model;
    }
    if let Some(size) = image_size {
        options.image_size = size;
    }

    let described = session.describe_image(path, &options).await?;
    println!("Description: {}", described.description);
    Ok(())
}

pub async fn transcribe(path: &Path, target_language: Option<&str>) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;
    let cancel = context::cancel_on_ctrl_c();

    let result = session
        .transcribe(
            path,
            target_language,
            context::poll_policy(&config),
            &cancel,
        )
        .await?;

    println!("Transcription: {}", result.transcription);
    if let Some(translation) = result.translation {
        println!("Translation: {translation}");
    }
    Ok(())
}
