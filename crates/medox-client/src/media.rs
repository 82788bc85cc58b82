//! Multipart uploads: image description and audio transcription.

use std::path::Path;

use medox_task::PollPolicy;
use medox_types::{ImageDescription, TranscriptionResult, TranscriptionStatus, TranscriptionTask};
use reqwest::multipart;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::session::{HEADER_API_KEY, Session};

/// Options for `describe_image`.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Vision model the server should use.
    pub model: String,
    /// Square resize applied server-side before description.
    pub image_size: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            image_size: 224,
        }
    }
}

/// The server accepts only JPEG and PNG uploads.
fn image_mime(path: &Path) -> Result<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        other => Err(ApiError::InvalidInput(format!(
            "unsupported image type {:?}, only JPEG and PNG are accepted",
            other.unwrap_or("none")
        ))),
    }
}

fn audio_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "audio/ogg",
    }
}

/// Read an upload, rejecting missing files before any request is sent.
async fn read_upload(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(ApiError::InvalidInput(format!(
            "no file at {}",
            path.display()
        )));
    }
    Ok(tokio::fs::read(path).await?)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

impl Session {
    /// Upload an image and get a one-shot description back. No task or
    /// polling involved; the server answers synchronously.
    pub async fn describe_image(
        &self,
        path: &Path,
        options: &ImageOptions,
    ) -> Result<ImageDescription> {
        let mime = image_mime(path)?;
        let data = read_upload(path).await?;

        let part = multipart::Part::bytes(data)
            .file_name(file_name_of(path))
            .mime_str(mime)?;
        let form = multipart::Form::new().part("file", part);

        let mut url = self.endpoint(&["describe_image"])?;
        url.query_pairs_mut()
            .append_pair("model", &options.model)
            .append_pair("image_size", &options.image_size.to_string());

        let resp = self
            .http()
            .post(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .multipart(form)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// Submit an audio file for transcription. When `target_language` is
    /// `None` the query parameter is omitted entirely and the server picks
    /// its default; an empty value is never sent.
    pub async fn transcribe_audio(
        &self,
        path: &Path,
        target_language: Option<&str>,
    ) -> Result<TranscriptionTask> {
        let mime = audio_mime(path);
        let data = read_upload(path).await?;

        let part = multipart::Part::bytes(data)
            .file_name(file_name_of(path))
            .mime_str(mime)?;
        let form = multipart::Form::new().part("audio", part);

        let mut url = self.endpoint(&["transcribe_audio"])?;
        if let Some(lang) = target_language {
            url.query_pairs_mut().append_pair("target_language", lang);
        }

        let resp = self
            .http()
            .post(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .multipart(form)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// One status poll of a transcription task. Terminal when the payload
    /// carries the transcription itself.
    pub async fn task_status(&self, task_id: &str) -> Result<TranscriptionStatus> {
        let url = self.endpoint(&["task_status", task_id])?;
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// Full flow: submit, poll until the transcription appears, return it.
    /// No separate download — the result rides in the terminal status.
    pub async fn transcribe(
        &self,
        path: &Path,
        target_language: Option<&str>,
        policy: PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult> {
        let task = self.transcribe_audio(path, target_language).await?;
        info!(task_id = %task.task_id, status = %task.status, "transcription task submitted");
        let task_id = task.task_id;

        let terminal = medox_task::poll_until_terminal(policy, cancel, || {
            let session = self;
            let id = task_id.clone();
            async move { session.task_status(&id).await }
        })
        .await?;

        info!(task_id = %task_id, "transcription finished");
        terminal.into_result().ok_or_else(|| {
            ApiError::MalformedResponse("finished task carried no transcription".to_string())
        })
    }
}
