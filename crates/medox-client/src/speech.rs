//! Speech synthesis: submission, status polling, artifact download.

use bytes::Bytes;
use medox_task::PollPolicy;
use medox_types::SpeechTask;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::session::{HEADER_API_KEY, Session};

/// Server-side limit on the synthesized text length.
const MAX_SPEECH_CHARS: usize = 4096;

/// A downloaded speech artifact. Ownership passes to the caller; the client
/// keeps nothing.
#[derive(Debug, Clone)]
pub struct SpeechArtifact {
    pub task_id: String,
    pub audio: Bytes,
}

impl SpeechArtifact {
    /// Suggested file name, matching the server's Content-Disposition.
    pub fn file_name(&self) -> String {
        format!("speech_{}.mp3", self.task_id)
    }
}

impl Session {
    /// Submit a speech synthesis job. Returns the task handle; the job runs
    /// server-side and must be polled via [`speech_status`](Self::speech_status).
    pub async fn generate_speech(&self, text: &str, voice: Option<&str>) -> Result<SpeechTask> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::InvalidInput("text must not be empty".to_string()));
        }
        if text.chars().count() > MAX_SPEECH_CHARS {
            return Err(ApiError::InvalidInput(format!(
                "text exceeds {MAX_SPEECH_CHARS} characters"
            )));
        }

        let url = self.endpoint(&["generate_speech"])?;
        let mut body = serde_json::json!({ "text": text });
        if let Some(voice) = voice {
            body["voice"] = voice.into();
        }

        let resp = self
            .http()
            .post(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .json(&body)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// One status poll of a speech task.
    pub async fn speech_status(&self, task_id: &str) -> Result<SpeechTask> {
        let url = self.endpoint(&["speech_status", task_id])?;
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// Download the audio for a completed speech task.
    pub async fn download_speech(&self, task_id: &str) -> Result<Bytes> {
        let url = self.endpoint(&["download_speech", task_id])?;
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        let resp = Session::check_status(resp).await?;
        Ok(resp.bytes().await?)
    }

    /// Full flow: submit, poll until `status == "completed"`, download.
    ///
    /// The poll loop is bounded by `policy` and stops early when `cancel`
    /// fires; any status-request error aborts the flow.
    pub async fn speak(
        &self,
        text: &str,
        voice: Option<&str>,
        policy: PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<SpeechArtifact> {
        let task = self.generate_speech(text, voice).await?;
        info!(
            task_id = %task.task_id,
            status = %task.status,
            progress = task.progress,
            "speech task submitted"
        );
        let task_id = task.task_id;

        let terminal = medox_task::poll_until_terminal(policy, cancel, || {
            let session = self;
            let id = task_id.clone();
            async move {
                let status = session.speech_status(&id).await?;
                info!(
                    task_id = %id,
                    status = %status.status,
                    progress = status.progress,
                    "speech status"
                );
                Ok::<_, ApiError>(status)
            }
        })
        .await?;

        let audio = self.download_speech(&task_id).await?;
        info!(
            task_id = %task_id,
            bytes = audio.len(),
            progress = terminal.progress,
            "speech artifact downloaded"
        );
        Ok(SpeechArtifact { task_id, audio })
    }
}
