use medox_task::TaskProbe;
use serde::{Deserialize, Serialize};

// ──────────────────── API Keys ────────────────────

/// Response from `create_api_key` (and each entry of `list_keys`).
///
/// `list_keys` returns truncated key prefixes; only the response from
/// `create_api_key` carries the full credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyIssued {
    /// The credential value, attached to later requests as `X-API-Key`.
    pub key: String,
}

// ──────────────────── Lookup Records ────────────────────

/// Drug lookup record. Read-only; the client never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugInfo {
    pub name: String,
    pub description: String,
    pub dosage: String,
    pub side_effects: String,
    /// Present only when the lookup asked for interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<String>,
}

/// Disease lookup record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
    pub description: String,
    pub symptoms: String,
    pub causes: String,
    /// Present only when the lookup asked for treatments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatments: Option<String>,
}

// ──────────────────── Tasks ────────────────────

/// Status of a speech synthesis task.
///
/// Terminal when `status == "completed"`; the audio artifact is then fetched
/// with a separate download call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechTask {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub progress: u8,
}

impl SpeechTask {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

impl TaskProbe for SpeechTask {
    fn is_terminal(&self) -> bool {
        self.is_completed()
    }
}

/// Handle returned by an audio transcription submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionTask {
    pub task_id: String,
    pub status: String,
}

/// One status poll of a transcription task.
///
/// The server signals completion by embedding the result in the status
/// payload rather than flipping a status field, so terminality here is the
/// presence of `transcription`. This differs deliberately from [`SpeechTask`];
/// the two endpoints use different protocols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl TaskProbe for TranscriptionStatus {
    fn is_terminal(&self) -> bool {
        self.is_done()
    }
}

impl TranscriptionStatus {
    pub fn is_done(&self) -> bool {
        self.transcription.is_some()
    }

    /// Extract the final result once [`is_done`](Self::is_done) is true.
    pub fn into_result(self) -> Option<TranscriptionResult> {
        Some(TranscriptionResult {
            transcription: self.transcription?,
            translation: self.translation,
        })
    }
}

/// Completed transcription (with optional translation to the target
/// language, when one was requested).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub transcription: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

// ──────────────────── Image Description ────────────────────

/// Result of a `describe_image` upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescription {
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_task_parse() {
        let task: SpeechTask =
            serde_json::from_str(r#"{"task_id":"t1","status":"processing","progress":10}"#)
                .unwrap();
        assert_eq!(task.task_id, "t1");
        assert_eq!(task.progress, 10);
        assert!(!task.is_completed());
    }

    #[test]
    fn test_speech_task_default_progress() {
        let task: SpeechTask =
            serde_json::from_str(r#"{"task_id":"t1","status":"completed"}"#).unwrap();
        assert_eq!(task.progress, 0);
        assert!(task.is_completed());
    }

    #[test]
    fn test_transcription_status_processing() {
        let status: TranscriptionStatus =
            serde_json::from_str(r#"{"status":"processing"}"#).unwrap();
        assert!(!status.is_done());
        assert!(status.into_result().is_none());
    }

    #[test]
    fn test_transcription_status_done() {
        let status: TranscriptionStatus =
            serde_json::from_str(r#"{"transcription":"hello","translation":"hallo"}"#).unwrap();
        assert!(status.is_done());
        let result = status.into_result().unwrap();
        assert_eq!(result.transcription, "hello");
        assert_eq!(result.translation.as_deref(), Some("hallo"));
    }

    #[test]
    fn test_disease_info_optional_treatments() {
        let info: DiseaseInfo = serde_json::from_str(
            r#"{"name":"flu","description":"d","symptoms":"s","causes":"c"}"#,
        )
        .unwrap();
        assert!(info.treatments.is_none());
    }
}
