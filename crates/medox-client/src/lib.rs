//! medox-client: typed client for the medox multi-modal medical API.
//!
//! Covers key issuance/management, drug and disease lookups, speech
//! synthesis (submit → poll → download), image description and audio
//! transcription. Long-running task polling is driven by `medox-task`.

pub mod error;
pub mod keys;
pub mod keystore;
pub mod lookup;
pub mod media;
pub mod session;
pub mod speech;

pub use error::{ApiError, Result};
pub use keystore::{Keystore, KeystoreError, StoredKey};
pub use media::ImageOptions;
pub use session::{HEADER_API_KEY, Session};
pub use speech::SpeechArtifact;
