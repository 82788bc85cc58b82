//! API key issuance and management calls.

use medox_types::ApiKeyIssued;
use tracing::info;

use crate::error::Result;
use crate::session::{HEADER_API_KEY, Session};

impl Session {
    /// Issue a new API key. The only unauthenticated call; the returned key
    /// is not attached to the session automatically.
    pub async fn create_api_key(&self) -> Result<ApiKeyIssued> {
        let url = self.endpoint(&["create_api_key"])?;
        let resp = self.http().post(url).send().await?;
        let issued: ApiKeyIssued = Session::decode_json(resp).await?;
        info!("issued new API key");
        Ok(issued)
    }

    /// Check whether a key is currently accepted by the server.
    pub async fn validate_key(&self, key: &str) -> Result<bool> {
        let mut url = self.endpoint(&["validate_key"])?;
        url.query_pairs_mut().append_pair("api_key", key);
        let resp = self.http().post(url).send().await?;
        Session::decode_json(resp).await
    }

    /// Revoke a key server-side. Fails with `NotFound` for unknown keys.
    pub async fn revoke_key(&self, key: &str) -> Result<()> {
        let url = self.endpoint(&["revoke_key", key])?;
        let resp = self.http().delete(url).send().await?;
        Session::check_status(resp).await?;
        info!("revoked API key");
        Ok(())
    }

    /// List issued keys (truncated prefixes, not full credentials).
    pub async fn list_keys(&self) -> Result<Vec<ApiKeyIssued>> {
        let url = self.endpoint(&["list_keys"])?;
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        Session::decode_json(resp).await
    }
}
