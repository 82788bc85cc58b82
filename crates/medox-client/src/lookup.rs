//! Drug and disease lookup calls.

use medox_types::{DiseaseInfo, DrugInfo};

use crate::error::{ApiError, Result};
use crate::session::{HEADER_API_KEY, Session};

impl Session {
    /// Look up a drug by name, optionally including interaction data.
    pub async fn drug_info(&self, name: &str, include_interactions: bool) -> Result<DrugInfo> {
        let name = non_empty(name, "drug name")?;
        let mut url = self.endpoint(&["drug_info", name])?;
        url.query_pairs_mut()
            .append_pair("include_interactions", bool_str(include_interactions));
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        Session::decode_json(resp).await
    }

    /// Look up a disease by name, optionally including treatments.
    pub async fn disease_info(&self, name: &str, include_treatments: bool) -> Result<DiseaseInfo> {
        let name = non_empty(name, "disease name")?;
        let mut url = self.endpoint(&["disease_info", name])?;
        url.query_pairs_mut()
            .append_pair("include_treatments", bool_str(include_treatments));
        let resp = self
            .http()
            .get(url)
            .header(HEADER_API_KEY, self.key_header()?)
            .send()
            .await?;
        Session::decode_json(resp).await
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(value)
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
