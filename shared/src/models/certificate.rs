//! Certificate Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateTemplate {
    Classic,
    Modern,
    Formal,
}

/// Issued certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub certificate_number: String,
    pub member_id: String,
    #[serde(default)]
    pub member_name: Option<String>,
    pub program_name: String,
    pub template: CertificateTemplate,
    /// Rendered artifact, once the backend has produced it
    #[serde(default)]
    pub file_url: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    pub fn file_name(&self) -> String {
        format!("certificate-{}.pdf", self.certificate_number)
    }
}

/// Body of `POST api/certificates`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub member_id: String,
    pub program_name: String,
    pub template: CertificateTemplate,
}
