//! Certificates

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::ListQuery;
use shared::models::{Certificate, CertificateRequest, CertificateTemplate, Member};

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::{ClientError, ClientResult};

pub const CERTIFICATES_PATH: &str = "api/certificates";
pub const MY_CERTIFICATES_PATH: &str = "api/members/me/certificates";

pub struct CertificateApi<C> {
    inner: ResourceApi<Certificate, C>,
}

impl<C> Clone for CertificateApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> CertificateApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Certificate>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, CERTIFICATES_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Certificate> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Certificate> {
        self.inner.fetch_by_id(id).await
    }

    pub async fn my_certificates(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list_from(MY_CERTIFICATES_PATH, query).await
    }

    /// Issue a certificate to an active, fee-paid member
    pub async fn generate(
        &self,
        member: &Member,
        program_name: &str,
        template: CertificateTemplate,
    ) -> ClientResult<Certificate> {
        if !member.is_certificate_eligible() {
            return Err(self.inner.reject_locally(ClientError::InvalidState(format!(
                "{} is not eligible for a certificate",
                member.full_name
            ))));
        }
        let program_name = program_name.trim();
        if program_name.is_empty() {
            return Err(self
                .inner
                .reject_locally(ClientError::field("programName", "Program name is required")));
        }

        let request = CertificateRequest {
            member_id: member.id.clone(),
            program_name: program_name.to_string(),
            template,
        };
        tracing::info!(member_id = %member.id, program = program_name, "Generating certificate");
        self.inner.create(&request).await
    }

    /// Save the certificate PDF into `dir`
    pub async fn download(&self, certificate: &Certificate, dir: &Path) -> ClientResult<PathBuf> {
        let path = format!("{}/download", self.inner.item_path(&certificate.id));
        self.inner
            .download(&path, dir, &certificate.file_name())
            .await
    }
}
