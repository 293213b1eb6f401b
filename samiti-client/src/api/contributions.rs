//! Contribution groups (group -> companies -> departments -> plans)

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{ContributionGroup, ContributionGroupDraft};
use shared::{FieldErrors, ListQuery};

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::{ClientError, ClientResult};

pub const CONTRIBUTION_GROUPS_PATH: &str = "api/contribution-groups";

pub struct ContributionApi<C> {
    inner: ResourceApi<ContributionGroup, C>,
}

impl<C> Clone for ContributionApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> ContributionApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<ContributionGroup>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, CONTRIBUTION_GROUPS_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<ContributionGroup> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn create(&self, draft: &ContributionGroupDraft) -> ClientResult<ContributionGroup> {
        validate_group(draft).map_err(|e| self.inner.reject_locally(e))?;
        self.inner.create(draft).await
    }

    /// Replace the whole tree of a group
    pub async fn update(&self, id: &str, draft: &ContributionGroupDraft) -> ClientResult<ContributionGroup> {
        validate_group(draft).map_err(|e| self.inner.reject_locally(e))?;
        self.inner.replace(id, draft).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.inner.delete(id).await
    }
}

/// Field keys are paths into the tree, e.g. `companies[0].departments[1].plans[0].amount`
pub fn validate_group(draft: &ContributionGroupDraft) -> ClientResult<()> {
    let mut fields = FieldErrors::new();
    if draft.name.trim().is_empty() {
        fields.insert("name".into(), "Group name is required".into());
    }
    for (ci, company) in draft.companies.iter().enumerate() {
        let company_key = format!("companies[{}]", ci);
        if company.name.trim().is_empty() {
            fields.insert(format!("{}.name", company_key), "Company name is required".into());
        }
        for (di, department) in company.departments.iter().enumerate() {
            let department_key = format!("{}.departments[{}]", company_key, di);
            if department.name.trim().is_empty() {
                fields.insert(
                    format!("{}.name", department_key),
                    "Department name is required".into(),
                );
            }
            for (pi, plan) in department.plans.iter().enumerate() {
                let plan_key = format!("{}.plans[{}]", department_key, pi);
                if plan.name.trim().is_empty() {
                    fields.insert(format!("{}.name", plan_key), "Plan name is required".into());
                }
                if plan.amount <= Decimal::ZERO {
                    fields.insert(
                        format!("{}.amount", plan_key),
                        "Plan amount must be greater than zero".into(),
                    );
                }
            }
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ClientError::invalid_fields(fields))
    }
}
