//! Contribution plan configuration
//!
//! group -> companies -> departments -> plans

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPlan {
    pub name: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub plans: Vec<ContributionPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub departments: Vec<Department>,
}

/// Contribution group; edited and deleted as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub companies: Vec<Company>,
}

/// Create / replace payload for a whole group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionGroupDraft {
    pub name: String,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl ContributionGroup {
    pub fn plan_count(&self) -> usize {
        self.companies
            .iter()
            .flat_map(|c| &c.departments)
            .map(|d| d.plans.len())
            .sum()
    }

    /// Draft carrying this group's current tree, for editing
    pub fn to_draft(&self) -> ContributionGroupDraft {
        ContributionGroupDraft {
            name: self.name.clone(),
            companies: self.companies.clone(),
        }
    }
}
