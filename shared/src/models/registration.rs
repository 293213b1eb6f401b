//! Member registration submission

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::donation::PaymentOrder;
use super::member::{Address, Employment, Gender, Member, Nominee};

/// Body of `POST api/members/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRegistration {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub address: Address,
    pub employment: Employment,
    pub nominees: Vec<Nominee>,
}

/// Registration result: the new Pending/Pending member plus the fee order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub member: Member,
    #[serde(default)]
    pub fee_order: Option<PaymentOrder>,
}
