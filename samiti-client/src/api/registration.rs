//! Member registration wizard
//!
//! Four steps, each validated locally before the wizard moves on. Nothing
//! reaches the network until [`RegistrationApi::submit`] and every step is
//! valid.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::models::{Address, Employment, Gender, MemberRegistration, Nominee, RegistrationOutcome};
use shared::{ApiResponse, FieldErrors};

use super::into_data;
use crate::client::HttpClient;
use crate::{ClientError, ClientResult};

pub const REGISTER_PATH: &str = "api/members/register";

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Personal,
    ContactAddress,
    Employment,
    Nominees,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::Personal,
        Self::ContactAddress,
        Self::Employment,
        Self::Nominees,
    ];

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Personal => Some(Self::ContactAddress),
            Self::ContactAddress => Some(Self::Employment),
            Self::Employment => Some(Self::Nominees),
            Self::Nominees => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            Self::Personal => None,
            Self::ContactAddress => Some(Self::Personal),
            Self::Employment => Some(Self::ContactAddress),
            Self::Nominees => Some(Self::Employment),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal details",
            Self::ContactAddress => "Contact & address",
            Self::Employment => "Employment",
            Self::Nominees => "Nominees",
        }
    }
}

/// Raw form input, as typed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub father_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub address: Address,
    pub employment: Employment,
    pub nominees: Vec<Nominee>,
}

impl RegistrationForm {
    /// Field problems of one step; empty when the step is valid
    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::Personal => self.check_personal(&mut errors),
            WizardStep::ContactAddress => self.check_contact(&mut errors),
            WizardStep::Employment => self.check_employment(&mut errors),
            WizardStep::Nominees => self.check_nominees(&mut errors),
        }
        errors
    }

    fn check_personal(&self, errors: &mut FieldErrors) {
        require(errors, "fullName", &self.full_name, "Full name is required");
        match parse_date(&self.date_of_birth) {
            None => {
                errors.insert("dateOfBirth".into(), "Enter the date of birth as YYYY-MM-DD".into());
            }
            Some(dob) if dob >= Utc::now().date_naive() => {
                errors.insert("dateOfBirth".into(), "Date of birth must be in the past".into());
            }
            Some(_) => {}
        }
        if self.gender.is_none() {
            errors.insert("gender".into(), "Select a gender".into());
        }
    }

    fn check_contact(&self, errors: &mut FieldErrors) {
        if !is_email(self.email.trim()) {
            errors.insert("email".into(), "Enter a valid email address".into());
        }
        if !is_digits(self.mobile.trim(), 10) {
            errors.insert("mobile".into(), "Mobile number must be 10 digits".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".into(),
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        let address = &self.address;
        require(errors, "address.line1", &address.line1, "Address is required");
        require(errors, "address.city", &address.city, "City is required");
        require(errors, "address.district", &address.district, "District is required");
        require(errors, "address.state", &address.state, "State is required");
        if !is_digits(address.pin_code.trim(), 6) {
            errors.insert("address.pinCode".into(), "PIN code must be 6 digits".into());
        }
    }

    fn check_employment(&self, errors: &mut FieldErrors) {
        require(errors, "employment.employer", &self.employment.employer, "Employer is required");
    }

    fn check_nominees(&self, errors: &mut FieldErrors) {
        if self.nominees.is_empty() {
            errors.insert("nominees".into(), "Add at least one nominee".into());
            return;
        }
        for (i, nominee) in self.nominees.iter().enumerate() {
            require(errors, &format!("nominees[{}].name", i), &nominee.name, "Nominee name is required");
            require(errors, &format!("nominees[{}].relation", i), &nominee.relation, "Relation is required");
            if nominee.share == 0 || nominee.share > 100 {
                errors.insert(format!("nominees[{}].share", i), "Share must be between 1 and 100".into());
            }
            if let Some(mobile) = nominee.mobile.as_deref().filter(|m| !m.trim().is_empty()) {
                if !is_digits(mobile.trim(), 10) {
                    errors.insert(format!("nominees[{}].mobile", i), "Mobile number must be 10 digits".into());
                }
            }
        }
        let total: u32 = self.nominees.iter().map(|n| u32::from(n.share)).sum();
        if total != 100 {
            errors.insert(
                "nominees".into(),
                format!("Nominee shares must add up to 100 (currently {})", total),
            );
        }
    }

    /// Request body; only call once every step validates
    fn to_registration(&self) -> ClientResult<MemberRegistration> {
        let date_of_birth = parse_date(&self.date_of_birth)
            .ok_or_else(|| ClientError::field("dateOfBirth", "Enter the date of birth as YYYY-MM-DD"))?;
        let gender = self
            .gender
            .ok_or_else(|| ClientError::field("gender", "Select a gender"))?;
        let father_name = Some(self.father_name.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(MemberRegistration {
            full_name: self.full_name.trim().to_string(),
            father_name,
            date_of_birth,
            gender,
            email: self.email.trim().to_lowercase(),
            mobile: self.mobile.trim().to_string(),
            password: self.password.clone(),
            address: self.address.clone(),
            employment: self.employment.clone(),
            nominees: self.nominees.clone(),
        })
    }
}

/// Step-by-step registration state
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    form: RegistrationForm,
    step: WizardStep,
    errors: FieldErrors,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::with_form(RegistrationForm::default())
    }

    pub fn with_form(form: RegistrationForm) -> Self {
        Self {
            form,
            step: WizardStep::Personal,
            errors: FieldErrors::new(),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Problems found by the last `advance` or `build`
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }

    /// Move forward if the current step validates
    pub fn advance(&mut self) -> ClientResult<WizardStep> {
        let errors = self.form.validate_step(self.step);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(ClientError::invalid_fields(errors));
        }
        self.errors.clear();
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back; never validates
    pub fn back(&mut self) -> WizardStep {
        self.errors.clear();
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Validate every step and build the request body.
    ///
    /// On failure the wizard jumps to the first invalid step.
    pub fn build(&mut self) -> ClientResult<MemberRegistration> {
        for step in WizardStep::ALL {
            let errors = self.form.validate_step(step);
            if !errors.is_empty() {
                self.step = step;
                self.errors = errors.clone();
                return Err(ClientError::invalid_fields(errors));
            }
        }
        self.errors.clear();
        self.form.to_registration()
    }
}

pub struct RegistrationApi<C> {
    http: Arc<C>,
}

impl<C> Clone for RegistrationApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<C: HttpClient> RegistrationApi<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    /// Submit a completed wizard. The new member is Pending/Pending and the
    /// outcome carries the registration fee order, if the backend opened one.
    pub async fn submit(&self, wizard: &mut RegistrationWizard) -> ClientResult<RegistrationOutcome> {
        let registration = wizard.build()?;
        let outcome = self
            .http
            .post::<ApiResponse<RegistrationOutcome>, _>(REGISTER_PATH, &registration)
            .await
            .and_then(into_data);

        match outcome {
            Ok(outcome) => {
                tracing::info!(
                    member_id = %outcome.member.id,
                    fee_order = ?outcome.fee_order.as_ref().map(|o| &o.order_id),
                    "Member registered"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration rejected");
                if let Some(fields) = e.field_errors() {
                    wizard.errors = fields.clone();
                }
                Err(e)
            }
        }
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Loose shape check: `local@domain.tld`, no whitespace
pub(crate) fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
