//! Request validation.
//!
//! The [`Validator`] is the only gate between raw request bodies and the
//! ledger. It is built once from [`Config`] and passed around explicitly.
//! Failures come back as a list of [`FieldViolation`]s for the HTTP layer to
//! render.

use std::fmt;

use regex::Regex;

use crate::{
    config::Config,
    models::{
        account::{AccountId, CreateUserRequest, TopUpRequest},
        amount::{Amount, AmountError},
    },
    services::{credentials, ledger::CreateAccountInput},
};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    Positive,
    Amount(AmountError),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::Email => write!(f, "email"),
            Rule::MinLength(min) => write!(f, "min={min}"),
            Rule::Positive => write!(f, "positive"),
            Rule::Amount(err) => write!(f, "amount ({err})"),
        }
    }
}

/// One rule broken by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldViolation {
    fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field '{}' {} validation failed", self.field, self.rule)
    }
}

/// Validated input for a top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopUpInput {
    pub id: AccountId,
    pub delta: Amount,
}

#[derive(Debug, Clone)]
pub struct Validator {
    min_password_length: usize,
    email: Regex,
}

impl Validator {
    pub fn new(min_password_length: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            min_password_length,
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        Self::new(config.min_password_length)
    }

    /// Validates a create-user body and hashes its password.
    ///
    /// Emails are trimmed and lower-cased so that uniqueness is case-insensitive.
    pub fn validate_create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateAccountInput, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let name = request
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if name.is_none() {
            violations.push(FieldViolation::new("name", Rule::Required));
        }

        let email = request
            .email
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty());
        match &email {
            None => violations.push(FieldViolation::new("email", Rule::Required)),
            Some(email) if !self.email.is_match(email) => {
                violations.push(FieldViolation::new("email", Rule::Email))
            }
            Some(_) => {}
        }

        let password = request.password.filter(|password| !password.is_empty());
        match &password {
            None => violations.push(FieldViolation::new("password", Rule::Required)),
            Some(password) if password.chars().count() < self.min_password_length => violations
                .push(FieldViolation::new(
                    "password",
                    Rule::MinLength(self.min_password_length),
                )),
            Some(_) => {}
        }

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if violations.is_empty() => {
                Ok(CreateAccountInput {
                    name,
                    email,
                    credential_hash: credentials::hash_password(&password),
                })
            }
            _ => Err(violations),
        }
    }

    /// Validates a top-up body. Only positive amounts are accepted here.
    pub fn validate_top_up(&self, request: TopUpRequest) -> Result<TopUpInput, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let id = match request.id {
            None => {
                violations.push(FieldViolation::new("id", Rule::Required));
                None
            }
            Some(id) if id <= 0 => {
                violations.push(FieldViolation::new("id", Rule::Positive));
                None
            }
            Some(id) => Some(id),
        };

        let delta = match request.amount.map(Amount::from_decimal) {
            None => {
                violations.push(FieldViolation::new("amount", Rule::Required));
                None
            }
            Some(Err(err)) => {
                violations.push(FieldViolation::new("amount", Rule::Amount(err)));
                None
            }
            Some(Ok(amount)) if !amount.is_positive() => {
                violations.push(FieldViolation::new("amount", Rule::Positive));
                None
            }
            Some(Ok(amount)) => Some(amount),
        };

        match (id, delta) {
            (Some(id), Some(delta)) => Ok(TopUpInput { id, delta }),
            _ => Err(violations),
        }
    }
}
