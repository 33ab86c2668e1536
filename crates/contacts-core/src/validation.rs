//! Contact payload validation
//!
//! Checks a candidate JSON payload against the contact field rules and
//! produces either a [`ContactDraft`] or the list of violations.
//!
//! Rules are evaluated in a fixed order:
//!
//! 1. `name` must be non-empty text
//! 2. `email` must be non-empty text with valid email syntax
//! 3. `phone` must be non-empty text
//! 4. `address`, when present, must be text
//! 5. no other keys are allowed
//!
//! By default only the first violation is reported. A validator built with
//! [`Validator::collect_all_errors`] reports every violation in rule order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::model::ContactDraft;

const NAME: &str = "name";
const EMAIL: &str = "email";
const PHONE: &str = "phone";
const ADDRESS: &str = "address";
const KNOWN_FIELDS: [&str; 4] = [NAME, EMAIL, PHONE, ADDRESS];

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Offending field, or `payload` when the payload itself is malformed
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(ContactDraft),
    /// Never empty
    Invalid(Vec<FieldViolation>),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    /// Convert into a `Result`, keeping the violations as the error
    pub fn into_result(self) -> Result<ContactDraft, Vec<FieldViolation>> {
        match self {
            Verdict::Valid(draft) => Ok(draft),
            Verdict::Invalid(violations) => Err(violations),
        }
    }
}

/// Contact payload validator
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    collect_all: bool,
}

impl Validator {
    /// Create a first-error-wins validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every violation instead of stopping at the first
    pub fn collect_all_errors(mut self, collect_all: bool) -> Self {
        self.collect_all = collect_all;
        self
    }

    pub fn collects_all_errors(&self) -> bool {
        self.collect_all
    }

    /// Validate a candidate payload
    pub fn validate(&self, payload: &Value) -> Verdict {
        let Some(map) = payload.as_object() else {
            return Verdict::Invalid(vec![FieldViolation::new(
                "payload",
                "payload must be an object",
            )]);
        };

        let name = required_text(map, NAME);
        let email = required_text(map, EMAIL).and_then(|email| {
            if is_valid_email(&email) {
                Ok(email)
            } else {
                Err(FieldViolation::new(EMAIL, "email must be a valid email"))
            }
        });
        let phone = required_text(map, PHONE);
        let address = optional_text(map, ADDRESS);
        let unknown = unknown_fields(map);

        match (name, email, phone, address) {
            (Ok(name), Ok(email), Ok(phone), Ok(address)) if unknown.is_empty() => {
                Verdict::Valid(ContactDraft {
                    name,
                    email,
                    phone,
                    address,
                })
            }
            (name, email, phone, address) => {
                let mut violations: Vec<FieldViolation> = [
                    name.err(),
                    email.err(),
                    phone.err(),
                    address.err(),
                ]
                .into_iter()
                .flatten()
                .chain(unknown)
                .collect();

                if !self.collect_all {
                    violations.truncate(1);
                }
                Verdict::Invalid(violations)
            }
        }
    }
}

/// Validate with the default first-error-wins policy
pub fn validate(payload: &Value) -> Verdict {
    Validator::new().validate(payload)
}

fn required_text(map: &Map<String, Value>, field: &str) -> Result<String, FieldViolation> {
    match map.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(FieldViolation::new(field, format!("{field} is required"))),
    }
}

fn optional_text(map: &Map<String, Value>, field: &str) -> Result<Option<String>, FieldViolation> {
    match map.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FieldViolation::new(field, format!("{field} must be a string"))),
    }
}

fn unknown_fields(map: &Map<String, Value>) -> Vec<FieldViolation> {
    let mut unknown: Vec<&String> = map
        .keys()
        .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        .collect();
    unknown.sort();

    unknown
        .into_iter()
        .map(|key| FieldViolation::new(key.as_str(), format!("{key} is not allowed")))
        .collect()
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~.-]+@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?\.)+[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?$",
        )
        .expect("email pattern compiles")
    })
}

/// Check an address against the accepted email grammar
///
/// A top-level domain is required, dots in the local part may not lead,
/// trail or repeat. Letters and digits from any script are accepted.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || !email_pattern().is_match(email) {
        return false;
    }

    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };

    local.len() <= MAX_LOCAL_PART_LENGTH
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}
