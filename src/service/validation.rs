//! Email format validation for person payloads.

use crate::error::AppError;
use crate::model::{NewPerson, PersonChanges};
use regex::Regex;
use std::sync::LazyLock;

/// Lowercase local part and domain, 2-4 letter TLD. Uppercase letters do not match.
static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$"));

/// False when the string does not match, or when the pattern itself failed to compile.
pub fn is_email_valid(s: &str) -> bool {
    EMAIL_RE.as_ref().map(|re| re.is_match(s)).unwrap_or(false)
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn new_person(body: &NewPerson) -> Result<(), AppError> {
        check_email(&body.email)
    }

    /// Email is checked only when the change set carries one.
    pub fn person_changes(body: &PersonChanges) -> Result<(), AppError> {
        match body.email {
            Some(ref email) => check_email(email),
            None => Ok(()),
        }
    }
}

fn check_email(email: &str) -> Result<(), AppError> {
    let re = EMAIL_RE
        .as_ref()
        .map_err(|_| AppError::Validation("invalid email pattern"))?;
    if re.is_match(email) {
        Ok(())
    } else {
        Err(AppError::Validation("invalid email"))
    }
}
