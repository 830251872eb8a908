//! Presence and format checks run before any backend call.

use crate::error::{FormErrors, FormField, ValidationError};
use crate::models::repair_request::RepairRequestDraft;
use crate::models::user::{ProfileUpdate, SignUpForm};
use regex::Regex;
use std::sync::LazyLock;

// Indonesian mobile numbers: +62 / 62 / 0 prefix, then 8, a non-zero
// operator digit and 6-9 more digits.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+62|62|0)8[1-9][0-9]{6,9}$").expect("PHONE_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]{1,64}@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)+$")
        .expect("EMAIL_REGEX: invalid regex pattern")
});

pub const MIN_PASSWORD_LEN: usize = 6;

/// First failing check wins: issue, then date, then time.
pub fn validate_booking(draft: &RepairRequestDraft) -> Result<(), ValidationError> {
    if draft.issue.trim().is_empty() {
        return Err(ValidationError::MissingIssue);
    }
    if draft.scheduled_date == 0 {
        return Err(ValidationError::MissingDate);
    }
    if draft.scheduled_time.is_empty() {
        return Err(ValidationError::MissingTime);
    }
    Ok(())
}

/// Reports every failing field at once.
pub fn validate_registration(form: &SignUpForm) -> Result<(), ValidationError> {
    let mut errors = FormErrors::default();

    if form.full_name.trim().is_empty() {
        errors.push(FormField::FullName, "Please enter your full name");
    }
    if !is_valid_phone_number(form.mobile.trim()) {
        errors.push(FormField::Mobile, "Please enter a valid phone number");
    }
    if !is_valid_email(form.email.trim()) {
        errors.push(FormField::Email, "Please enter a valid email address");
    }
    if form.password.trim().chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            FormField::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Form(errors))
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    let mut errors = FormErrors::default();
    if !is_valid_email(email.trim()) {
        errors.push(FormField::Email, "Please enter a valid email address");
    }
    if password.is_empty() {
        errors.push(FormField::Password, "Please enter your password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Form(errors))
    }
}

/// Name is required; a mobile number, when given, must be well-formed once
/// spaces and dashes are removed.
pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
    let mut errors = FormErrors::default();
    if update.full_name.trim().is_empty() {
        errors.push(FormField::FullName, "Please enter your full name");
    }
    let mobile: String = update
        .mobile
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !mobile.is_empty() && !is_valid_phone_number(&mobile) {
        errors.push(FormField::Mobile, "Please enter a valid phone number");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Form(errors))
    }
}

pub fn validate_rating(rating: f32) -> Result<(), ValidationError> {
    if rating.is_finite() && (1.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::RatingOutOfRange)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Normalize to the local `08…` form: digits only, a `62` country prefix
/// becomes `0`, and a missing leading `0` is added.
pub fn format_phone_number(number: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if let Some(rest) = digits.strip_prefix("62") {
        format!("0{rest}")
    } else if digits.starts_with('0') {
        digits
    } else {
        format!("0{digits}")
    }
}
