//! Email address shape check
//!
//! Accepts the usual `local@domain.tld` shape: a local part of letters,
//! digits and `_ ' + - .` that neither starts with a dot nor ends with a dot
//! or apostrophe, one or more dotted domain labels, and an alphabetic TLD of
//! at least two letters. Consecutive dots are rejected anywhere.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Whether `value` has the shape of an email address
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}
