//! Field validation for public donation submissions.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::FieldError;
use crate::models::donation::NewDonation;

const MAX_MESSAGE_CHARS: usize = 2000;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\+]?[0-9\s\-\(\)]{10,}$").unwrap());

/// `1,000.50`-style grouping or a plain `1000.5`, either with an optional currency.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{1,3}(,\d{3})*(\.\d{1,2})?\s*(ETB|BIRR|USD|EUR)?$|^\d+(\.\d{1,2})?\s*(ETB|BIRR|USD|EUR)?$",
    )
    .unwrap()
});

/// Raw submission as posted by the donation form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmitDonationRequest {
    #[serde(default)]
    pub transaction_reference: Option<String>,
    pub donor_name: String,
    /// Email address or phone number.
    pub donor_contact: String,
    pub bank_used: String,
    /// e.g. `100`, `1,000`, `100.50`, `100 ETB`.
    pub amount_donated: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Check every field and either return the insertable row or all field errors.
pub fn validate_submission(req: &SubmitDonationRequest) -> Result<NewDonation, Vec<FieldError>> {
    let mut errors = Vec::new();

    let transaction_reference = match req.transaction_reference.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(r) => {
            let len = r.chars().count();
            if len < 3 {
                errors.push(FieldError::new(
                    "transaction_reference",
                    "Transaction reference must be at least 3 characters",
                ));
            } else if len > 50 {
                errors.push(FieldError::new(
                    "transaction_reference",
                    "Transaction reference must be less than 50 characters",
                ));
            } else if !REFERENCE.is_match(r) {
                errors.push(FieldError::new(
                    "transaction_reference",
                    "Transaction reference can only contain letters, numbers, hyphens, and underscores",
                ));
            }
            Some(r.to_string())
        }
    };

    let donor_name = req.donor_name.trim();
    match donor_name.chars().count() {
        0 => errors.push(FieldError::new("donor_name", "Donor name is required")),
        1 => errors.push(FieldError::new(
            "donor_name",
            "Donor name must be at least 2 characters",
        )),
        n if n > 100 => errors.push(FieldError::new(
            "donor_name",
            "Donor name must be less than 100 characters",
        )),
        _ => {}
    }

    let donor_contact = req.donor_contact.trim();
    if donor_contact.is_empty() {
        errors.push(FieldError::new("donor_contact", "Contact information is required"));
    } else if !is_email(donor_contact) && !is_phone(donor_contact) {
        errors.push(FieldError::new(
            "donor_contact",
            "Please enter a valid email or phone number",
        ));
    }

    let bank_used = req.bank_used.trim();
    if bank_used.is_empty() {
        errors.push(FieldError::new("bank_used", "Bank information is required"));
    }

    let amount_donated = req.amount_donated.trim();
    if amount_donated.is_empty() {
        errors.push(FieldError::new("amount_donated", "Amount is required"));
    } else if !is_amount(amount_donated) {
        errors.push(FieldError::new(
            "amount_donated",
            "Please enter a valid amount (e.g., 100, 1,000, 100.50, 100 ETB)",
        ));
    }

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    if message.is_some_and(|m| m.chars().count() > MAX_MESSAGE_CHARS) {
        errors.push(FieldError::new(
            "message",
            format!("Message must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewDonation {
        transaction_reference,
        donor_name: donor_name.to_string(),
        donor_contact: donor_contact.to_string(),
        bank_used: bank_used.to_string(),
        amount_donated: amount_donated.to_string(),
        message: message.map(str::to_string),
        submitted_at: Utc::now(),
    })
}

fn is_email(s: &str) -> bool {
    EMAIL.is_match(s)
}

/// Spaces are ignored, so `+251 911 234 567` counts as a phone number.
fn is_phone(s: &str) -> bool {
    PHONE.is_match(&s.replace(' ', ""))
}

/// Currency suffixes match case-insensitively.
fn is_amount(s: &str) -> bool {
    AMOUNT.is_match(&s.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitDonationRequest {
        SubmitDonationRequest {
            transaction_reference: Some("FT23_ABC-1".to_string()),
            donor_name: "  Abebe Kebede ".to_string(),
            donor_contact: "abebe@example.com".to_string(),
            bank_used: "Commercial Bank of Ethiopia".to_string(),
            amount_donated: "1,000.50 ETB".to_string(),
            message: Some("  ".to_string()),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let new = validate_submission(&request()).unwrap();
        assert_eq!(new.donor_name, "Abebe Kebede");
        assert_eq!(new.transaction_reference.as_deref(), Some("FT23_ABC-1"));
        assert_eq!(new.message, None);
    }

    #[test]
    fn blank_reference_becomes_none() {
        let mut req = request();
        req.transaction_reference = Some("   ".to_string());
        assert_eq!(validate_submission(&req).unwrap().transaction_reference, None);
    }

    #[test]
    fn reference_rules() {
        let too_long = "x".repeat(51);
        for bad in ["ab", "has space", "semi;colon", too_long.as_str()] {
            let mut req = request();
            req.transaction_reference = Some(bad.to_string());
            let errors = validate_submission(&req).unwrap_err();
            assert_eq!(fields(&errors), vec!["transaction_reference"], "{bad}");
        }
    }

    #[test]
    fn all_errors_are_collected() {
        let req = SubmitDonationRequest {
            transaction_reference: None,
            donor_name: "A".to_string(),
            donor_contact: "nope".to_string(),
            bank_used: " ".to_string(),
            amount_donated: "".to_string(),
            message: None,
        };
        let errors = validate_submission(&req).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["donor_name", "donor_contact", "bank_used", "amount_donated"]
        );
    }

    #[test]
    fn contact_accepts_email_or_phone() {
        for ok in ["a@b.co", "+251 911 234 567", "(011) 551-2345", "0911234567"] {
            assert!(is_email(ok) || is_phone(ok), "{ok}");
        }
        for bad in ["a@b", "@b.com", "a b@c.com", "a@.com", "12345", "+251-abc-12345"] {
            assert!(!is_email(bad) && !is_phone(bad), "{bad}");
        }
    }

    #[test]
    fn phone_ignores_spaces_but_not_letters() {
        assert!(is_phone("+251 91 123 4567"));
        assert!(is_phone("011-551-2345"));
        assert!(!is_phone("+25191123x567"));
        assert!(!is_phone("+ 123 456 78"));
    }

    #[test]
    fn amount_formats() {
        for ok in ["100", "1,000", "100.50", "100 ETB", "12,345.6birr", "5USD", "1000000.25 eur"] {
            assert!(is_amount(ok), "{ok}");
        }
        for bad in ["", "ETB", "1,00", "1000,000", "10.", "10.123", "-5", "ten", "100 GBP", "1.000,50"] {
            assert!(!is_amount(bad), "{bad}");
        }
    }

    #[test]
    fn overlong_message_is_rejected() {
        let mut req = request();
        req.message = Some("x".repeat(MAX_MESSAGE_CHARS + 1));
        assert_eq!(fields(&validate_submission(&req).unwrap_err()), vec!["message"]);
    }
}
