//! Field validation for create/update payloads.
//!
//! Each field has its own check returning either the clean value or a
//! `FieldError`; `validate_company` runs all of them and reports every failure
//! at once.

use crate::{
    error::FieldError,
    models::{CompanyFields, CompanyPayload},
    services::document::normalize_document,
    Error, Result,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use validator::ValidateEmail;

type FieldOutcome<T> = std::result::Result<T, FieldError>;

const MAX_TEXT_LENGTH: usize = 255;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn validate_company(payload: CompanyPayload) -> Result<CompanyFields> {
    let mut errors = Vec::new();

    let document_number = collect(&mut errors, document_number(payload.document_number));
    let social_name = collect(&mut errors, text("social_name", payload.social_name));
    let legal_name = collect(&mut errors, text("legal_name", payload.legal_name));
    let creation_date = collect(&mut errors, creation_date(payload.creation_date));
    let responsible_email = collect(&mut errors, email(payload.responsible_email));
    let responsible_name = collect(&mut errors, text("responsible_name", payload.responsible_name));

    match (
        document_number,
        social_name,
        legal_name,
        creation_date,
        responsible_email,
        responsible_name,
    ) {
        (
            Some(document_number),
            Some(social_name),
            Some(legal_name),
            Some(creation_date),
            Some(responsible_email),
            Some(responsible_name),
        ) => Ok(CompanyFields {
            document_number,
            social_name,
            legal_name,
            creation_date,
            responsible_email,
            responsible_name,
        }),
        _ => Err(Error::Validation(errors)),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, outcome: FieldOutcome<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Present and non-blank after trimming.
fn required(field: &'static str, value: Option<String>) -> FieldOutcome<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldError::new(field, "is required")),
    }
}

fn text(field: &'static str, value: Option<String>) -> FieldOutcome<String> {
    let value = required(field, value)?;
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(FieldError::new(
            field,
            format!("must be at most {MAX_TEXT_LENGTH} characters"),
        ));
    }
    Ok(value)
}

fn document_number(value: Option<String>) -> FieldOutcome<String> {
    let raw = required("document_number", value)?;
    let normalized = normalize_document(&raw);
    if normalized.is_empty() {
        return Err(FieldError::new("document_number", "must contain digits"));
    }
    Ok(normalized)
}

fn creation_date(value: Option<String>) -> FieldOutcome<NaiveDate> {
    let raw = required("creation_date", value)?;
    parse_date(&raw).ok_or_else(|| FieldError::new("creation_date", "is not a valid date"))
}

fn email(value: Option<String>) -> FieldOutcome<String> {
    let value = required("responsible_email", value)?;
    if !value.validate_email() {
        return Err(FieldError::new(
            "responsible_email",
            "is not a valid email address",
        ));
    }
    Ok(value)
}

/// Accepts ISO dates, Brazilian `dd/mm/yyyy`, and date-times (the date part is kept).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
