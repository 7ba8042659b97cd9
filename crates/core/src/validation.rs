//! Declarative input validation support.
//!
//! DTOs declare their rules with `#[derive(Validate)]` attributes; this
//! module supplies the custom rule functions those attributes reference and
//! flattens `validator`'s error tree into the `[{field, message}]` list the
//! API reports.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

use crate::error::{CoreError, FieldError};
use crate::roles::ALL_ROLES;
use crate::slug::{is_valid_slug, slugify};
use crate::status::{CONTACT_STATUSES, POST_STATUSES, PROJECT_STATUSES};

/// Longest name accepted inside a relation array (technologies, tags, ...).
pub const MAX_RELATION_NAME_LENGTH: usize = 60;

/// Largest relation array accepted in one payload.
pub const MAX_RELATION_ITEMS: usize = 50;

/// Category ids that collide with static routes under `/categories`.
pub const RESERVED_CATEGORY_IDS: &[&str] = &["recount"];

/// A request body type with declared validation rules.
pub trait Payload: DeserializeOwned + Validate {
    /// Partial payloads (updates) must carry at least one non-null field.
    const PARTIAL: bool = false;

    /// Rules spanning several fields, checked alongside the declared ones.
    fn cross_field_errors(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

/// Run `input`'s declared rules, mapping failures to [`CoreError::InvalidFields`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidFields(collect_field_errors(&errors)))
}

/// Declared rules plus [`Payload::cross_field_errors`], reported together.
pub fn validate_payload<T: Payload>(input: &T) -> Result<(), CoreError> {
    let mut fields = match input.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_field_errors(&errors),
    };
    for extra in input.cross_field_errors() {
        if !fields.iter().any(|f| f.field == extra.field) {
            fields.push(extra);
        }
    }
    if fields.is_empty() {
        return Ok(());
    }
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    Err(CoreError::InvalidFields(fields))
}

/// Check the slug `field` would get from `source` when no explicit value
/// was sent. `None` when an explicit value is present, the source is
/// missing, or the derived slug is usable.
pub fn derived_slug_error(
    field: &str,
    explicit: Option<&str>,
    source: Option<&str>,
    reserved: &[&str],
) -> Option<FieldError> {
    if explicit.is_some() {
        return None;
    }
    let derived = slugify(source?);
    if derived.is_empty() {
        Some(FieldError::new(
            field,
            format!("{field} cannot be derived from text without letters or digits; provide one"),
        ))
    } else if reserved.contains(&derived.as_str()) {
        Some(FieldError::new(field, format!("{field} '{derived}' is reserved")))
    } else {
        None
    }
}

/// Flatten `validator` errors into a field-sorted list of messages.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(move |e| FieldError::new(field.clone(), describe(&field, e)))
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "required" => format!("{field} is required"),
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => {
                format!("{field} must be between {min} and {max} characters")
            }
            (Some(min), None) => format!("{field} must be at least {min} characters"),
            (None, Some(max)) => format!("{field} must be at most {max} characters"),
            (None, None) => format!("{field} has an invalid length"),
        },
        "email" => format!("{field} must be a valid email address"),
        "url" => format!("{field} must be a valid URL"),
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
            (Some(min), None) => format!("{field} must be at least {min}"),
            (None, Some(max)) => format!("{field} must be at most {max}"),
            (None, None) => format!("{field} is out of range"),
        },
        _ => format!("{field} is invalid"),
    }
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(rule_error(
            code,
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

// ---------------------------------------------------------------------------
// Custom rule functions referenced by `#[validate(custom(function = ...))]`
// ---------------------------------------------------------------------------

pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if is_valid_slug(value) {
        Ok(())
    } else {
        Err(rule_error(
            "slug",
            "must contain only lowercase letters, digits and single hyphens".into(),
        ))
    }
}

/// A slug that is not one of [`RESERVED_CATEGORY_IDS`].
pub fn validate_category_id(value: &str) -> Result<(), ValidationError> {
    validate_slug(value)?;
    if RESERVED_CATEGORY_IDS.contains(&value) {
        return Err(rule_error("reserved", format!("'{value}' is reserved")));
    }
    Ok(())
}

pub fn validate_project_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, PROJECT_STATUSES, "project_status")
}

pub fn validate_post_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, POST_STATUSES, "post_status")
}

pub fn validate_contact_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, CONTACT_STATUSES, "contact_status")
}

pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, ALL_ROLES, "role")
}

/// Relation name arrays: bounded size, every entry non-blank and short.
pub fn validate_relation_names(names: &[String]) -> Result<(), ValidationError> {
    if names.len() > MAX_RELATION_ITEMS {
        return Err(rule_error(
            "relation_names",
            format!("must contain at most {MAX_RELATION_ITEMS} entries"),
        ));
    }
    if names
        .iter()
        .any(|n| n.trim().is_empty() || n.chars().count() > MAX_RELATION_NAME_LENGTH)
    {
        return Err(rule_error(
            "relation_names",
            format!("entries must be between 1 and {MAX_RELATION_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Arrays of image URLs: bounded size, every entry a valid URL.
pub fn validate_url_list(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > MAX_RELATION_ITEMS {
        return Err(rule_error(
            "url_list",
            format!("must contain at most {MAX_RELATION_ITEMS} entries"),
        ));
    }
    if urls.iter().any(|u| !u.validate_url()) {
        return Err(rule_error("url_list", "entries must be valid URLs".into()));
    }
    Ok(())
}

/// De-duplicate relation names case-insensitively, keeping first spellings.
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
        .collect()
}
