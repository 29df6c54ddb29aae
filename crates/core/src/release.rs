//! Release entity, directory input and the inbound request contract.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::release_status::ReleaseStatus;
use crate::types::{today, Date, ReleaseId, Timestamp};

/// A fully-populated release record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: ReleaseId,
    pub name: String,
    pub description: Option<String>,
    pub status: ReleaseStatus,
    pub release_date: Option<Date>,
    pub created_at: Timestamp,
    pub last_update_at: Timestamp,
}

/// Plain input accepted by the directory's create and update operations.
///
/// `status` is a label; the directory resolves it against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInput {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub release_date: Option<Date>,
}

/// Inbound create/update body.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a field error rather than a malformed payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    #[validate(
        required(message = "Name is required"),
        custom(function = "not_blank", message = "Name is required"),
        length(max = 255, message = "Name cannot exceed 255 characters")
    )]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(required(message = "Status is required"))]
    pub status: Option<String>,

    #[validate(custom(
        function = "future_or_present",
        message = "Release date must be today or in the future"
    ))]
    pub release_date: Option<Date>,
}

impl ReleaseRequest {
    /// Validate the request and convert it into directory input.
    pub fn into_input(self) -> Result<ReleaseInput, ValidationErrors> {
        self.validate()?;

        // `required` guarantees both are present once validation passed.
        Ok(ReleaseInput {
            name: self.name.unwrap_or_default(),
            description: self.description,
            status: self.status.unwrap_or_default(),
            release_date: self.release_date,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn future_or_present(value: &Date) -> Result<(), ValidationError> {
    if *value < today() {
        let mut err = ValidationError::new("future_or_present");
        err.add_param(Cow::Borrowed("value"), &value.to_string());
        return Err(err);
    }
    Ok(())
}

/// Flatten validation errors into a `field -> first message` map.
///
/// Field names are reported in their camelCase wire form.
pub fn field_messages(errors: &ValidationErrors) -> std::collections::BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let message = errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })?;
            Some((to_camel_case(&field), message))
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
