//! Perk field rules and the create / partial-update validators.
//!
//! Both validators take the raw JSON object from the request body so type
//! mismatches are reported as validation messages rather than as
//! deserialization failures. Create validation is fail-fast and returns the
//! first violated rule; update validation collects every field violation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::validation::{json_type_name, FieldViolation};

// ---------------------------------------------------------------------------
// Field names and limits
// ---------------------------------------------------------------------------

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DISCOUNT_PERCENT: &str = "discountPercent";
pub const FIELD_MERCHANT: &str = "merchant";

/// Minimum title length in characters.
pub const MIN_TITLE_LEN: usize = 2;

pub const MIN_DISCOUNT_PERCENT: f64 = 0.0;
pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The fixed set of perk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerkCategory {
    Food,
    Tech,
    Travel,
    Fitness,
    #[default]
    Other,
}

impl PerkCategory {
    pub const ALL: [PerkCategory; 5] = [
        PerkCategory::Food,
        PerkCategory::Tech,
        PerkCategory::Travel,
        PerkCategory::Fitness,
        PerkCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerkCategory::Food => "food",
            PerkCategory::Tech => "tech",
            PerkCategory::Travel => "travel",
            PerkCategory::Fitness => "fitness",
            PerkCategory::Other => "other",
        }
    }

    /// Comma-separated list of accepted values, for error messages.
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PerkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerkCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "{FIELD_CATEGORY} must be one of: {}",
                    Self::allowed_values()
                ))
            })
    }
}

/// Decodes the stored `category` column.
impl TryFrom<String> for PerkCategory {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Validated inputs
// ---------------------------------------------------------------------------

/// A fully populated perk ready for insertion, defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerk {
    pub title: String,
    pub description: String,
    pub category: PerkCategory,
    pub discount_percent: f64,
    pub merchant: Option<String>,
}

/// The subset of editable fields a partial update changes.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerkChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<PerkCategory>,
    pub discount_percent: Option<f64>,
    pub merchant: Option<String>,
}

/// Checks one field's value and records it on [`PerkChanges`].
type ApplyChange = fn(&Value, &mut PerkChanges) -> Result<(), String>;

/// Fields a client may set, in the order they are checked, each paired with
/// the rule that applies it. Keys missing from this table are disallowed.
const EDITABLE_FIELDS: &[(&str, ApplyChange)] = &[
    (FIELD_TITLE, apply_title),
    (FIELD_DESCRIPTION, apply_description),
    (FIELD_CATEGORY, apply_category),
    (FIELD_DISCOUNT_PERCENT, apply_discount_percent),
    (FIELD_MERCHANT, apply_merchant),
];

/// Whether `key` names a field a client may set.
fn is_editable_field(key: &str) -> bool {
    EDITABLE_FIELDS.iter().any(|(field, _)| *field == key)
}

fn apply_title(value: &Value, changes: &mut PerkChanges) -> Result<(), String> {
    changes.title = Some(check_title(value)?);
    Ok(())
}

fn apply_description(value: &Value, changes: &mut PerkChanges) -> Result<(), String> {
    changes.description = Some(check_text(FIELD_DESCRIPTION, value)?);
    Ok(())
}

fn apply_category(value: &Value, changes: &mut PerkChanges) -> Result<(), String> {
    changes.category = Some(check_category(value)?);
    Ok(())
}

fn apply_discount_percent(value: &Value, changes: &mut PerkChanges) -> Result<(), String> {
    changes.discount_percent = Some(check_discount_percent(value)?);
    Ok(())
}

fn apply_merchant(value: &Value, changes: &mut PerkChanges) -> Result<(), String> {
    changes.merchant = Some(check_text(FIELD_MERCHANT, value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate a create payload and normalize it into a [`NewPerk`].
///
/// Rules are checked in field order (title, description, category,
/// discountPercent, merchant) and the first violation is returned. Omitted or `null` optional fields take their defaults; present
/// but malformed ones are rejected. Keys outside the editable set are ignored.
pub fn validate_new_perk(input: &Map<String, Value>) -> Result<NewPerk, CoreError> {
    let title = match input.get(FIELD_TITLE) {
        None | Some(Value::Null) => {
            return Err(CoreError::Validation(format!("{FIELD_TITLE} is required")));
        }
        Some(value) => check_title(value).map_err(CoreError::Validation)?,
    };

    let description = optional_field(input, FIELD_DESCRIPTION, |v| {
        check_text(FIELD_DESCRIPTION, v)
    })?
    .unwrap_or_default();

    let category = optional_field(input, FIELD_CATEGORY, check_category)?.unwrap_or_default();

    let discount_percent =
        optional_field(input, FIELD_DISCOUNT_PERCENT, check_discount_percent)?
            .unwrap_or(MIN_DISCOUNT_PERCENT);

    let merchant = optional_field(input, FIELD_MERCHANT, |v| check_text(FIELD_MERCHANT, v))?;

    Ok(NewPerk {
        title,
        description,
        category,
        discount_percent,
        merchant,
    })
}

/// Validate a partial-update payload into [`PerkChanges`].
///
/// Unknown keys fail the whole request with a single message. Otherwise every
/// present field is checked and all violations are returned together as
/// [`CoreError::FieldViolations`]. `null` is not accepted for any field.
pub fn validate_perk_changes(input: &Map<String, Value>) -> Result<PerkChanges, CoreError> {
    let disallowed: Vec<&str> = input
        .keys()
        .map(String::as_str)
        .filter(|key| !is_editable_field(key))
        .collect();
    if !disallowed.is_empty() {
        return Err(CoreError::Validation(format!(
            "Invalid fields provided: {}",
            disallowed.join(", ")
        )));
    }

    let mut changes = PerkChanges::default();
    let mut violations = Vec::new();

    for &(field, apply) in EDITABLE_FIELDS {
        let Some(value) = input.get(field) else {
            continue;
        };
        if let Err(message) = apply(value, &mut changes) {
            violations.push(FieldViolation::new(field, message));
        }
    }

    if violations.is_empty() {
        Ok(changes)
    } else {
        Err(CoreError::FieldViolations(violations))
    }
}

// ---------------------------------------------------------------------------
// Per-field checks
// ---------------------------------------------------------------------------

/// Run `check` on an optional field; absent and `null` both yield `None`.
fn optional_field<T>(
    input: &Map<String, Value>,
    field: &str,
    check: impl FnOnce(&Value) -> Result<T, String>,
) -> Result<Option<T>, CoreError> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => check(value).map(Some).map_err(CoreError::Validation),
    }
}

fn check_title(value: &Value) -> Result<String, String> {
    let title = check_text(FIELD_TITLE, value)?;
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(format!(
            "{FIELD_TITLE} must be at least {MIN_TITLE_LEN} characters long"
        ));
    }
    Ok(title)
}

fn check_text(field: &str, value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{field} must be a string, got {}", json_type_name(value)))
}

fn check_category(value: &Value) -> Result<PerkCategory, String> {
    let raw = check_text(FIELD_CATEGORY, value)?;
    raw.parse::<PerkCategory>().map_err(|_| {
        format!(
            "{FIELD_CATEGORY} must be one of: {}",
            PerkCategory::allowed_values()
        )
    })
}

fn check_discount_percent(value: &Value) -> Result<f64, String> {
    let percent = value.as_f64().ok_or_else(|| {
        format!(
            "{FIELD_DISCOUNT_PERCENT} must be a number, got {}",
            json_type_name(value)
        )
    })?;
    if !(MIN_DISCOUNT_PERCENT..=MAX_DISCOUNT_PERCENT).contains(&percent) {
        return Err(format!(
            "{FIELD_DISCOUNT_PERCENT} must be between {MIN_DISCOUNT_PERCENT} and {MAX_DISCOUNT_PERCENT}, got {percent}"
        ));
    }
    Ok(percent)
}
