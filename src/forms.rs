use crate::markup;

pub const INVALID_CLASS: &str = "is-invalid";
pub const CONTENT_COUNTER: CharacterCounter = CharacterCounter::new(2000);
pub const DESCRIPTION_COUNTER: CharacterCounter = CharacterCounter::new(500);
const COUNTER_WARNING_BELOW: i64 = 50;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub required: bool,
    pub invalid: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn class(&self) -> &'static str {
        if self.invalid { INVALID_CLASS } else { "" }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Form {
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.name == name) {
            field.value = value.into();
        }
    }

    /// Name/value pairs in field order, as they would be form-encoded.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }
}

/// Marks every required field with a blank value invalid and clears the mark
/// everywhere else. Returns whether the form may be submitted.
pub fn validate_form(form: &mut Form) -> bool {
    let mut valid = true;
    for field in &mut form.fields {
        field.invalid = field.required && field.value.trim().is_empty();
        valid &= !field.invalid;
    }
    valid
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeCheck {
    /// Value to put back into the input; `None` when the input is not a number.
    pub value: Option<i64>,
    pub warning: Option<String>,
}

/// Clamps a typed grade into `0..=max_points`.
pub fn check_grade(raw: &str, max_points: i64) -> GradeCheck {
    let Some(value) = leading_integer(raw) else {
        return GradeCheck {
            value: None,
            warning: None,
        };
    };
    if value > max_points {
        GradeCheck {
            value: Some(max_points),
            warning: Some(format!("Grade cannot exceed {max_points} points")),
        }
    } else {
        GradeCheck {
            value: Some(value.max(0)),
            warning: None,
        }
    }
}

// "87.5" and "90 pts" both read as their leading integer
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['-', '+']));
    let digits = raw[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len() - sign_len);
    if digits == 0 {
        return None;
    }
    raw[..sign_len + digits].parse().ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterCounter {
    pub max_len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterStatus {
    pub remaining: i64,
    pub label: String,
    pub class: &'static str,
}

impl CharacterCounter {
    pub const fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn status(&self, text: &str) -> CounterStatus {
        let remaining = self.max_len as i64 - text.chars().count() as i64;
        CounterStatus {
            remaining,
            label: format!("{remaining} characters remaining"),
            class: if remaining < COUNTER_WARNING_BELOW {
                "text-warning"
            } else {
                "text-muted"
            },
        }
    }
}

/// The "Selected: <name>" line shown under a file input.
pub fn file_preview(file_name: &str) -> Option<String> {
    let name = file_name.trim();
    (!name.is_empty()).then(|| markup::file_preview(name))
}
