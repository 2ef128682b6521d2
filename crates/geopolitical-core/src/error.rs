// crates/geopolitical-core/src/error.rs
use crate::common::EntityKind;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors returned by the engine and the snapshot loader.
#[derive(Debug, Error)]
pub enum GeoError {
    /// One write attempt produced one or more validation findings.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Raised by a store when a write would break its unique slug/id index.
    #[error("duplicate {kind} identity: {key}")]
    DuplicateIdentity { kind: EntityKind, key: String },

    /// A cascading delete hit a failing child; the parent was kept.
    #[error("delete of {parent} stopped, {} children not removed", remaining.len())]
    CascadeIncomplete {
        parent: String,
        remaining: Vec<String>,
        #[source]
        source: Box<GeoError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary codec error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl GeoError {
    pub fn not_found(kind: EntityKind, key: impl fmt::Display) -> Self {
        GeoError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// The collected findings when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            GeoError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for GeoError {
    fn from(errors: ValidationErrors) -> Self {
        GeoError::Invalid(errors)
    }
}

impl From<ValidationError> for GeoError {
    fn from(error: ValidationError) -> Self {
        GeoError::Invalid(error.into())
    }
}

/// A single validation finding for one write attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} can't be blank")]
    MissingRequiredField { field: &'static str },

    #[error("{field} must be unique within its {scope}")]
    ScopedUniquenessViolation {
        field: &'static str,
        scope: &'static str,
    },

    #[error("{field}: {detail}")]
    HierarchyMismatch { field: &'static str, detail: String },

    #[error("slug {slug} is already taken")]
    DuplicateIdentity { slug: String },

    #[error("{field} refers to unknown {kind} {key}")]
    UnknownReference {
        field: &'static str,
        kind: EntityKind,
        key: String,
    },

    #[error("{field} cannot be changed")]
    ImmutableField { field: &'static str },
}

impl ValidationError {
    /// Field the finding is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField { field }
            | ValidationError::ScopedUniquenessViolation { field, .. }
            | ValidationError::HierarchyMismatch { field, .. }
            | ValidationError::UnknownReference { field, .. }
            | ValidationError::ImmutableField { field } => field,
            ValidationError::DuplicateIdentity { .. } => "slug",
        }
    }
}

/// All findings of one write attempt, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.errors.contains(error)
    }

    /// Messages grouped by field, as a form layer would render them.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut out: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for e in &self.errors {
            out.entry(e.field()).or_default().push(e.to_string());
        }
        out
    }

    /// `Ok(value)` when nothing was collected.
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(GeoError::Invalid(self))
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
