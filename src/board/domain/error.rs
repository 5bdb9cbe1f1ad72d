//! Error types for board domain validation and parsing.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A record identifier was empty after trimming.
    #[error("record identifier must not be empty")]
    EmptyIdentifier,

    /// A project or tag name was empty after trimming.
    #[error("{entity} name must not be empty")]
    EmptyName {
        /// Entity kind whose name was rejected.
        entity: &'static str,
    },

    /// The colour is not a `#rgb` or `#rrggbb` hex colour.
    #[error("invalid hex colour '{0}'")]
    InvalidColor(String),
}

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing a canonical task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Field-level validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `true` when no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// User input rejected before any store call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The tag name is empty after trimming.
    #[error("tag name must not be empty")]
    EmptyTagName,

    /// One or more project form fields are invalid.
    #[error("invalid project: {0}")]
    InvalidProject(FieldErrors),
}

impl ValidationError {
    /// Returns the message shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyTitle => "Task title is required".to_owned(),
            Self::EmptyTagName => "Tag name is required".to_owned(),
            Self::InvalidProject(fields) => fields
                .iter()
                .next()
                .map_or_else(|| "Project is invalid".to_owned(), |(_, msg)| msg.to_owned()),
        }
    }
}
