//! Project entity.

use super::{BoardDomainError, HexColor, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project grouping tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    color: HexColor,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyName`] when `name` is empty after
    /// trimming.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        color: HexColor,
    ) -> Result<Self, BoardDomainError> {
        let label: String = name.into();
        if label.trim().is_empty() {
            return Err(BoardDomainError::EmptyName { entity: "project" });
        }
        Ok(Self {
            id,
            name: label,
            description: description.into(),
            color,
            created_at: None,
            updated_at: None,
        })
    }

    /// Sets the store timestamps.
    #[must_use]
    pub const fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the display colour.
    #[must_use]
    pub const fn color(&self) -> &HexColor {
        &self.color
    }

    /// Returns the store creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the store modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
