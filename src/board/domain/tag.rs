//! Tag entity.

use super::{BoardDomainError, HexColor, TagId};
use serde::{Deserialize, Serialize};

/// A label attachable to many tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
    color: HexColor,
}

impl Tag {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyName`] when `name` is empty after
    /// trimming.
    pub fn new(
        id: TagId,
        name: impl Into<String>,
        color: HexColor,
    ) -> Result<Self, BoardDomainError> {
        let label: String = name.into();
        if label.trim().is_empty() {
            return Err(BoardDomainError::EmptyName { entity: "tag" });
        }
        Ok(Self {
            id,
            name: label,
            color,
        })
    }

    /// Returns the tag identifier.
    #[must_use]
    pub const fn id(&self) -> &TagId {
        &self.id
    }

    /// Returns the tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display colour.
    #[must_use]
    pub const fn color(&self) -> &HexColor {
        &self.color
    }
}
