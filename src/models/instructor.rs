//! Instructor model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An instructor who can be assigned to courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Department (descriptive).
    pub department: String,
    /// Home building; compared against the assigned room's building.
    pub building: String,
    /// Job title.
    pub title: String,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

impl Instructor {
    /// Creates an instructor with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            department: String::new(),
            building: String::new(),
            title: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the home building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Sets the job title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Name for display, falling back to the ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_builder() {
        let i = Instructor::new("jdp85")
            .with_name("Doe, Jane")
            .with_email("jdp85@example.edu")
            .with_building("SICCS")
            .with_attribute("rank", "associate");
        assert_eq!(i.display_name(), "Doe, Jane");
        assert_eq!(i.building, "SICCS");
        assert_eq!(i.attributes["rank"], "associate");
        assert_eq!(Instructor::new("x").display_name(), "x");
    }
}
