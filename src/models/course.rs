//! Course (section) model.
//!
//! One `Course` is one schedulable section: the unit that receives a time
//! slot, an instructor, and a room.

use serde::{Deserialize, Serialize};

/// A course section to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier: `<catalog_id>_<section>`.
    pub id: String,
    /// Catalog course ID.
    pub catalog_id: String,
    /// Section number (e.g. `"001"`).
    pub section: String,
    /// Class number from the schedule of classes.
    pub class_nbr: String,
    /// Subject + number (e.g. `"CS 126"`).
    pub subject_number: String,
    /// Free-text description.
    pub description: String,
    /// Maximum enrollment (seats required).
    pub enrollment_cap: u32,
    /// Administrative unit; compared against the room's building.
    pub department: String,
    /// Instructors able to teach this course. Empty = any instructor.
    pub qualified_instructors: Vec<String>,
    /// Whether the course must meet in a lab-capable room.
    pub requires_lab: bool,
}

impl Course {
    /// Creates a course from its catalog ID and section.
    pub fn new(catalog_id: impl Into<String>, section: impl Into<String>) -> Self {
        let catalog_id = catalog_id.into();
        let section = section.into();
        Self {
            id: format!("{catalog_id}_{section}"),
            catalog_id,
            section,
            class_nbr: String::new(),
            subject_number: String::new(),
            description: String::new(),
            enrollment_cap: 0,
            department: String::new(),
            qualified_instructors: Vec::new(),
            requires_lab: false,
        }
    }

    /// Sets the class number.
    pub fn with_class_nbr(mut self, class_nbr: impl Into<String>) -> Self {
        self.class_nbr = class_nbr.into();
        self
    }

    /// Sets subject + number.
    pub fn with_subject_number(mut self, subject_number: impl Into<String>) -> Self {
        self.subject_number = subject_number.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the enrollment cap.
    pub fn with_enrollment_cap(mut self, cap: u32) -> Self {
        self.enrollment_cap = cap;
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds a qualified instructor.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.qualified_instructors.push(instructor_id.into());
        self
    }

    /// Sets the full qualified-instructor list.
    pub fn with_instructors(mut self, instructor_ids: Vec<String>) -> Self {
        self.qualified_instructors = instructor_ids;
        self
    }

    /// Marks the course as needing a lab room.
    pub fn with_lab(mut self) -> Self {
        self.requires_lab = true;
        self
    }

    /// Whether `instructor_id` may teach this course.
    pub fn is_qualified(&self, instructor_id: &str) -> bool {
        self.qualified_instructors.is_empty()
            || self.qualified_instructors.iter().any(|i| i == instructor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("000123", "001")
            .with_class_nbr("1234")
            .with_subject_number("CS 126")
            .with_enrollment_cap(40)
            .with_department("SICCS")
            .with_instructor("I1")
            .with_instructor("I2")
            .with_lab();

        assert_eq!(c.id, "000123_001");
        assert_eq!(c.catalog_id, "000123");
        assert_eq!(c.section, "001");
        assert_eq!(c.enrollment_cap, 40);
        assert!(c.requires_lab);
        assert!(c.is_qualified("I1"));
        assert!(!c.is_qualified("I3"));
    }

    #[test]
    fn test_empty_pool_qualifies_anyone() {
        let c = Course::new("X", "1");
        assert!(c.is_qualified("anyone"));
    }
}
