//! Room model.
//!
//! Rooms are keyed by facility ID (e.g. `SBS-101`). The building is the
//! facility prefix unless set explicitly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A teaching room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Facility ID.
    pub id: String,
    /// Seats.
    pub capacity: u32,
    /// Building code.
    pub building: String,
    /// Whether the room supports lab sections.
    pub lab: bool,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

impl Room {
    /// Creates a room; the building defaults to the facility prefix before `-`.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        let building = building_of(&id).to_string();
        Self {
            id,
            capacity,
            building,
            lab: false,
            attributes: HashMap::new(),
        }
    }

    /// Sets the building explicitly.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Marks the room as lab-capable.
    pub fn with_lab(mut self) -> Self {
        self.lab = true;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Building code of a facility ID: the part before the first `-`.
pub fn building_of(facility_id: &str) -> &str {
    facility_id
        .split_once('-')
        .map(|(b, _)| b)
        .unwrap_or(facility_id)
}
