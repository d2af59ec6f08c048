use serde::{Deserialize, Serialize};

use crate::domain::{Property, PropertyId};

pub const PROPERTIES_PATH: &str = "/properties";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreatePropertyResponse {
    pub id: PropertyId,
}

/// `GET /properties` body. The backend serializes an empty collection as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyList(pub Option<Vec<Property>>);

impl PropertyList {
    pub fn into_vec(self) -> Vec<Property> {
        self.0.unwrap_or_default()
    }
}
