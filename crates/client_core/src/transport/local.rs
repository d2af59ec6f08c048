use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{NewProperty, Property, PropertyId},
    error::RecordError,
};
use tokio::sync::Mutex;
use tracing::info;

use crate::RecordService;

/// In-process record service standing in for the desktop bridge.
///
/// Records live in memory for the lifetime of the value and come back in
/// insertion order.
pub struct LocalRecordService {
    inner: Mutex<LocalState>,
}

struct LocalState {
    next_id: i64,
    properties: Vec<Property>,
}

impl LocalRecordService {
    pub fn new() -> Self {
        Self::with_properties(Vec::new())
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        let next_id = properties.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(LocalState {
                next_id,
                properties,
            }),
        }
    }
}

impl Default for LocalRecordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordService for LocalRecordService {
    async fn list_properties(&self) -> Result<Vec<Property>, RecordError> {
        Ok(self.inner.lock().await.properties.clone())
    }

    async fn create_property(&self, property: &NewProperty) -> Result<PropertyId, RecordError> {
        if property.address.trim().is_empty() || property.city.trim().is_empty() {
            return Err(RecordError::rejected("address and city cannot be empty"));
        }

        let mut guard = self.inner.lock().await;
        let id = PropertyId(guard.next_id);
        guard.next_id += 1;
        guard
            .properties
            .push(property.clone().into_property(id, Utc::now()));
        info!(property_id = id.0, "stored property in local service");
        Ok(id)
    }
}
