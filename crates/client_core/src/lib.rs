use async_trait::async_trait;
use shared::{
    domain::{NewProperty, Property, PropertyId},
    error::RecordError,
};

pub mod controller;
pub mod draft;
pub mod transport;

pub use controller::{Notice, Operation, Phase, ViewController, ViewError, ViewEvent, ViewState};
pub use draft::{Draft, DraftField, UnknownDraftField};
pub use transport::{http::HttpRecordService, local::LocalRecordService};

/// Boundary to whatever stores property records.
///
/// The controller only sees this trait; whether calls travel over HTTP or stay
/// in-process is decided by whoever builds the controller.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn list_properties(&self) -> Result<Vec<Property>, RecordError>;
    async fn create_property(&self, property: &NewProperty) -> Result<PropertyId, RecordError>;
}
