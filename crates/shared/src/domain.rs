use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PropertyId);

/// A property listing as returned by the record service.
///
/// Clients only ever hold whole snapshots of these; the service assigns the
/// id and every timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(alias = "ID")]
    pub id: PropertyId,
    #[serde(alias = "Address")]
    pub address: String,
    #[serde(alias = "City")]
    pub city: String,
    #[serde(alias = "ZIP")]
    pub zip: String,
    #[serde(default, alias = "LocationCode")]
    pub location_code: String,
    #[serde(default, alias = "SizeSqFt")]
    pub size_sqft: f64,
    #[serde(default, alias = "BasePriceUSD")]
    pub base_price_usd: f64,
    #[serde(alias = "ListingDate")]
    pub listing_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "LastModified"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Body of a create call: the record shape minus everything the service assigns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewProperty {
    pub address: String,
    pub city: String,
    pub zip: String,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub size_sqft: f64,
    #[serde(default)]
    pub base_price_usd: f64,
}

impl NewProperty {
    /// Materializes the record the service would store for this body.
    pub fn into_property(self, id: PropertyId, listed_at: DateTime<Utc>) -> Property {
        Property {
            id,
            address: self.address,
            city: self.city,
            zip: self.zip,
            location_code: self.location_code,
            size_sqft: self.size_sqft,
            base_price_usd: self.base_price_usd,
            listing_date: listed_at,
            created_at: Some(listed_at),
            last_modified: Some(listed_at),
        }
    }
}
