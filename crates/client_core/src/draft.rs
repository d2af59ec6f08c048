//! In-progress form values for a property that has not been created yet.

use std::{collections::BTreeMap, fmt, str::FromStr};

use shared::{domain::NewProperty, error::RecordError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Address,
    City,
    Zip,
    LocationCode,
    SizeSqft,
    BasePriceUsd,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Address,
        DraftField::City,
        DraftField::Zip,
        DraftField::LocationCode,
        DraftField::SizeSqft,
        DraftField::BasePriceUsd,
    ];

    pub const REQUIRED: [DraftField; 3] = [DraftField::Address, DraftField::City, DraftField::Zip];

    pub fn name(self) -> &'static str {
        match self {
            DraftField::Address => "address",
            DraftField::City => "city",
            DraftField::Zip => "zip",
            DraftField::LocationCode => "location_code",
            DraftField::SizeSqft => "size_sqft",
            DraftField::BasePriceUsd => "base_price_usd",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown draft field '{0}'")]
pub struct UnknownDraftField(pub String);

impl FromStr for DraftField {
    type Err = UnknownDraftField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "address" | "addr" => DraftField::Address,
            "city" => DraftField::City,
            "zip" => DraftField::Zip,
            "location_code" | "loccode" => DraftField::LocationCode,
            "size_sqft" | "size" => DraftField::SizeSqft,
            "base_price_usd" | "price" => DraftField::BasePriceUsd,
            _ => return Err(UnknownDraftField(raw.to_string())),
        };
        Ok(field)
    }
}

/// Form values keyed by field. Unset fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<DraftField, String>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: DraftField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: DraftField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|value| value.trim().is_empty())
    }

    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Checks the required fields and coerces the draft into a create body.
    pub fn validate(&self) -> Result<NewProperty, RecordError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(RecordError::MissingFields(
                missing.into_iter().map(DraftField::name).collect(),
            ));
        }

        Ok(NewProperty {
            address: self.get(DraftField::Address).trim().to_string(),
            city: self.get(DraftField::City).trim().to_string(),
            zip: self.get(DraftField::Zip).trim().to_string(),
            location_code: self.get(DraftField::LocationCode).trim().to_string(),
            size_sqft: parse_non_negative(self.get(DraftField::SizeSqft)),
            base_price_usd: parse_non_negative(self.get(DraftField::BasePriceUsd)),
        })
    }
}

fn parse_non_negative(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
