use crate::models::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A property listing as stored in the `properties` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique identifier
    pub id: Uuid,

    /// Listing headline
    pub title: String,

    pub property_type: PropertyType,

    pub status: PropertyStatus,

    /// Asking price in USD
    pub price: u64,

    #[serde(default)]
    pub bedrooms: Option<u32>,

    #[serde(default)]
    pub bathrooms: Option<f64>,

    #[serde(default)]
    pub square_feet: Option<u32>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    pub address: Address,

    pub coordinates: Coordinates,

    /// Listing agent (user id)
    #[serde(default)]
    pub agent_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Build a new listing from a creation request and resolved coordinates
    pub fn new(request: NewProperty, coordinates: Coordinates, agent_id: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            title: request.title,
            property_type: request.property_type,
            status: request.status,
            price: request.price,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            square_feet: request.square_feet,
            description: request.description,
            features: request.features,
            images: request.images,
            address: request.address.normalized(),
            coordinates,
            agent_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a raw store document
    pub fn from_document(doc: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(doc)
    }

    /// Encode for the store
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Apply a partial update. Returns true if any field was supplied.
    ///
    /// Geocoding for a changed address is the caller's job; it resolves
    /// coordinates into the patch before applying it.
    pub fn apply(&mut self, patch: &PropertyPatch) -> bool {
        let mut changed = false;

        if let Some(title) = &patch.title {
            self.title = title.clone();
            changed = true;
        }
        if let Some(property_type) = patch.property_type {
            self.property_type = property_type;
            changed = true;
        }
        if let Some(status) = patch.status {
            self.status = status;
            changed = true;
        }
        if let Some(price) = patch.price {
            self.price = price;
            changed = true;
        }
        if let Some(bedrooms) = patch.bedrooms {
            self.bedrooms = Some(bedrooms);
            changed = true;
        }
        if let Some(bathrooms) = patch.bathrooms {
            self.bathrooms = Some(bathrooms);
            changed = true;
        }
        if let Some(square_feet) = patch.square_feet {
            self.square_feet = Some(square_feet);
            changed = true;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
            changed = true;
        }
        if let Some(features) = &patch.features {
            self.features = features.clone();
            changed = true;
        }
        if let Some(images) = &patch.images {
            self.images = images.clone();
            changed = true;
        }
        if let Some(address) = &patch.address {
            self.address = address.clone().normalized();
            changed = true;
        }
        if let Some(coordinates) = patch.coordinates {
            self.coordinates = coordinates;
            changed = true;
        }

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Townhouse,
    Commercial,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Sold,
    Pending,
    OffMarket,
}

/// Postal address of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1))]
    pub street: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub state: String,

    #[validate(length(min = 1))]
    pub zip_code: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub full_address: Option<String>,
}

impl Address {
    /// One-line form used for geocoding
    pub fn full_address(&self) -> String {
        self.full_address.clone().unwrap_or_else(|| {
            format!(
                "{}, {}, {} {}",
                self.street, self.city, self.state, self.zip_code
            )
        })
    }

    /// Fill in `full_address` when it was omitted
    pub fn normalized(mut self) -> Self {
        if self.full_address.as_deref().map_or(true, str::is_empty) {
            self.full_address = Some(format!(
                "{}, {}, {} {}",
                self.street, self.city, self.state, self.zip_code
            ));
        }
        self
    }
}

fn default_country() -> String {
    "United States".to_string()
}

/// Listing creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProperty {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    pub property_type: PropertyType,

    pub status: PropertyStatus,

    #[validate(range(min = 1))]
    pub price: u64,

    #[serde(default)]
    pub bedrooms: Option<u32>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub bathrooms: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 1))]
    pub square_feet: Option<u32>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[validate(nested)]
    pub address: Address,

    /// Skips geocoding when supplied
    #[serde(default)]
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,

    /// Only honoured for admins; agents always list under their own id
    #[serde(default)]
    pub agent_id: Option<String>,
}

/// Partial listing update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyPatch {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    #[validate(range(min = 1))]
    pub price: Option<u64>,
    pub bedrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    pub bathrooms: Option<f64>,
    #[validate(range(min = 1))]
    pub square_feet: Option<u32>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
}
