//! Conversion of heterogeneous provider records into canonical [`Attraction`]s.
//!
//! Provider payloads arrive as loosely typed JSON. Every field is read
//! defensively: a bad number becomes "absent" (or zero for counts), a
//! non-list becomes an empty list, and only a missing name rejects the record.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::{is_valid_rating, Attraction, Category, Coordinates, PriceLevel};

/// Image size variants, most preferred first
const IMAGE_PRIORITY: [&str; 4] = ["large", "original", "medium", "small"];

/// Reasons a single record cannot be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Record is not an object")]
    NotAnObject,

    #[error("Record has no name")]
    MissingName,
}

/// Raw record tagged with the shape it was received in
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// TripAdvisor content API location (nested `address_obj`, `photo.images`, `category.name`)
    TripAdvisor(Value),
    /// Flat catalog shape used by local records and the canonical serialization
    Catalog(Value),
}

impl RawRecord {
    fn value(&self) -> &Value {
        match self {
            RawRecord::TripAdvisor(value) | RawRecord::Catalog(value) => value,
        }
    }
}

/// Outcome of a batch normalization
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub attractions: Vec<Attraction>,
    pub rejected: usize,
}

/// Maps raw provider records onto the canonical attraction shape
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    provider_profiles: Vec<String>,
}

impl RecordNormalizer {
    pub fn new(provider_profiles: Vec<String>) -> Self {
        Self { provider_profiles }
    }

    /// Normalize one record
    pub fn normalize(&self, record: &RawRecord) -> Result<Attraction, NormalizeError> {
        let obj = record.value().as_object().ok_or(NormalizeError::NotAnObject)?;

        match record {
            RawRecord::TripAdvisor(_) => self.from_tripadvisor(obj),
            RawRecord::Catalog(_) => self.from_catalog(obj),
        }
    }

    /// Normalize a batch. Rejected records are logged and counted; they never
    /// prevent the rest of the batch from being normalized.
    pub fn normalize_batch<I>(&self, records: I) -> NormalizedBatch
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut batch = NormalizedBatch::default();

        for record in records {
            match self.normalize(&record) {
                Ok(attraction) => batch.attractions.push(attraction),
                Err(e) => {
                    warn!("Skipping unnormalizable record: {}", e);
                    batch.rejected += 1;
                }
            }
        }

        batch
    }

    fn from_tripadvisor(&self, obj: &Map<String, Value>) -> Result<Attraction, NormalizeError> {
        let name = required_name(obj)?;

        let address = obj.get("address_obj").and_then(Value::as_object);
        let address_field = |key: &str| {
            address
                .and_then(|a| a.get(key))
                .and_then(coerce_string)
                .unwrap_or_default()
        };

        let category_label = obj
            .get("category")
            .and_then(|c| match c {
                Value::Object(map) => map.get("name").and_then(coerce_string),
                other => coerce_string(other),
            })
            .unwrap_or_default();

        let subcategory = match obj.get("subcategory") {
            Some(Value::Array(items)) => items.iter().find_map(label_of).unwrap_or_default(),
            Some(other) => coerce_string(other).unwrap_or_default(),
            None => String::new(),
        };

        let num_reviews = obj.get("num_reviews").map(coerce_count).unwrap_or(0);

        let ranking = obj
            .get("ranking_data")
            .and_then(|r| r.get("ranking"))
            .or_else(|| obj.get("ranking_position"))
            .and_then(coerce_u64)
            .map(clamp_u32);

        let main_image = obj
            .get("photo")
            .and_then(|p| p.get("images"))
            .map(pick_image)
            .unwrap_or_default();

        Ok(Attraction {
            external_id: obj.get("location_id").and_then(coerce_string),
            name,
            description: string_field(obj, "description"),
            address: address_field("address_string"),
            category: Category::infer(&category_label),
            subcategory,
            city: address_field("city"),
            country: address_field("country"),
            coordinates: coordinates_of(obj),
            rating: obj.get("rating").and_then(coerce_rating),
            num_reviews,
            // The provider has no likes counter, reviews stand in for popularity
            num_likes: u64::from(num_reviews),
            num_photos: obj.get("photo_count").map(coerce_count).unwrap_or(0),
            ranking,
            price_level: obj
                .get("price_level")
                .and_then(coerce_string)
                .map(|t| PriceLevel::from_token(&t))
                .unwrap_or_default(),
            main_image,
            awards: string_list(obj.get("awards")),
            amenities: string_list(obj.get("amenities")),
            styles: string_list(obj.get("styles")),
            target_profiles: self.provider_profiles.clone(),
            is_active: true,
        })
    }

    fn from_catalog(&self, obj: &Map<String, Value>) -> Result<Attraction, NormalizeError> {
        let name = required_name(obj)?;

        let category = match obj.get("category") {
            Some(Value::Object(map)) => map
                .get("name")
                .and_then(coerce_string)
                .map(|label| Category::infer(&label))
                .unwrap_or(Category::Attraction),
            Some(value) => coerce_string(value)
                .map(|label| Category::from_token(&label).unwrap_or_else(|| Category::infer(&label)))
                .unwrap_or(Category::Attraction),
            None => Category::Attraction,
        };

        let main_image = match obj.get("main_image") {
            Some(Value::String(url)) => url.clone(),
            Some(images @ Value::Object(_)) => pick_image(images),
            _ => obj.get("images").map(pick_image).unwrap_or_default(),
        };

        let subcategory = ["subcategory", "cuisine_type", "hotel_style", "attraction_groups"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(coerce_string))
            .unwrap_or_default();

        Ok(Attraction {
            external_id: first_string(obj, &["external_id", "tripadvisor_id"]),
            name,
            description: string_field(obj, "description"),
            address: string_field(obj, "address"),
            category,
            subcategory,
            city: string_field(obj, "city"),
            country: string_field(obj, "country"),
            coordinates: coordinates_of(obj),
            rating: obj.get("rating").and_then(coerce_rating),
            num_reviews: obj.get("num_reviews").map(coerce_count).unwrap_or(0),
            num_likes: obj.get("num_likes").and_then(coerce_u64).unwrap_or(0),
            num_photos: obj.get("num_photos").map(coerce_count).unwrap_or(0),
            ranking: obj.get("ranking").and_then(coerce_u64).map(clamp_u32),
            price_level: obj
                .get("price_level")
                .and_then(coerce_string)
                .map(|t| PriceLevel::from_token(&t))
                .unwrap_or_default(),
            main_image,
            awards: string_list(obj.get("awards")),
            amenities: string_list(obj.get("amenities")),
            styles: string_list(obj.get("styles")),
            target_profiles: string_list(obj.get("target_profiles")),
            is_active: obj.get("is_active").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(vec!["tourist".to_string()])
    }
}

fn required_name(obj: &Map<String, Value>) -> Result<String, NormalizeError> {
    obj.get("name")
        .and_then(coerce_string)
        .filter(|name| !name.trim().is_empty())
        .ok_or(NormalizeError::MissingName)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(coerce_string).unwrap_or_default()
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(coerce_string))
        .filter(|s| !s.is_empty())
}

/// Strings pass through, numbers are rendered, anything else is absent
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite float from a number or a numeric string
fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Non-negative count; anything unparseable counts as zero
fn coerce_count(value: &Value) -> u32 {
    coerce_u64(value).map(clamp_u32).unwrap_or(0)
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Ratings outside 0.0..=5.0 are dropped, not clamped
fn coerce_rating(value: &Value) -> Option<f64> {
    coerce_f64(value).filter(|r| is_valid_rating(*r))
}

/// First parseable pair; a pair outside ±90/±180 is absent
fn coordinates_of(obj: &Map<String, Value>) -> Option<Coordinates> {
    let pair = |lat: Option<&Value>, lon: Option<&Value>| {
        let latitude = lat.and_then(coerce_f64)?;
        let longitude = lon.and_then(coerce_f64)?;
        Some(Coordinates::new(latitude, longitude)).filter(Coordinates::is_valid)
    };

    pair(obj.get("latitude"), obj.get("longitude"))
        .or_else(|| pair(obj.get("geo_lat"), obj.get("geo_lng")))
        .or_else(|| {
            obj.get("coordinates")
                .and_then(Value::as_object)
                .and_then(|c| pair(c.get("latitude"), c.get("longitude")))
        })
        .or_else(|| match obj.get("location") {
            Some(Value::Array(items)) if items.len() == 2 => pair(items.first(), items.get(1)),
            _ => None,
        })
}

/// Pick the preferred image variant: large, original, medium, small
fn pick_image(images: &Value) -> String {
    IMAGE_PRIORITY
        .iter()
        .find_map(|size| {
            images.get(*size).and_then(|variant| match variant {
                Value::String(url) => Some(url.clone()),
                other => other.get("url").and_then(coerce_string),
            })
            .filter(|url| !url.is_empty())
        })
        .unwrap_or_default()
}

/// Display label of a list element: plain strings, or objects carrying a name
fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["display_name", "name", "localized_name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(label_of).collect(),
        _ => Vec::new(),
    }
}
