use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// A latitude/longitude pair in degrees.
///
/// Coordinates are either present as a pair or absent altogether, so a
/// record can never carry a partial location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Ratings live on a 0 to 5 scale
pub fn is_valid_rating(rating: f64) -> bool {
    (0.0..=5.0).contains(&rating)
}

/// Out-of-range ratings deserialize as absent
fn rating_in_range<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.filter(|r| is_valid_rating(*r)))
}

/// Out-of-range coordinate pairs deserialize as absent
fn coordinates_in_range<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Coordinates>::deserialize(deserializer)?.filter(Coordinates::is_valid))
}

/// Coarse category used for faceting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Hotel,
    Attraction,
    Other,
}

impl Category {
    /// Parse one of the canonical category tokens (case-insensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "restaurant" => Some(Category::Restaurant),
            "hotel" => Some(Category::Hotel),
            "attraction" => Some(Category::Attraction),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Infer a coarse category from a free-text provider label.
    ///
    /// Substring match, case-insensitive, checked in this order:
    /// restaurant/food, then hotel/lodging, then everything else.
    pub fn infer(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("restaurant") || label.contains("food") {
            Category::Restaurant
        } else if label.contains("hotel") || label.contains("lodging") {
            Category::Hotel
        } else {
            Category::Attraction
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Attraction => "attraction",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal price tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PriceLevel {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl PriceLevel {
    /// Map a provider price token. Unknown or empty tokens are `None`.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "$" => PriceLevel::Budget,
            "$$" => PriceLevel::Moderate,
            "$$$" => PriceLevel::Expensive,
            "$$$$" => PriceLevel::Luxury,
            _ => PriceLevel::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::None => "",
            PriceLevel::Budget => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Expensive => "$$$",
            PriceLevel::Luxury => "$$$$",
        }
    }
}

/// Canonical catalog record.
///
/// Produced by the record normalizer (or inserted directly) and treated as
/// read-only by the query engine, the aggregator and the route optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "coordinates_in_range")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "rating_in_range")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub num_likes: u64,
    #[serde(default)]
    pub num_photos: u32,
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub price_level: PriceLevel,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub target_profiles: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Attraction {
    /// Minimal active record with the given name and category
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            external_id: None,
            name: name.into(),
            description: String::new(),
            address: String::new(),
            category,
            subcategory: String::new(),
            city: String::new(),
            country: String::new(),
            coordinates: None,
            rating: None,
            num_reviews: 0,
            num_likes: 0,
            num_photos: 0,
            ranking: None,
            price_level: PriceLevel::None,
            main_image: String::new(),
            awards: Vec::new(),
            amenities: Vec::new(),
            styles: Vec::new(),
            target_profiles: Vec::new(),
            is_active: true,
        }
    }

    /// Drop a rating or coordinate pair that is out of range
    pub fn sanitized(mut self) -> Self {
        self.rating = self.rating.filter(|r| is_valid_rating(*r));
        self.coordinates = self.coordinates.filter(Coordinates::is_valid);
        self
    }

    /// Identity used for de-duplication inside a compilation and the store.
    ///
    /// Local records without an external identifier are keyed by name and city.
    pub fn key(&self) -> String {
        match &self.external_id {
            Some(id) => id.clone(),
            None => format!("local:{}|{}", self.name, self.city),
        }
    }
}

/// Anything that may sit at a point on the map
pub trait Located {
    fn coordinates(&self) -> Option<Coordinates>;
}

impl Located for Attraction {
    fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

impl Located for Coordinates {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(*self)
    }
}

/// User profile type, drives eligibility tags and compilation size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    #[default]
    Tourist,
    Local,
    Professional,
}

impl ProfileType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "tourist" => Some(ProfileType::Tourist),
            "local" => Some(ProfileType::Local),
            "professional" => Some(ProfileType::Professional),
            _ => None,
        }
    }

    /// Maximum number of active items a compilation may hold
    pub fn compilation_limit(&self) -> usize {
        match self {
            ProfileType::Tourist => 30,
            ProfileType::Local => 50,
            ProfileType::Professional => 100,
        }
    }
}

/// One attraction inside a user's compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationItem {
    pub attraction: Attraction,
    /// 1 is the highest priority
    pub priority: u8,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_visited: bool,
    #[serde(default)]
    pub visited_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CompilationItem {
    pub fn new(attraction: Attraction) -> Self {
        Self {
            attraction,
            priority: 1,
            note: String::new(),
            estimated_cost: None,
            is_active: true,
            is_visited: false,
            visited_at: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.max(1);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = Some(cost);
        self
    }

    pub fn key(&self) -> String {
        self.attraction.key()
    }
}

impl Located for CompilationItem {
    fn coordinates(&self) -> Option<Coordinates> {
        self.attraction.coordinates
    }
}

/// A user-curated set of attractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    pub id: Uuid,
    pub owner: String,
    #[serde(default)]
    pub profile_type: ProfileType,
    #[serde(default)]
    pub items: Vec<CompilationItem>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Compilation {
    pub fn new(owner: impl Into<String>, profile_type: ProfileType) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            profile_type,
            items: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Items that have not been removed
    pub fn active_items(&self) -> impl Iterator<Item = &CompilationItem> {
        self.items.iter().filter(|item| item.is_active)
    }

    /// Attractions of the active items, in compilation order
    pub fn active_attractions(&self) -> Vec<Attraction> {
        self.active_items().map(|item| item.attraction.clone()).collect()
    }

    /// Add an item, enforcing one entry per attraction and the profile's size limit.
    ///
    /// An attraction that was previously removed is reactivated in place with
    /// the new item's metadata.
    pub fn add_item(&mut self, item: CompilationItem) -> Result<(), CompilationError> {
        let key = item.key();
        let limit = self.profile_type.compilation_limit();

        if self.active_items().count() >= limit {
            return Err(CompilationError::LimitReached(limit));
        }

        match self.items.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) if existing.is_active => Err(CompilationError::DuplicateAttraction(key)),
            Some(existing) => {
                *existing = item;
                existing.is_active = true;
                Ok(())
            }
            None => {
                self.items.push(item);
                Ok(())
            }
        }
    }

    /// Soft-delete the item for an attraction key
    pub fn remove_item(&mut self, key: &str) -> Result<(), CompilationError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.is_active && item.key() == key)
            .ok_or_else(|| CompilationError::ItemNotFound(key.to_string()))?;
        item.is_active = false;
        Ok(())
    }

    /// Mark an active item as visited. Visiting is terminal.
    pub fn mark_visited(
        &mut self,
        key: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), CompilationError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.is_active && item.key() == key)
            .ok_or_else(|| CompilationError::ItemNotFound(key.to_string()))?;

        if item.is_visited {
            return Err(CompilationError::AlreadyVisited(key.to_string()));
        }

        item.is_visited = true;
        item.visited_at = Some(at);
        Ok(())
    }

    /// Reorder items to follow `keys`. Items not named keep their relative
    /// order after the named ones; unknown keys are ignored.
    pub fn apply_order(&mut self, keys: &[String]) {
        let mut remaining = std::mem::take(&mut self.items);
        let mut ordered = Vec::with_capacity(remaining.len());

        for key in keys {
            if let Some(pos) = remaining.iter().position(|item| &item.key() == key) {
                ordered.push(remaining.remove(pos));
            }
        }

        ordered.extend(remaining);
        self.items = ordered;
    }
}

/// Errors raised by compilation lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompilationError {
    #[error("Attraction already in compilation: {0}")]
    DuplicateAttraction(String),

    #[error("Compilation limit of {0} attractions reached")]
    LimitReached(usize),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item already visited: {0}")]
    AlreadyVisited(String),
}

/// Budget range category with a configured ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetRange {
    Low,
    Medium,
    High,
}

impl BudgetRange {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "low" => Some(BudgetRange::Low),
            "medium" => Some(BudgetRange::Medium),
            "high" => Some(BudgetRange::High),
            _ => None,
        }
    }
}

/// A user's budget ceiling, explicit or derived from a range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetProfile {
    Amount(f64),
    Range(BudgetRange),
}

/// Where an estimate sits relative to a budget ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    UnderBudget,
    OnBudget,
    OverBudget,
}

/// Visiting order computed by the route optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult<T> {
    pub ordered: Vec<T>,
    #[serde(rename = "totalDistanceKm")]
    pub total_distance_km: f64,
}

impl<T> RouteResult<T> {
    pub fn empty() -> Self {
        Self {
            ordered: Vec::new(),
            total_distance_km: 0.0,
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rating_deserializes_as_absent() {
        let attraction: Attraction = serde_json::from_value(serde_json::json!({
            "name": "Louvre",
            "category": "attraction",
            "rating": 7.0,
            "coordinates": { "latitude": 123.0, "longitude": 2.33 }
        }))
        .unwrap();
        assert_eq!(attraction.rating, None);
        assert_eq!(attraction.coordinates, None);

        let attraction: Attraction = serde_json::from_value(serde_json::json!({
            "name": "Louvre",
            "category": "attraction",
            "rating": 5.0,
            "coordinates": { "latitude": 48.86, "longitude": 2.33 }
        }))
        .unwrap();
        assert_eq!(attraction.rating, Some(5.0));
        assert_eq!(attraction.coordinates, Some(Coordinates::new(48.86, 2.33)));
    }

    #[test]
    fn test_sanitized_drops_out_of_range_values() {
        let mut attraction = Attraction::new("Louvre", Category::Attraction);
        attraction.rating = Some(-0.5);
        attraction.coordinates = Some(Coordinates::new(48.86, 200.0));

        let attraction = attraction.sanitized();
        assert_eq!(attraction.rating, None);
        assert_eq!(attraction.coordinates, None);
    }

    #[test]
    fn test_category_inference_precedence() {
        assert_eq!(Category::infer("Fine Dining Restaurant"), Category::Restaurant);
        assert_eq!(Category::infer("Street FOOD"), Category::Restaurant);
        assert_eq!(Category::infer("Boutique Hotel"), Category::Hotel);
        assert_eq!(Category::infer("lodging"), Category::Hotel);
        assert_eq!(Category::infer("Hotel restaurant"), Category::Restaurant);
        assert_eq!(Category::infer("Museum"), Category::Attraction);
        assert_eq!(Category::infer(""), Category::Attraction);
    }

    #[test]
    fn test_price_level_tokens() {
        assert_eq!(PriceLevel::from_token("$$"), PriceLevel::Moderate);
        assert_eq!(PriceLevel::from_token("$$$$"), PriceLevel::Luxury);
        assert_eq!(PriceLevel::from_token("$$$$$"), PriceLevel::None);
        assert_eq!(PriceLevel::from_token("cheap"), PriceLevel::None);
        assert_eq!(PriceLevel::Expensive.as_str(), "$$$");
    }

    #[test]
    fn test_price_level_serde() {
        let json = serde_json::to_string(&PriceLevel::Moderate).unwrap();
        assert_eq!(json, "\"$$\"");
        let none: PriceLevel = serde_json::from_str("\"\"").unwrap();
        assert_eq!(none, PriceLevel::None);
    }

    #[test]
    fn test_attraction_key() {
        let mut attraction = Attraction::new("Louvre", Category::Attraction);
        attraction.city = "Paris".to_string();
        assert_eq!(attraction.key(), "local:Louvre|Paris");

        attraction.external_id = Some("188757".to_string());
        assert_eq!(attraction.key(), "188757");
    }

    fn located(id: &str) -> Attraction {
        let mut attraction = Attraction::new(format!("Place {}", id), Category::Attraction);
        attraction.external_id = Some(id.to_string());
        attraction
    }

    #[test]
    fn test_add_item_rejects_duplicates() {
        let mut compilation = Compilation::new("marie", ProfileType::Tourist);
        compilation.add_item(CompilationItem::new(located("1"))).unwrap();

        let err = compilation.add_item(CompilationItem::new(located("1"))).unwrap_err();
        assert_eq!(err, CompilationError::DuplicateAttraction("1".to_string()));
        assert_eq!(compilation.items.len(), 1);
    }

    #[test]
    fn test_removed_item_is_reactivated() {
        let mut compilation = Compilation::new("marie", ProfileType::Tourist);
        compilation.add_item(CompilationItem::new(located("1"))).unwrap();
        compilation.remove_item("1").unwrap();
        assert_eq!(compilation.active_items().count(), 0);

        compilation
            .add_item(CompilationItem::new(located("1")).with_note("again"))
            .unwrap();
        assert_eq!(compilation.items.len(), 1);
        assert!(compilation.items[0].is_active);
        assert_eq!(compilation.items[0].note, "again");
    }

    #[test]
    fn test_limit_reached() {
        let mut compilation = Compilation::new("sophie", ProfileType::Tourist);
        for i in 0..30 {
            compilation.add_item(CompilationItem::new(located(&i.to_string()))).unwrap();
        }
        let err = compilation.add_item(CompilationItem::new(located("31"))).unwrap_err();
        assert_eq!(err, CompilationError::LimitReached(30));
    }

    #[test]
    fn test_visited_is_terminal() {
        let mut compilation = Compilation::new("jean", ProfileType::Professional);
        compilation.add_item(CompilationItem::new(located("1"))).unwrap();

        let now = chrono::Utc::now();
        compilation.mark_visited("1", now).unwrap();
        assert!(compilation.items[0].is_visited);
        assert_eq!(compilation.items[0].visited_at, Some(now));

        let err = compilation.mark_visited("1", now).unwrap_err();
        assert_eq!(err, CompilationError::AlreadyVisited("1".to_string()));
    }

    #[test]
    fn test_apply_order() {
        let mut compilation = Compilation::new("jean", ProfileType::Professional);
        for id in ["a", "b", "c", "d"] {
            compilation.add_item(CompilationItem::new(located(id))).unwrap();
        }

        compilation.apply_order(&["c".to_string(), "a".to_string(), "zz".to_string()]);

        let keys: Vec<String> = compilation.items.iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_compilation_limits() {
        assert_eq!(ProfileType::Tourist.compilation_limit(), 30);
        assert_eq!(ProfileType::Local.compilation_limit(), 50);
        assert_eq!(ProfileType::Professional.compilation_limit(), 100);
    }
}
