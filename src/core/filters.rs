use std::str::FromStr;

use tracing::debug;

use crate::core::distance::{calculate_bounding_box, distance_km, is_within_bounding_box};
use crate::models::{Attraction, Category, Coordinates, PriceLevel, SearchRequest};

/// Circle around a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub center: Coordinates,
    pub radius_km: f64,
}

/// Conjunctive filter set for catalog search.
///
/// Every field is optional; a record must satisfy all supplied predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_reviews: Option<u32>,
    pub min_photos: Option<u32>,
    pub price_level: Option<PriceLevel>,
    pub profile: Option<String>,
    pub near: Option<GeoRadius>,
}

impl SearchFilters {
    /// Build filters from raw request parameters.
    ///
    /// Blank values count as absent. Unparseable or non-finite numbers and
    /// unknown category or price tokens drop that one filter. A bound that
    /// parses but can never be met (`min_rating=6`, a negative radius) is
    /// kept and matches nothing.
    pub fn from_request(req: &SearchRequest) -> Self {
        let near = match (
            parse_field::<f64>("latitude", &req.latitude),
            parse_field::<f64>("longitude", &req.longitude),
            parse_field::<f64>("radius", &req.radius),
        ) {
            (Some(latitude), Some(longitude), Some(radius_km))
                if latitude.is_finite() && longitude.is_finite() && radius_km.is_finite() =>
            {
                Some(GeoRadius {
                    center: Coordinates::new(latitude, longitude),
                    radius_km,
                })
            }
            _ => None,
        };

        Self {
            query: text(&req.query).map(|q| q.to_lowercase()),
            category: text(&req.category).and_then(|token| {
                let category = Category::from_token(&token);
                if category.is_none() {
                    debug!("Ignoring unknown category filter: {}", token);
                }
                category
            }),
            city: text(&req.city).map(|c| c.to_lowercase()),
            country: text(&req.country).map(|c| c.to_lowercase()),
            min_rating: parse_field::<f64>("min_rating", &req.min_rating).filter(|r| r.is_finite()),
            max_rating: parse_field::<f64>("max_rating", &req.max_rating).filter(|r| r.is_finite()),
            min_reviews: parse_field::<u32>("min_reviews", &req.min_reviews),
            min_photos: parse_field::<u32>("min_photos", &req.min_photos),
            price_level: text(&req.price_level).and_then(|token| parse_price(&token)),
            profile: text(&req.profile),
            near,
        }
    }

    /// Check a record against every supplied predicate.
    ///
    /// Inactive records never match.
    pub fn matches(&self, attraction: &Attraction) -> bool {
        attraction.is_active
            && self.matches_text(attraction)
            && self.matches_facets(attraction)
            && self.matches_quality(attraction)
            && self.matches_location(attraction)
    }

    /// Free text must appear in name, description, city or country
    #[inline]
    fn matches_text(&self, attraction: &Attraction) -> bool {
        let Some(query) = &self.query else {
            return true;
        };

        [
            &attraction.name,
            &attraction.description,
            &attraction.city,
            &attraction.country,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(query.as_str()))
    }

    #[inline]
    fn matches_facets(&self, attraction: &Attraction) -> bool {
        if let Some(category) = self.category {
            if attraction.category != category {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if !attraction.city.to_lowercase().contains(city.as_str()) {
                return false;
            }
        }

        if let Some(country) = &self.country {
            if !attraction.country.to_lowercase().contains(country.as_str()) {
                return false;
            }
        }

        if let Some(price_level) = self.price_level {
            if attraction.price_level != price_level {
                return false;
            }
        }

        if let Some(profile) = &self.profile {
            if !attraction.target_profiles.iter().any(|p| p == profile) {
                return false;
            }
        }

        true
    }

    /// Rating bounds are inclusive; a record without a rating fails any bound
    #[inline]
    fn matches_quality(&self, attraction: &Attraction) -> bool {
        if self.min_rating.is_some() || self.max_rating.is_some() {
            let Some(rating) = attraction.rating else {
                return false;
            };
            if self.min_rating.is_some_and(|min| rating < min) {
                return false;
            }
            if self.max_rating.is_some_and(|max| rating > max) {
                return false;
            }
        }

        if self.min_reviews.is_some_and(|min| attraction.num_reviews < min) {
            return false;
        }

        if self.min_photos.is_some_and(|min| attraction.num_photos < min) {
            return false;
        }

        true
    }

    /// Records without coordinates are excluded while a radius is active
    #[inline]
    fn matches_location(&self, attraction: &Attraction) -> bool {
        let Some(near) = self.near else {
            return true;
        };
        let Some(point) = attraction.coordinates else {
            return false;
        };
        if near.radius_km < 0.0 {
            return false;
        }

        // Stage 1: bounding box pre-filter, skipped where the box wraps
        let bbox = calculate_bounding_box(near.center.latitude, near.center.longitude, near.radius_km);
        if bbox.is_reliable() && !is_within_bounding_box(point.latitude, point.longitude, &bbox) {
            return false;
        }

        // Stage 2: exact great-circle distance
        distance_km(Some(near.center), Some(point)).is_some_and(|d| d <= near.radius_km)
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_field<T: FromStr>(name: &str, value: &Option<String>) -> Option<T> {
    let raw = text(value)?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!("Ignoring malformed {} filter: {:?}", name, raw);
            None
        }
    }
}

fn parse_price(token: &str) -> Option<PriceLevel> {
    match token.to_lowercase().as_str() {
        "none" | "free" => Some(PriceLevel::None),
        _ => match PriceLevel::from_token(token) {
            PriceLevel::None => {
                debug!("Ignoring unknown price level filter: {}", token);
                None
            }
            level => Some(level),
        },
    }
}
