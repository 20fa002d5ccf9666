use std::cmp::Ordering;

use crate::core::filters::SearchFilters;
use crate::models::{Attraction, CountryFacet, Suggestion, SuggestionKind};

/// Sortable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    ReviewCount,
    Name,
    Likes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single-key ordering, e.g. `-num_likes` or `rating`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub const DEFAULT: SortOrder = SortOrder {
        key: SortKey::Likes,
        direction: SortDirection::Descending,
    };

    /// Parse an ordering token. A leading `-` means descending.
    ///
    /// Unknown tokens fall back to [`SortOrder::DEFAULT`] (popularity, descending).
    pub fn parse(token: Option<&str>) -> Self {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::DEFAULT;
        };

        let (direction, field) = match token.strip_prefix('-') {
            Some(field) => (SortDirection::Descending, field),
            None => (SortDirection::Ascending, token),
        };

        let key = match field.to_lowercase().as_str() {
            "rating" => SortKey::Rating,
            "num_reviews" | "reviews" | "review_count" => SortKey::ReviewCount,
            "name" => SortKey::Name,
            "num_likes" | "likes" | "popularity" => SortKey::Likes,
            _ => {
                tracing::debug!("Unknown ordering {:?}, using default", token);
                return Self::DEFAULT;
            }
        };

        Self { key, direction }
    }

    /// Compare two records ascending by this key; a missing value is the lowest
    fn compare(&self, a: &Attraction, b: &Attraction) -> Ordering {
        match self.key {
            SortKey::Rating => match (a.rating, b.rating) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            },
            SortKey::ReviewCount => a.num_reviews.cmp(&b.num_reviews),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Likes => a.num_likes.cmp(&b.num_likes),
        }
    }

    /// Stable sort in place; ties keep their original relative order
    pub fn sort(&self, records: &mut [Attraction]) {
        match self.direction {
            SortDirection::Ascending => records.sort_by(|a, b| self.compare(a, b)),
            SortDirection::Descending => records.sort_by(|a, b| self.compare(b, a)),
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One page of search results plus the pre-pagination match count
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub results: Vec<Attraction>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl SearchPage {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}

/// Filters, orders and paginates canonical attraction records
///
/// # Pipeline Stages
/// 1. Predicate filtering (inactive records always dropped)
/// 2. Stable single-key ordering
/// 3. 1-indexed pagination with a bounded page size
#[derive(Debug, Clone)]
pub struct CatalogQueryEngine {
    default_page_size: usize,
    max_page_size: usize,
}

impl CatalogQueryEngine {
    pub fn new(default_page_size: usize, max_page_size: usize) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Resolve a requested page size, falling back to the default and capping at the maximum
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(size) => size.min(self.max_page_size),
        }
    }

    /// Every matching record in order, without pagination
    pub fn filter_sorted(
        &self,
        records: &[Attraction],
        filters: &SearchFilters,
        order: SortOrder,
    ) -> Vec<Attraction> {
        let mut matches: Vec<Attraction> = records
            .iter()
            .filter(|attraction| filters.matches(attraction))
            .cloned()
            .collect();

        order.sort(&mut matches);
        matches
    }

    /// Search the catalog.
    ///
    /// `page` is 1-indexed (0 is treated as 1). `page_size` is bounded by
    /// the engine's maximum. Pages past the end are empty.
    pub fn search(
        &self,
        records: &[Attraction],
        filters: &SearchFilters,
        order: SortOrder,
        page: usize,
        page_size: Option<usize>,
    ) -> SearchPage {
        let matches = self.filter_sorted(records, filters, order);
        let total_count = matches.len();

        let page = page.max(1);
        let page_size = self.page_size(page_size);
        let start = (page - 1).saturating_mul(page_size);

        let results = matches.into_iter().skip(start).take(page_size).collect();

        tracing::debug!(
            "Search matched {} of {} records, returning page {} (size {})",
            total_count,
            records.len(),
            page,
            page_size
        );

        SearchPage {
            results,
            total_count,
            page,
            page_size,
        }
    }

    /// Most liked active records, optionally restricted to a country
    /// (case-insensitive exact match) and a target profile
    pub fn popular(
        &self,
        records: &[Attraction],
        country: Option<&str>,
        profile: Option<&str>,
        limit: usize,
    ) -> Vec<Attraction> {
        let country = country.map(str::trim).filter(|c| !c.is_empty()).map(str::to_lowercase);
        let profile = profile.map(str::trim).filter(|p| !p.is_empty());

        let mut results: Vec<Attraction> = records
            .iter()
            .filter(|a| a.is_active)
            .filter(|a| country.as_ref().map_or(true, |c| &a.country.to_lowercase() == c))
            .filter(|a| profile.map_or(true, |p| a.target_profiles.iter().any(|t| t == p)))
            .cloned()
            .collect();

        SortOrder::DEFAULT.sort(&mut results);
        results.truncate(limit.min(self.max_page_size));
        results
    }

    /// Search-as-you-type: matching city names first, then attraction names
    pub fn suggestions(&self, records: &[Attraction], q: &str) -> Vec<Suggestion> {
        const MAX_CITIES: usize = 5;
        const MAX_NAMES: usize = 10;
        const MAX_TOTAL: usize = 15;

        let q = q.trim().to_lowercase();
        if q.chars().count() < 2 {
            return Vec::new();
        }

        let mut cities: Vec<String> = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for attraction in records.iter().filter(|a| a.is_active) {
            if attraction.city.to_lowercase().contains(&q) && !cities.contains(&attraction.city) {
                cities.push(attraction.city.clone());
            }
            if attraction.name.to_lowercase().contains(&q) && !names.contains(&attraction.name) {
                names.push(attraction.name.clone());
            }
        }

        cities
            .into_iter()
            .take(MAX_CITIES)
            .map(|name| Suggestion {
                kind: SuggestionKind::City,
                name,
            })
            .chain(names.into_iter().take(MAX_NAMES).map(|name| Suggestion {
                kind: SuggestionKind::Attraction,
                name,
            }))
            .take(MAX_TOTAL)
            .collect()
    }

    /// Record counts and cities per country, largest first
    pub fn country_facets(&self, records: &[Attraction]) -> Vec<CountryFacet> {
        const MAX_CITIES: usize = 5;

        let mut facets: Vec<(CountryFacet, Vec<String>)> = Vec::new();

        for attraction in records.iter().filter(|a| a.is_active && !a.country.is_empty()) {
            let idx = match facets.iter().position(|(f, _)| f.country == attraction.country) {
                Some(idx) => idx,
                None => {
                    facets.push((
                        CountryFacet {
                            country: attraction.country.clone(),
                            count: 0,
                            cities_count: 0,
                            cities: Vec::new(),
                        },
                        Vec::new(),
                    ));
                    facets.len() - 1
                }
            };

            let (facet, cities) = &mut facets[idx];
            facet.count += 1;
            if !attraction.city.is_empty() && !cities.contains(&attraction.city) {
                cities.push(attraction.city.clone());
            }
        }

        let mut facets: Vec<CountryFacet> = facets
            .into_iter()
            .map(|(mut facet, cities)| {
                facet.cities_count = cities.len();
                facet.cities = cities.into_iter().take(MAX_CITIES).collect();
                facet
            })
            .collect();

        facets.sort_by(|a, b| b.count.cmp(&a.count));
        facets
    }

    /// Look up an active record by its external identifier
    pub fn find_by_external_id<'a>(
        &self,
        records: &'a [Attraction],
        external_id: &str,
    ) -> Option<&'a Attraction> {
        records
            .iter()
            .find(|a| a.is_active && a.external_id.as_deref() == Some(external_id))
    }
}

impl Default for CatalogQueryEngine {
    fn default() -> Self {
        Self::new(20, 100)
    }
}
