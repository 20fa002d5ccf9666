use crate::core::distance::{distance_km, round_km};
use crate::models::{Located, RouteResult};

/// Nearest-neighbor tour construction over geolocated items
///
/// The route starts at the first input item and repeatedly moves to the
/// closest item not yet visited. Items with an undefined distance (missing
/// coordinates on either end) are never preferred over a defined one; they
/// are appended once nothing else is left, and such legs add nothing to the
/// total.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptimizer;

impl RouteOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Compute a visiting order and its total distance (km, 3 decimals).
    ///
    /// O(n²) in the number of items.
    pub fn optimize<T: Located + Clone>(&self, items: &[T]) -> RouteResult<T> {
        let Some((first, rest)) = items.split_first() else {
            return RouteResult::empty();
        };

        let mut remaining: Vec<&T> = rest.iter().collect();
        let mut route: Vec<T> = Vec::with_capacity(items.len());
        route.push(first.clone());

        let mut total_km = 0.0;
        let mut current = first.coordinates();

        while !remaining.is_empty() {
            let mut best_index = 0;
            let mut best_distance: Option<f64> = None;

            for (index, candidate) in remaining.iter().enumerate() {
                let Some(distance) = distance_km(current, candidate.coordinates()) else {
                    continue;
                };
                // Strict comparison keeps the first-encountered item on ties
                if best_distance.map_or(true, |best| distance < best) {
                    best_distance = Some(distance);
                    best_index = index;
                }
            }

            let next = remaining.remove(best_index);
            if let Some(distance) = best_distance {
                total_km += distance;
            }
            current = next.coordinates();
            route.push(next.clone());
        }

        tracing::trace!("Routed {} items over {:.3} km", route.len(), total_km);

        RouteResult {
            ordered: route,
            total_distance_km: round_km(total_km),
        }
    }
}
