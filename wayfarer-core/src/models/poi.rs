//! Points of interest and their filters.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// POI Candidate
// ============================================================================

/// A point-of-interest candidate (typically a restaurant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCandidate {
    /// Display name.
    pub name: String,
    /// Average user rating, when available.
    pub rating: Option<f64>,
    /// Price level in 1..=4, when available.
    pub price_level: Option<u8>,
    /// Cuisine or category label, when available.
    pub cuisine: Option<String>,
    /// Street address, when available.
    pub address: Option<String>,
}

/// Sorts candidates descending by rating; unrated candidates last.
pub fn sort_poi_candidates(candidates: &mut [PoiCandidate]) {
    candidates.sort_by(|a, b| match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// ============================================================================
// POI Filters
// ============================================================================

/// Optional POI filters. All supplied filters must match (conjunctive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiFilters {
    /// Required cuisine/category (case-insensitive substring match).
    pub cuisine: Option<String>,
    /// Minimum acceptable rating.
    pub min_rating: Option<f64>,
    /// Exact price level in 1..=4.
    pub price_level: Option<u8>,
}

impl PoiFilters {
    /// Returns true if the candidate satisfies every supplied filter.
    ///
    /// A candidate missing a field a filter asks about does not match.
    pub fn matches(&self, candidate: &PoiCandidate) -> bool {
        if let Some(ref wanted) = self.cuisine {
            let matched = candidate
                .cuisine
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&wanted.to_lowercase()));
            if !matched {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if !candidate.rating.is_some_and(|r| r >= min) {
                return false;
            }
        }
        if let Some(level) = self.price_level {
            if candidate.price_level != Some(level) {
                return false;
            }
        }
        true
    }

    /// Returns true if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.min_rating.is_none() && self.price_level.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(name: &str, rating: Option<f64>, price: Option<u8>, cuisine: Option<&str>) -> PoiCandidate {
        PoiCandidate {
            name: name.to_string(),
            rating,
            price_level: price,
            cuisine: cuisine.map(String::from),
            address: None,
        }
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filters = PoiFilters {
            cuisine: Some("italian".to_string()),
            min_rating: Some(4.0),
            price_level: Some(2),
        };

        let all_match = poi("Trattoria", Some(4.5), Some(2), Some("Italian"));
        assert!(filters.matches(&all_match));

        // Each failing dimension rejects the candidate.
        assert!(!filters.matches(&poi("Sushi Bar", Some(4.5), Some(2), Some("Japanese"))));
        assert!(!filters.matches(&poi("Trattoria", Some(3.2), Some(2), Some("Italian"))));
        assert!(!filters.matches(&poi("Trattoria", Some(4.5), Some(4), Some("Italian"))));
    }

    #[test]
    fn test_missing_fields_do_not_match_active_filters() {
        let filters = PoiFilters {
            min_rating: Some(4.0),
            ..Default::default()
        };
        assert!(!filters.matches(&poi("Unrated", None, None, None)));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = PoiFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&poi("Anything", None, None, None)));
    }

    #[test]
    fn test_sort_by_rating_descending_unrated_last() {
        let mut pois = vec![
            poi("b", Some(3.9), None, None),
            poi("unrated", None, None, None),
            poi("a", Some(4.8), None, None),
        ];
        sort_poi_candidates(&mut pois);
        assert_eq!(pois[0].name, "a");
        assert_eq!(pois[1].name, "b");
        assert_eq!(pois[2].name, "unrated");
    }
}
