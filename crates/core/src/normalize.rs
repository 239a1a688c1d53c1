//! Query canonicalization for stable cache keys.
//!
//! Normalization steps:
//! 1. Collapse any run of whitespace to a single space
//! 2. Trim leading/trailing whitespace
//! 3. Lowercase
//!
//! Restaurants follow the same steps, and an empty result becomes `None`
//! so "no restaurant" and "blank restaurant" share one cache key.

/// Canonical form of a food description.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Canonical form of an optional restaurant name.
pub fn normalize_restaurant(text: Option<&str>) -> Option<String> {
    text.map(normalize_query).filter(|s| !s.is_empty())
}

/// A normalized (query, restaurant) pair, derived per resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NutritionQuery {
    pub normalized_text: String,
    pub normalized_restaurant: Option<String>,
}

impl NutritionQuery {
    pub fn new(text: &str, restaurant: Option<&str>) -> Self {
        Self { normalized_text: normalize_query(text), normalized_restaurant: normalize_restaurant(restaurant) }
    }

    /// True when the food description normalized to nothing.
    pub fn is_empty(&self) -> bool {
        self.normalized_text.is_empty()
    }

    pub fn restaurant(&self) -> Option<&str> {
        self.normalized_restaurant.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_query("Chicken   Caesar Salad"), "chicken caesar salad");
        assert_eq!(normalize_query("  Big\tMac\n"), "big mac");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = ["", "   ", "Chicken   Caesar Salad", "\tPAD\u{00A0}thai  ", "ÉCLAIR au Chocolat", "a  b   c"];
        for input in inputs {
            let once = normalize_query(input);
            assert_eq!(normalize_query(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query(" \t\n "), "");
    }

    #[test]
    fn test_normalize_restaurant() {
        assert_eq!(normalize_restaurant(Some(" Gusto ")), Some("gusto".to_string()));
        assert_eq!(normalize_restaurant(Some("   ")), None);
        assert_eq!(normalize_restaurant(Some("")), None);
        assert_eq!(normalize_restaurant(None), None);
    }

    #[test]
    fn test_query_equivalence() {
        let a = NutritionQuery::new("Chicken   Caesar Salad", Some(" Gusto "));
        let b = NutritionQuery::new("chicken caesar salad", Some("gusto"));
        assert_eq!(a, b);
        assert_eq!(a.restaurant(), Some("gusto"));
    }

    #[test]
    fn test_query_is_empty() {
        assert!(NutritionQuery::new("  ", Some("Gusto")).is_empty());
        assert!(!NutritionQuery::new("fries", None).is_empty());
    }
}
