//! Canonical nutrition record shared by every provider and the cache.

use serde::{Deserialize, Serialize};

/// Quantity the macro values are reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum Basis {
    /// One serving as defined by the source.
    #[serde(rename = "serving")]
    Serving,
    /// Per 100 grams.
    #[serde(rename = "100g")]
    Per100g,
}

impl Basis {
    /// Stable string form used in storage and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Serving => "serving",
            Basis::Per100g => "100g",
        }
    }

    /// Parse the stored string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "serving" => Some(Basis::Serving),
            "100g" => Some(Basis::Per100g),
            _ => None,
        }
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Macro-nutrient facts for one resolved food.
///
/// Absent macros mean "unknown", never zero. `source` always names the
/// provider that produced the values, even when the record was served
/// from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NutritionResult {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub source: String,
    /// Fixed per-provider trust in the data source, in [0, 1].
    pub confidence: f64,
    pub basis: Basis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_weight_grams: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_name: Option<String>,
    /// Provider payload kept for audit; never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl NutritionResult {
    /// Create a result with no macros set.
    ///
    /// `confidence` is clamped into [0, 1].
    pub fn new(source: impl Into<String>, confidence: f64, basis: Basis) -> Self {
        Self {
            calories: None,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            source: source.into(),
            confidence: confidence.clamp(0.0, 1.0),
            basis,
            serving_weight_grams: None,
            resolved_name: None,
            raw: None,
        }
    }

    pub fn with_macros(
        mut self, calories: Option<f64>, protein_g: Option<f64>, carbs_g: Option<f64>, fat_g: Option<f64>,
    ) -> Self {
        self.calories = calories;
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fat_g = fat_g;
        self
    }

    pub fn with_serving_weight(mut self, grams: Option<f64>) -> Self {
        self.serving_weight_grams = grams;
        self
    }

    pub fn with_resolved_name(mut self, name: Option<String>) -> Self {
        self.resolved_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// True when at least one of the four macros is known.
    ///
    /// Results failing this check are "no result" and must not be
    /// returned by a provider or written to the cache.
    pub fn has_macros(&self) -> bool {
        self.calories.is_some() || self.protein_g.is_some() || self.carbs_g.is_some() || self.fat_g.is_some()
    }

    /// `Some(self)` when the record carries macros, `None` otherwise.
    pub fn into_usable(self) -> Option<Self> {
        if self.has_macros() { Some(self) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_serde_names() {
        assert_eq!(serde_json::to_string(&Basis::Serving).unwrap(), r#""serving""#);
        assert_eq!(serde_json::to_string(&Basis::Per100g).unwrap(), r#""100g""#);
        let parsed: Basis = serde_json::from_str(r#""100g""#).unwrap();
        assert_eq!(parsed, Basis::Per100g);
    }

    #[test]
    fn test_basis_parse() {
        assert_eq!(Basis::parse("serving"), Some(Basis::Serving));
        assert_eq!(Basis::parse("100g"), Some(Basis::Per100g));
        assert_eq!(Basis::parse("cup"), None);
        assert_eq!(Basis::parse(Basis::Per100g.as_str()), Some(Basis::Per100g));
    }

    #[test]
    fn test_has_macros() {
        let empty = NutritionResult::new("usda_db", 0.7, Basis::Serving);
        assert!(!empty.has_macros());
        assert!(empty.clone().into_usable().is_none());

        let fat_only = empty.with_macros(None, None, None, Some(0.0));
        assert!(fat_only.has_macros());
        assert!(fat_only.into_usable().is_some());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(NutritionResult::new("x", 1.4, Basis::Serving).confidence, 1.0);
        assert_eq!(NutritionResult::new("x", -0.2, Basis::Serving).confidence, 0.0);
        assert_eq!(NutritionResult::new("x", 0.45, Basis::Per100g).confidence, 0.45);
    }

    #[test]
    fn test_blank_resolved_name_dropped() {
        let r = NutritionResult::new("x", 0.5, Basis::Serving).with_resolved_name(Some("  ".into()));
        assert!(r.resolved_name.is_none());
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let r = NutritionResult::new("openfoodfacts", 0.45, Basis::Per100g).with_macros(Some(250.0), None, None, None);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("raw").is_none());
        assert!(json.get("resolved_name").is_none());
        assert_eq!(json["basis"], "100g");
        assert!(json["protein_g"].is_null());
    }
}
