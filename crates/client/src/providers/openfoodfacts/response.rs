//! Open Food Facts search response types.

use crate::providers::http::lenient_number;
use serde::Deserialize;
use std::collections::HashMap;

/// kJ per kcal.
const KJ_PER_KCAL: f64 = 4.184;

/// Raw response from `GET /cgi/search.pl?json=1`.
#[derive(Debug, Deserialize)]
pub struct OffSearchResponse {
    #[serde(default)]
    pub products: Vec<OffProduct>,
}

/// One product hit. Nutriment values arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
pub struct OffProduct {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub nutriments: HashMap<String, serde_json::Value>,
}

impl OffProduct {
    fn nutriment(&self, key: &str) -> Option<f64> {
        self.nutriments.get(key).and_then(lenient_number)
    }

    /// kcal per 100 g, converted from kJ when only that is reported.
    pub fn calories_100g(&self) -> Option<f64> {
        self.nutriment("energy-kcal_100g")
            .or_else(|| self.nutriment("energy-kj_100g").map(|kj| kj / KJ_PER_KCAL))
            .or_else(|| self.nutriment("energy_100g").map(|kj| kj / KJ_PER_KCAL))
    }

    pub fn protein_100g(&self) -> Option<f64> {
        self.nutriment("proteins_100g")
    }

    pub fn carbs_100g(&self) -> Option<f64> {
        self.nutriment("carbohydrates_100g")
    }

    pub fn fat_100g(&self) -> Option<f64> {
        self.nutriment("fat_100g")
    }

    pub fn has_energy(&self) -> bool {
        self.calories_100g().is_some()
    }
}

impl OffSearchResponse {
    /// First product with an energy value, else the first product.
    pub fn pick(self) -> Option<OffProduct> {
        let idx = self.products.iter().position(OffProduct::has_energy).unwrap_or(0);
        self.products.into_iter().nth(idx)
    }
}
