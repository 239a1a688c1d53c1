//! Nutritionix natural-language response types.

use serde::Deserialize;

/// Raw response from `POST /v2/natural/nutrients`.
#[derive(Debug, Deserialize)]
pub struct NutritionixResponse {
    #[serde(default)]
    pub foods: Vec<NutritionixFood>,
}

/// One parsed food item.
#[derive(Debug, Deserialize)]
pub struct NutritionixFood {
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub nf_calories: Option<f64>,
    #[serde(default)]
    pub nf_protein: Option<f64>,
    #[serde(default)]
    pub nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    pub nf_total_fat: Option<f64>,
}
