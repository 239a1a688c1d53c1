//! FoodData Central search response types and macro extraction.

use serde::Deserialize;

/// Raw response from `POST /foods/search`.
#[derive(Debug, Deserialize)]
pub struct UsdaSearchResponse {
    #[serde(default)]
    pub foods: Vec<UsdaFood>,
}

/// One search hit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub brand_owner: Option<String>,
    #[serde(default)]
    pub serving_size: Option<f64>,
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<UsdaNutrient>,
}

/// One nutrient row on a search hit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaNutrient {
    #[serde(default)]
    pub nutrient_name: Option<String>,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Macro targets extracted from nutrient rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Macro {
    Energy,
    Protein,
    Carbohydrate,
    Fat,
}

/// Name fragments per macro, most specific first, with fragments that
/// disqualify a row.
const NUTRIENT_SYNONYMS: &[(Macro, &[&str], &[&str])] = &[
    (Macro::Energy, &["energy"], &[]),
    (Macro::Protein, &["protein"], &[]),
    (Macro::Carbohydrate, &["carbohydrate"], &[]),
    (Macro::Fat, &["total lipid", "fat"], &["fatty acid"]),
];

/// Extracted macros for one food.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct UsdaMacros {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl UsdaNutrient {
    fn matches(&self, fragment: &str, excluded: &[&str]) -> bool {
        let Some(name) = self.nutrient_name.as_deref() else {
            return false;
        };
        let name = name.to_lowercase();
        name.contains(fragment) && !excluded.iter().any(|x| name.contains(x))
    }

    /// Energy rows may be reported in kJ as well; only kcal counts.
    fn is_kilojoules(&self) -> bool {
        self.unit_name.as_deref().is_some_and(|u| u.eq_ignore_ascii_case("kj"))
    }
}

impl UsdaFood {
    fn find(&self, target: Macro) -> Option<f64> {
        let (_, fragments, excluded) = NUTRIENT_SYNONYMS.iter().find(|(m, _, _)| *m == target)?;
        fragments.iter().find_map(|fragment| {
            self.food_nutrients
                .iter()
                .filter(|n| n.matches(fragment, excluded))
                .filter(|n| target != Macro::Energy || !n.is_kilojoules())
                .find_map(|n| n.value)
        })
    }

    /// Macro values by nutrient-name synonym.
    pub fn macros(&self) -> UsdaMacros {
        UsdaMacros {
            calories: self.find(Macro::Energy),
            protein_g: self.find(Macro::Protein),
            carbs_g: self.find(Macro::Carbohydrate),
            fat_g: self.find(Macro::Fat),
        }
    }

    /// Serving weight in grams, when the serving unit is a gram unit.
    pub fn serving_weight_grams(&self) -> Option<f64> {
        let unit = self.serving_size_unit.as_deref()?.trim().to_lowercase();
        let size = self.serving_size.filter(|s| s.is_finite() && *s > 0.0)?;
        matches!(unit.as_str(), "g" | "grm" | "gram" | "grams").then_some(size)
    }
}
