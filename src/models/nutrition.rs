use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroBreakdown {
    /// Grams.
    pub proteins: u32,
    pub carbs: u32,
    pub fats: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroBreakdown {
    /// Percent of daily value.
    pub iron: u32,
    pub calcium: u32,
    pub total: u32,
}

/// What a scan resolved the photographed item to.
///
/// Stands in for the output of a recognition service; the app only ever
/// shows [`NutritionSnapshot::sample`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSnapshot {
    pub name: String,
    pub category: String,
    pub calories: u32,
    pub macros: MacroBreakdown,
    pub micros: MicroBreakdown,
}

impl NutritionSnapshot {
    pub fn sample() -> Self {
        Self {
            name: "Pepperoni Pizza".into(),
            category: "FOOD".into(),
            calories: 320,
            macros: MacroBreakdown {
                proteins: 13,
                carbs: 35,
                fats: 12,
                total: 60,
            },
            micros: MicroBreakdown {
                iron: 10,
                calcium: 20,
                total: 30,
            },
        }
    }

    pub fn calories_label(&self) -> String {
        format!("{} kcal", self.calories)
    }
}
