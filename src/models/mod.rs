mod nutrition;

pub use nutrition::{MacroBreakdown, MicroBreakdown, NutritionSnapshot};
