use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Streaks,
    Scan,
    About,
    NutritionResults,
}

impl Screen {
    /// Tab bar entries, left to right.
    pub const TABS: [Screen; 3] = [Screen::Streaks, Screen::Scan, Screen::About];

    pub fn route(&self) -> &'static str {
        match self {
            Screen::Streaks => "/",
            Screen::Scan => "/scan",
            Screen::About => "/about",
            Screen::NutritionResults => "/nutrition-results",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Streaks => "Streaks",
            Screen::Scan => "Scan",
            Screen::About => "About",
            Screen::NutritionResults => "Nutrition Results",
        }
    }

    pub fn is_tab(&self) -> bool {
        Self::TABS.contains(self)
    }

    /// Where the header back button leads. Tabs have none.
    pub fn back_target(&self) -> Option<Screen> {
        match self {
            Screen::NutritionResults => Some(Screen::Streaks),
            _ => None,
        }
    }

    pub fn from_route(route: &str) -> Option<Screen> {
        [
            Screen::Streaks,
            Screen::Scan,
            Screen::About,
            Screen::NutritionResults,
        ]
        .into_iter()
        .find(|screen| screen.route() == route)
    }
}

/// The host's router. Receives a single navigate signal per transition.
pub trait Navigator: Send + Sync {
    fn navigate(&self, screen: Screen);
}

impl Navigator for UnboundedSender<Screen> {
    fn navigate(&self, screen: Screen) {
        let _ = self.send(screen);
    }
}
