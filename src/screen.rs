use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

use crate::{
    animation::Transition,
    chart::WeeklyChart,
    events::SharedSink,
    models::NutritionSnapshot,
    navigation::{Navigator, Screen},
    scan::{ScanController, ScanPhase},
    settings::UserSettings,
};

const RESULTS_FADE_MS: u64 = 500;

/// Entrance of the whole results container: a fade plus a spring from zero scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerEntrance {
    pub opacity: Transition,
    pub scale: Transition,
}

impl Default for ContainerEntrance {
    fn default() -> Self {
        Self {
            opacity: Transition::timing(Duration::from_millis(RESULTS_FADE_MS)),
            scale: Transition::spring(),
        }
    }
}

/// What the results route renders right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "view")]
pub enum ResultsView {
    #[serde(rename_all = "camelCase")]
    Scanning { progress: u8, label: String },
    #[serde(rename_all = "camelCase")]
    Results {
        phase: ScanPhase,
        nutrition: NutritionSnapshot,
        chart: WeeklyChart,
        entrance: ContainerEntrance,
    },
}

/// The mounted nutrition-results route. Owns one scan session for its
/// lifetime; dropping the screen tears the session's ticker down.
pub struct ResultsScreen {
    controller: ScanController,
    nutrition: NutritionSnapshot,
    chart: WeeklyChart,
}

impl ResultsScreen {
    pub async fn mount(settings: &UserSettings, sink: SharedSink) -> Result<Self> {
        let controller = ScanController::new(settings, sink)?;
        controller.start().await?;

        Ok(Self {
            controller,
            nutrition: NutritionSnapshot::sample(),
            chart: WeeklyChart::generate(),
        })
    }

    pub fn controller(&self) -> &ScanController {
        &self.controller
    }

    pub fn nutrition(&self) -> &NutritionSnapshot {
        &self.nutrition
    }

    pub fn chart(&self) -> &WeeklyChart {
        &self.chart
    }

    pub async fn view(&self) -> ResultsView {
        let snapshot = self.controller.get_snapshot().await;
        match snapshot.session.phase {
            ScanPhase::Scanning => ResultsView::Scanning {
                progress: snapshot.session.progress,
                label: snapshot.session.progress_label(),
            },
            phase => ResultsView::Results {
                phase,
                nutrition: self.nutrition.clone(),
                chart: self.chart.clone(),
                entrance: ContainerEntrance::default(),
            },
        }
    }

    /// Header back button: leave for the home tab and end the session.
    pub fn back(self, navigator: &dyn Navigator) {
        if let Some(target) = Screen::NutritionResults.back_target() {
            navigator.navigate(target);
        }
    }

    pub fn unmount(self) {}
}

impl Drop for ResultsScreen {
    fn drop(&mut self) {
        self.controller.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ScanEvent;
    use std::sync::Arc;
    use tokio::{sync::mpsc, time};

    #[tokio::test(start_paused = true)]
    async fn test_shows_progress_then_results() {
        let (tx, _rx) = mpsc::unbounded_channel::<ScanEvent>();
        let screen = ResultsScreen::mount(&UserSettings::default(), Arc::new(tx))
            .await
            .unwrap();

        time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(
            screen.view().await,
            ResultsView::Scanning {
                progress: 40,
                label: "40%".into()
            }
        );

        time::sleep(Duration::from_millis(2000)).await;
        match screen.view().await {
            ResultsView::Results {
                phase, nutrition, ..
            } => {
                assert_eq!(phase, ScanPhase::Revealing);
                assert_eq!(nutrition.calories, 320);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_before_completion_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ScanEvent>();
        let screen = ResultsScreen::mount(&UserSettings::default(), Arc::new(tx))
            .await
            .unwrap();
        let controller = screen.controller().clone();

        time::sleep(Duration::from_millis(600)).await;
        screen.unmount();
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(controller.get_snapshot().await.session.progress, 20);
        let mut progress_events = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, ScanEvent::ScanProgress { progress: 20, .. }));
            progress_events += 1;
        }
        assert_eq!(progress_events, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_navigates_home() {
        let (tx, _rx) = mpsc::unbounded_channel::<ScanEvent>();
        let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
        let screen = ResultsScreen::mount(&UserSettings::default(), Arc::new(tx))
            .await
            .unwrap();
        let controller = screen.controller().clone();

        screen.back(&nav_tx);

        assert_eq!(nav_rx.try_recv().unwrap(), Screen::Streaks);
        assert!(!controller.is_ticking());
    }
}
