use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const WEEKDAY_LABELS: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];
pub const MILESTONE_DAYS: [u32; 4] = [7, 10, 20, 30];

const CALENDAR_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Medal {
    Silver,
    Bronze,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_number: u32,
    pub is_today: bool,
    pub is_past: bool,
    pub in_streak: bool,
}

/// Two rows of seven days ending today, with streak days flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakCalendar {
    pub streak_days: u32,
    pub days: Vec<CalendarDay>,
}

impl StreakCalendar {
    pub fn new(today: NaiveDate, streak_days: u32) -> Self {
        let streak_start = today - Duration::days(i64::from(streak_days));
        let days = (0..CALENDAR_DAYS)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let is_past = date < today;
                CalendarDay {
                    date,
                    day_number: date.day(),
                    is_today: date == today,
                    is_past,
                    in_streak: is_past && date > streak_start,
                }
            })
            .collect();

        Self { streak_days, days }
    }

    pub fn weeks(&self) -> (&[CalendarDay], &[CalendarDay]) {
        self.days.split_at(self.days.len() / 2)
    }

    pub fn streak_count(&self) -> usize {
        self.days.iter().filter(|day| day.in_streak).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub days: u32,
    pub achieved: bool,
    pub medal: Medal,
}

impl Milestone {
    pub fn title(&self) -> String {
        format!("{}-day streak achiever", self.days)
    }
}

pub fn milestones(streak_days: u32) -> Vec<Milestone> {
    let medals = [Medal::Silver, Medal::Bronze, Medal::Gold, Medal::Platinum];
    MILESTONE_DAYS
        .into_iter()
        .zip(medals)
        .map(|(days, medal)| Milestone {
            days,
            achieved: streak_days >= days,
            medal,
        })
        .collect()
}

pub fn next_milestone(streak_days: u32) -> Option<Milestone> {
    milestones(streak_days)
        .into_iter()
        .find(|milestone| !milestone.achieved)
}
