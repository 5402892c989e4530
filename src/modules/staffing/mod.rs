//! Staffing: contextual headcount prediction and roster assignment.
//!
//! Headcount is an additive model over two independent context axes (weather
//! and event) on a base of two staff, floored at one. The assignment policy
//! turns a predicted shortfall into a shift proposal via a pluggable
//! selection strategy.

mod roster;

pub use roster::{
    propose_assignment, FirstAvailable, RosterError, RosterPlan, ScheduleError,
    SelectionStrategy, ShiftAssignment, ShiftPlanner, ShiftScheduler, StaffDirectory,
    StaffDirectoryError, StaffMember,
};

use serde::{Deserialize, Serialize};

use crate::scoring::{AdditiveModel, ScoreAdjustment};

/// Base of two staff per slot, never predicting below one.
pub const STAFFING_MODEL: AdditiveModel = AdditiveModel::new(2, 1);

/// Weather context for a roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherTag {
    Sunny,
    Rainy,
    Cloudy,
    ColdWave,
    Heatwave,
}

impl ScoreAdjustment for WeatherTag {
    fn adjustment(&self) -> i32 {
        match self {
            WeatherTag::Sunny | WeatherTag::Heatwave => 1,
            WeatherTag::Rainy | WeatherTag::ColdWave => -1,
            WeatherTag::Cloudy => 0,
        }
    }
}

/// Event context for a roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    None,
    Weekend,
    Holiday,
    Festival,
    /// Carries no documented adjustment upstream; kept neutral rather than
    /// inventing a weight.
    SportsMatch,
}

impl ScoreAdjustment for EventTag {
    fn adjustment(&self) -> i32 {
        match self {
            EventTag::Weekend | EventTag::Holiday => 2,
            EventTag::Festival => 3,
            EventTag::None | EventTag::SportsMatch => 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {axis} tag '{value}'")]
pub struct UnknownTagError {
    axis: &'static str,
    value: String,
}

impl std::str::FromStr for WeatherTag {
    type Err = UnknownTagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(WeatherTag::Sunny),
            "rainy" => Ok(WeatherTag::Rainy),
            "cloudy" => Ok(WeatherTag::Cloudy),
            "cold-wave" | "cold_wave" | "cold wave" => Ok(WeatherTag::ColdWave),
            "heatwave" => Ok(WeatherTag::Heatwave),
            other => Err(UnknownTagError {
                axis: "weather",
                value: other.to_string(),
            }),
        }
    }
}

impl std::str::FromStr for EventTag {
    type Err = UnknownTagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(EventTag::None),
            "weekend" => Ok(EventTag::Weekend),
            "holiday" => Ok(EventTag::Holiday),
            "festival" => Ok(EventTag::Festival),
            "sports-match" | "sports_match" | "sports match" => Ok(EventTag::SportsMatch),
            other => Err(UnknownTagError {
                axis: "event",
                value: other.to_string(),
            }),
        }
    }
}

/// Predict the headcount for a slot: `max(1, 2 + weather + event)`.
pub fn predict_headcount(weather: WeatherTag, event: EventTag) -> u32 {
    let tags: [&dyn ScoreAdjustment; 2] = [&weather, &event];
    STAFFING_MODEL.score(tags) as u32
}
