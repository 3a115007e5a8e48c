use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{PlannerError, Result};

/// Kind of spending an itinerary activity represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Food,
    Transport,
    Accommodation,
    Sightseeing,
    Entertainment,
    #[default]
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 6] = [
        ActivityCategory::Food,
        ActivityCategory::Transport,
        ActivityCategory::Accommodation,
        ActivityCategory::Sightseeing,
        ActivityCategory::Entertainment,
        ActivityCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Food => "food",
            ActivityCategory::Transport => "transport",
            ActivityCategory::Accommodation => "accommodation",
            ActivityCategory::Sightseeing => "sightseeing",
            ActivityCategory::Entertainment => "entertainment",
            ActivityCategory::Other => "other",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!("unknown activity category `{}`", value))
            })
    }
}

/// Something planned on a trip day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub category: ActivityCategory,
}

/// Unvalidated activity input collected from the user.
#[derive(Debug, Clone, Default)]
pub struct ActivityDraft {
    pub name: String,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub cost: Option<f64>,
    pub category: Option<ActivityCategory>,
}

impl ActivityDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_category(mut self, category: ActivityCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Name is required; cost defaults to zero and may not be negative.
    pub fn build(self) -> Result<Activity> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PlannerError::Validation("activity name is required".into()));
        }
        let cost = self.cost.unwrap_or(0.0);
        if !cost.is_finite() || cost < 0.0 {
            return Err(PlannerError::Validation(format!(
                "activity cost must be zero or more (got {})",
                cost
            )));
        }
        Ok(Activity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            time: self.time,
            location: self
                .location
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty()),
            cost,
            category: self.category.unwrap_or_default(),
        })
    }
}

/// One calendar day of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDay {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl TripDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: None,
            activities: Vec::new(),
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.activities.iter().map(|activity| activity.cost).sum()
    }
}

/// One empty day per calendar date from `start` to `end`, both inclusive.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<TripDay> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(TripDay::new)
        .collect()
}
