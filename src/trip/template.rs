use std::str::FromStr;

use crate::errors::PlannerError;

/// Pre-filled trip outlines the draft workflow can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripTemplate {
    BeachWeekend,
    MountainAdventure,
}

impl TripTemplate {
    pub const ALL: [TripTemplate; 2] = [TripTemplate::BeachWeekend, TripTemplate::MountainAdventure];

    pub fn slug(&self) -> &'static str {
        match self {
            TripTemplate::BeachWeekend => "beach-weekend",
            TripTemplate::MountainAdventure => "mountain-adventure",
        }
    }

    /// Short alias accepted alongside the slug.
    fn alias(&self) -> &'static str {
        match self {
            TripTemplate::BeachWeekend => "beach",
            TripTemplate::MountainAdventure => "mountain",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TripTemplate::BeachWeekend => "Beach weekend",
            TripTemplate::MountainAdventure => "Mountain adventure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TripTemplate::BeachWeekend => "A relaxing three-day getaway to the coast",
            TripTemplate::MountainAdventure => "Hiking and outdoor activities",
        }
    }

    pub fn budget(&self) -> f64 {
        match self {
            TripTemplate::BeachWeekend => 500.0,
            TripTemplate::MountainAdventure => 700.0,
        }
    }

    /// Description of each day; the length is the trip's duration.
    pub fn day_descriptions(&self) -> &'static [&'static str] {
        match self {
            TripTemplate::BeachWeekend => &["Arrival day", "Beach day", "Departure day"],
            TripTemplate::MountainAdventure => &[
                "Arrival and acclimatization",
                "Trail day",
                "Outdoor activities",
                "Departure day",
            ],
        }
    }

    /// Slugs of every template, comma separated.
    pub fn slugs() -> String {
        Self::ALL
            .iter()
            .map(TripTemplate::slug)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TripTemplate {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|template| template.slug() == needle || template.alias() == needle)
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!(
                    "unknown trip template `{}` (expected one of {})",
                    value,
                    Self::slugs()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_and_aliases_parse() {
        assert_eq!(
            "Mountain".parse::<TripTemplate>().unwrap(),
            TripTemplate::MountainAdventure
        );
        assert_eq!(
            "beach-weekend".parse::<TripTemplate>().unwrap(),
            TripTemplate::BeachWeekend
        );
        let err = "desert".parse::<TripTemplate>().unwrap_err();
        assert!(err.to_string().contains("mountain-adventure"));
    }

    #[test]
    fn mountain_template_spans_four_days() {
        let template = TripTemplate::MountainAdventure;
        assert_eq!(template.day_descriptions().len(), 4);
        assert_eq!(template.budget(), 700.0);
    }
}
