//! Trip-creation workflow: the draft that owns the budget allocator and the
//! itinerary until it is submitted as an immutable [`TripPlan`].

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{PlannerError, Result};
use crate::planner::{
    AllocatorAction, BudgetAllocator, BudgetLine, CategoryTemplate, FULL_SHARE, SUM_TOLERANCE,
};

use super::itinerary::{days_between, Activity, ActivityDraft, TripDay};
use super::template::TripTemplate;

/// Longest itinerary a single trip may span, in days.
pub const MAX_TRIP_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripStatus::Planned => "planned",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// A trip being edited. Nothing here is persisted until [`TripDraft::submit`].
#[derive(Debug, Clone)]
pub struct TripDraft {
    name: String,
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    allocator: BudgetAllocator,
    days: Vec<TripDay>,
}

impl TripDraft {
    pub fn new(total_budget: f64, templates: &[CategoryTemplate]) -> Result<Self> {
        Ok(Self {
            name: String::new(),
            description: None,
            start_date: None,
            end_date: None,
            allocator: BudgetAllocator::with_templates(total_budget, templates)?,
            days: Vec::new(),
        })
    }

    /// Starts a draft pre-filled from `template`, beginning on `start`.
    pub fn from_template(
        template: TripTemplate,
        start: NaiveDate,
        templates: &[CategoryTemplate],
    ) -> Result<Self> {
        let mut draft = Self::new(template.budget(), templates)?;
        draft.set_name(template.name());
        draft.set_description(template.description());

        let descriptions = template.day_descriptions();
        let span = descriptions.len().saturating_sub(1) as i64;
        draft.set_dates(start, start + Duration::days(span))?;
        for (day, description) in draft.days.iter_mut().zip(descriptions) {
            day.description = Some((*description).to_string());
        }
        debug!(template = template.slug(), "draft created from template");
        Ok(draft)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn budget(&self) -> f64 {
        self.allocator.total_budget()
    }

    pub fn allocator(&self) -> &BudgetAllocator {
        &self.allocator
    }

    pub fn days(&self) -> &[TripDay] {
        &self.days
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into().trim().to_string();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
    }

    /// Establishes a new total budget, resetting the category split to its
    /// opening allocation.
    pub fn set_budget(&mut self, total_budget: f64) -> Result<()> {
        self.allocator = self
            .allocator
            .apply(AllocatorAction::Reinitialize { total_budget })?;
        Ok(())
    }

    pub fn set_budget_share(&mut self, index: usize, percentage: f64) -> Result<&BudgetAllocator> {
        self.allocator = self.allocator.set_percentage(index, percentage)?;
        Ok(&self.allocator)
    }

    /// Sets the travel dates and rebuilds the itinerary, keeping the days
    /// (and their activities) that still fall inside the new range.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if end < start {
            return Err(PlannerError::Validation(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        let span = (end - start).num_days() + 1;
        if span > MAX_TRIP_DAYS {
            return Err(PlannerError::Validation(format!(
                "trips are limited to {} days (got {})",
                MAX_TRIP_DAYS, span
            )));
        }

        let mut previous = std::mem::take(&mut self.days);
        self.days = days_between(start, end)
            .into_iter()
            .map(|fresh| {
                previous
                    .iter()
                    .position(|day| day.date == fresh.date)
                    .map(|position| previous.swap_remove(position))
                    .unwrap_or(fresh)
            })
            .collect();
        self.start_date = Some(start);
        self.end_date = Some(end);
        Ok(())
    }

    pub fn add_activity(&mut self, day_index: usize, draft: ActivityDraft) -> Result<Uuid> {
        let day = self.day_mut(day_index)?;
        let activity = draft.build()?;
        let id = activity.id;
        day.activities.push(activity);
        Ok(id)
    }

    pub fn remove_activity(&mut self, day_index: usize, activity_id: Uuid) -> Result<Activity> {
        let day = self.day_mut(day_index)?;
        let position = day
            .activities
            .iter()
            .position(|activity| activity.id == activity_id)
            .ok_or_else(|| PlannerError::NotFound(format!("activity {}", activity_id)))?;
        Ok(day.activities.remove(position))
    }

    pub fn total_activity_cost(&self) -> f64 {
        self.days.iter().map(TripDay::total_cost).sum()
    }

    /// Validates the required fields and freezes the draft into a plan.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<TripPlan> {
        if self.name.is_empty() {
            return Err(PlannerError::Validation("trip name is required".into()));
        }
        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(PlannerError::Validation(
                "trip start and end dates are required".into(),
            ));
        };

        let plan = TripPlan {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            start_date,
            end_date,
            budget: self.allocator.total_budget(),
            status: TripStatus::Planned,
            created_at: now,
            budget_breakdown: self.allocator.budget_lines(),
            days: self.days.clone(),
        };
        info!(trip = %plan.id, name = %plan.name, days = plan.days.len(), "trip submitted");
        Ok(plan)
    }

    fn day_mut(&mut self, day_index: usize) -> Result<&mut TripDay> {
        let len = self.days.len();
        self.days.get_mut(day_index).ok_or_else(|| {
            PlannerError::NotFound(format!("day {} (trip has {} days)", day_index + 1, len))
        })
    }
}

/// A submitted trip, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default)]
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub budget_breakdown: Vec<BudgetLine>,
    #[serde(default)]
    pub days: Vec<TripDay>,
}

impl TripPlan {
    pub fn status_on(&self, date: NaiveDate) -> TripStatus {
        if date < self.start_date {
            TripStatus::Planned
        } else if date > self.end_date {
            TripStatus::Completed
        } else {
            TripStatus::Active
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn total_activity_cost(&self) -> f64 {
        self.days.iter().map(TripDay::total_cost).sum()
    }

    /// Checks a plan read from outside the workflow: ordered dates, a bounded
    /// itinerary, and a budget split that still sums to 100.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(PlannerError::Validation(format!(
                "trip `{}` ends before it starts",
                self.name
            )));
        }
        if self.duration_days() > MAX_TRIP_DAYS || self.days.len() as i64 > MAX_TRIP_DAYS {
            return Err(PlannerError::Validation(format!(
                "trip `{}` exceeds {} days",
                self.name, MAX_TRIP_DAYS
            )));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(PlannerError::Validation(format!(
                "trip `{}` has an invalid budget {}",
                self.name, self.budget
            )));
        }
        if let Some(line) = self
            .budget_breakdown
            .iter()
            .find(|line| !(0.0..=FULL_SHARE).contains(&line.percentage))
        {
            return Err(PlannerError::Validation(format!(
                "budget line `{}` has share {} outside 0-100",
                line.name, line.percentage
            )));
        }
        let sum: f64 = self.budget_breakdown.iter().map(|line| line.percentage).sum();
        if (sum - FULL_SHARE).abs() > SUM_TOLERANCE {
            return Err(PlannerError::Validation(format!(
                "budget shares of `{}` sum to {} instead of 100",
                self.name, sum
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::ActivityCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> TripDraft {
        TripDraft::new(1000.0, &CategoryTemplate::defaults()).unwrap()
    }

    #[test]
    fn submit_requires_name_and_dates() {
        let mut draft = draft();
        let err = draft.submit(Utc::now()).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));

        draft.set_name("Lisbon");
        assert!(draft.submit(Utc::now()).is_err());

        draft.set_dates(date(2025, 5, 1), date(2025, 5, 3)).unwrap();
        let plan = draft.submit(Utc::now()).unwrap();
        assert_eq!(plan.name, "Lisbon");
        assert_eq!(plan.days.len(), 3);
        assert_eq!(plan.status, TripStatus::Planned);
        assert_eq!(plan.budget_breakdown.len(), 4);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut draft = draft();
        assert!(draft.set_dates(date(2025, 5, 3), date(2025, 5, 1)).is_err());
        assert!(draft.days().is_empty());
    }

    #[test]
    fn changing_dates_keeps_overlapping_days() {
        let mut draft = draft();
        draft.set_dates(date(2025, 5, 1), date(2025, 5, 3)).unwrap();
        draft
            .add_activity(2, ActivityDraft::new("Dinner").with_cost(40.0))
            .unwrap();

        draft.set_dates(date(2025, 5, 3), date(2025, 5, 6)).unwrap();
        assert_eq!(draft.days().len(), 4);
        assert_eq!(draft.days()[0].activities.len(), 1);
        assert_eq!(draft.total_activity_cost(), 40.0);
    }

    #[test]
    fn budget_share_failure_keeps_previous_split() {
        let mut draft = draft();
        draft.set_budget_share(0, 40.0).unwrap();
        let before = draft.allocator().clone();
        assert!(draft.set_budget_share(7, 10.0).is_err());
        assert_eq!(draft.allocator(), &before);
    }

    #[test]
    fn new_budget_resets_the_split() {
        let mut draft = draft();
        draft.set_budget_share(0, 40.0).unwrap();
        draft.set_budget(2000.0).unwrap();
        assert_eq!(draft.budget(), 2000.0);
        assert_eq!(draft.allocator().categories()[0].percentage(), 20.0);
        assert_eq!(draft.allocator().categories()[0].amount(), 400.0);
        assert!(draft.set_budget(-1.0).is_err());
        assert_eq!(draft.budget(), 2000.0);
    }

    #[test]
    fn activities_can_be_removed() {
        let mut draft = draft();
        draft.set_dates(date(2025, 5, 1), date(2025, 5, 1)).unwrap();
        let id = draft
            .add_activity(
                0,
                ActivityDraft::new("Ferry").with_category(ActivityCategory::Transport),
            )
            .unwrap();
        let removed = draft.remove_activity(0, id).unwrap();
        assert_eq!(removed.name, "Ferry");
        assert!(matches!(
            draft.remove_activity(0, id),
            Err(PlannerError::NotFound(_))
        ));
        assert!(draft.add_activity(5, ActivityDraft::new("Nope")).is_err());
    }

    #[test]
    fn beach_template_prefills_three_days() {
        let draft = TripDraft::from_template(
            TripTemplate::BeachWeekend,
            date(2025, 7, 4),
            &CategoryTemplate::defaults(),
        )
        .unwrap();
        assert_eq!(draft.budget(), 500.0);
        assert_eq!(draft.days().len(), 3);
        assert_eq!(draft.end_date(), Some(date(2025, 7, 6)));
        assert_eq!(draft.days()[1].description.as_deref(), Some("Beach day"));
    }

    #[test]
    fn every_template_fills_its_days() {
        for template in TripTemplate::ALL {
            let draft =
                TripDraft::from_template(template, date(2025, 7, 4), &CategoryTemplate::defaults())
                    .unwrap();
            assert_eq!(draft.days().len(), template.day_descriptions().len());
            assert_eq!(draft.budget(), template.budget());
            assert!(draft.days().iter().all(|day| day.description.is_some()));
        }
        let mountain = TripDraft::from_template(
            TripTemplate::MountainAdventure,
            date(2025, 7, 4),
            &CategoryTemplate::defaults(),
        )
        .unwrap();
        assert_eq!(mountain.end_date(), Some(date(2025, 7, 7)));
    }

    #[test]
    fn overly_long_trips_are_rejected() {
        let mut draft = draft();
        draft.set_dates(date(2025, 1, 1), date(2025, 12, 31)).unwrap();
        assert_eq!(draft.days().len(), 365);

        let err = draft
            .set_dates(date(1, 1, 1), date(9999, 12, 31))
            .unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
        assert_eq!(draft.days().len(), 365);
        assert!(draft.set_dates(date(2025, 1, 1), date(2026, 1, 2)).is_err());
    }

    #[test]
    fn validate_rejects_tampered_plans() {
        let mut draft = draft();
        draft.set_name("Quito");
        draft.set_dates(date(2025, 9, 1), date(2025, 9, 2)).unwrap();
        let plan = draft.submit(Utc::now()).unwrap();
        assert!(plan.validate().is_ok());

        let mut skewed = plan.clone();
        skewed.budget_breakdown[0].percentage = 60.0;
        assert!(matches!(skewed.validate(), Err(PlannerError::Validation(_))));

        let mut negative = plan.clone();
        negative.budget_breakdown[0].percentage = -20.0;
        negative.budget_breakdown[1].percentage = 70.0;
        assert!(negative.validate().is_err());

        let mut backwards = plan;
        backwards.end_date = date(2025, 8, 1);
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn plan_status_follows_the_calendar() {
        let mut draft = draft();
        draft.set_name("Rome");
        draft.set_dates(date(2025, 9, 10), date(2025, 9, 12)).unwrap();
        let plan = draft.submit(Utc::now()).unwrap();
        assert_eq!(plan.status_on(date(2025, 9, 1)), TripStatus::Planned);
        assert_eq!(plan.status_on(date(2025, 9, 12)), TripStatus::Active);
        assert_eq!(plan.status_on(date(2025, 9, 13)), TripStatus::Completed);
        assert_eq!(plan.duration_days(), 3);
    }
}
