//! Proportional budget reallocation across a fixed set of categories.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{PlannerError, Result};

use super::category::{BudgetCategory, BudgetLine, CategoryTemplate};

/// Sum of all category shares.
pub const FULL_SHARE: f64 = 100.0;

/// Allowed drift, in percentage points, before normalization kicks in.
pub const SUM_TOLERANCE: f64 = 0.1;

/// Transitions accepted by [`BudgetAllocator::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocatorAction {
    SetPercentage { index: usize, percentage: f64 },
    Reinitialize { total_budget: f64 },
}

/// Budget categories whose percentages always sum to 100.
///
/// Every transition returns a new allocator and leaves `self` untouched, so a
/// failed call never disturbs the caller's current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAllocator {
    total_budget: f64,
    categories: Vec<BudgetCategory>,
    #[serde(skip)]
    templates: Vec<CategoryTemplate>,
}

impl BudgetAllocator {
    /// Builds the default opening allocation for `total_budget`.
    pub fn initialize(total_budget: f64) -> Result<Self> {
        Self::with_templates(total_budget, &CategoryTemplate::defaults())
    }

    /// Builds an allocator from a caller-supplied opening allocation.
    ///
    /// Negative or non-finite budgets are rejected rather than clamped.
    pub fn with_templates(total_budget: f64, templates: &[CategoryTemplate]) -> Result<Self> {
        validate_total_budget(total_budget)?;
        validate_templates(templates)?;
        let categories = templates
            .iter()
            .map(|template| BudgetCategory::from_template(template, total_budget))
            .collect();
        debug!(total_budget, categories = templates.len(), "allocator initialized");
        Ok(Self {
            total_budget,
            categories,
            templates: templates.to_vec(),
        })
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn categories(&self) -> &[BudgetCategory] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&BudgetCategory> {
        self.categories.get(index)
    }

    pub fn total_percentage(&self) -> f64 {
        self.categories.iter().map(BudgetCategory::percentage).sum()
    }

    pub fn budget_lines(&self) -> Vec<BudgetLine> {
        self.categories.iter().map(BudgetCategory::to_line).collect()
    }

    /// Applies a single transition and returns the resulting state.
    pub fn apply(&self, action: AllocatorAction) -> Result<Self> {
        match action {
            AllocatorAction::SetPercentage { index, percentage } => {
                self.set_percentage(index, percentage)
            }
            AllocatorAction::Reinitialize { total_budget } => {
                Self::with_templates(total_budget, &self.templates)
            }
        }
    }

    /// Sets one category's share and spreads the difference over the others
    /// in proportion to their current shares.
    ///
    /// Requested values outside `[0, 100]` are clamped. The returned state
    /// always sums to 100 within [`SUM_TOLERANCE`].
    pub fn set_percentage(&self, index: usize, percentage: f64) -> Result<Self> {
        let len = self.categories.len();
        let target = self
            .categories
            .get(index)
            .ok_or(PlannerError::InvalidIndex { index, len })?;
        if percentage.is_nan() {
            return Err(PlannerError::InvalidInput(
                "percentage must be a number".into(),
            ));
        }

        let new_percentage = percentage.clamp(0.0, FULL_SHARE);
        let delta = new_percentage - target.percentage();
        if delta == 0.0 {
            return Ok(self.clone());
        }

        let others_total: f64 = self
            .categories
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, category)| category.percentage())
            .sum();

        let total_budget = self.total_budget;
        let mut next = self.clone();
        next.categories[index].set_percentage(new_percentage, total_budget);

        if others_total > 0.0 {
            for (position, category) in next.categories.iter_mut().enumerate() {
                if position == index {
                    continue;
                }
                let ratio = category.percentage() / others_total;
                let shifted = (category.percentage() - delta * ratio).clamp(0.0, FULL_SHARE);
                category.set_percentage(shifted, total_budget);
            }
        } else {
            debug!(index, "other categories hold no share; skipping redistribution");
        }

        next.normalize(index);
        debug!(
            index,
            from = target.percentage(),
            to = new_percentage,
            "budget share updated"
        );
        Ok(next)
    }

    fn normalize(&mut self, edited: usize) {
        let sum = self.total_percentage();
        if (sum - FULL_SHARE).abs() <= SUM_TOLERANCE {
            return;
        }

        let Some(target) = correction_index(self.categories.len(), edited) else {
            self.absorb_residual(edited, FULL_SHARE - sum);
            return;
        };

        let others: f64 = self
            .categories
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != target)
            .map(|(_, category)| category.percentage())
            .sum();
        let corrected = FULL_SHARE - others;
        let clamped = corrected.clamp(0.0, FULL_SHARE);
        let total_budget = self.total_budget;
        let category = &mut self.categories[target];
        info!(
            category = category.name(),
            from = category.percentage(),
            to = clamped,
            "normalized budget shares"
        );
        category.set_percentage(clamped, total_budget);

        let residual = corrected - clamped;
        if residual != 0.0 {
            self.absorb_residual(edited, residual);
        }
    }

    /// Pushes `residual` percentage points onto the categories from last to
    /// first, leaving the edited category for the very end.
    fn absorb_residual(&mut self, edited: usize, residual: f64) {
        let total_budget = self.total_budget;
        let order = (0..self.categories.len())
            .rev()
            .filter(|position| *position != edited)
            .chain(std::iter::once(edited));

        let mut remaining = residual;
        for position in order {
            if remaining.abs() <= f64::EPSILON {
                break;
            }
            let category = &mut self.categories[position];
            let current = category.percentage();
            let adjusted = (current + remaining).clamp(0.0, FULL_SHARE);
            remaining -= adjusted - current;
            category.set_percentage(adjusted, total_budget);
        }

        if remaining.abs() > SUM_TOLERANCE {
            warn!(remaining, "budget shares could not absorb the full residual");
        }
    }
}

/// The last category absorbs drift unless it is the one being edited.
fn correction_index(len: usize, edited: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    if last == edited {
        edited.checked_sub(1)
    } else {
        Some(last)
    }
}

fn validate_total_budget(total_budget: f64) -> Result<()> {
    if !total_budget.is_finite() {
        return Err(PlannerError::InvalidInput(
            "total budget must be a finite number".into(),
        ));
    }
    if total_budget < 0.0 {
        return Err(PlannerError::InvalidInput(format!(
            "total budget cannot be negative (got {})",
            total_budget
        )));
    }
    Ok(())
}

pub(crate) fn validate_templates(templates: &[CategoryTemplate]) -> Result<()> {
    if templates.is_empty() {
        return Err(PlannerError::InvalidInput(
            "at least one budget category is required".into(),
        ));
    }

    let mut seen = HashSet::new();
    for template in templates {
        if template.id.trim().is_empty() || template.name.trim().is_empty() {
            return Err(PlannerError::InvalidInput(
                "budget categories need an id and a name".into(),
            ));
        }
        if !seen.insert(template.id.as_str()) {
            return Err(PlannerError::InvalidInput(format!(
                "duplicate budget category id `{}`",
                template.id
            )));
        }
        if !(0.0..=FULL_SHARE).contains(&template.percentage) {
            return Err(PlannerError::InvalidInput(format!(
                "category `{}` has share {} outside 0-100",
                template.name, template.percentage
            )));
        }
    }

    let sum: f64 = templates.iter().map(|template| template.percentage).sum();
    if (sum - FULL_SHARE).abs() > SUM_TOLERANCE {
        return Err(PlannerError::InvalidInput(format!(
            "opening shares must sum to 100 (got {})",
            sum
        )));
    }
    Ok(())
}
