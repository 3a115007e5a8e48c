use serde::{Deserialize, Serialize};

/// One named share of a trip budget.
///
/// Only the allocator mutates a category, so `amount` always tracks
/// `percentage` for the allocator's total budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetCategory {
    id: String,
    name: String,
    percentage: f64,
    amount: f64,
}

impl BudgetCategory {
    pub(crate) fn from_template(template: &CategoryTemplate, total_budget: f64) -> Self {
        let mut category = Self {
            id: template.id.clone(),
            name: template.name.clone(),
            percentage: template.percentage,
            amount: 0.0,
        };
        category.set_percentage(template.percentage, total_budget);
        category
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub(crate) fn set_percentage(&mut self, percentage: f64, total_budget: f64) {
        self.percentage = percentage;
        self.amount = amount_for(total_budget, percentage);
    }

    pub fn to_line(&self) -> BudgetLine {
        BudgetLine {
            name: self.name.clone(),
            percentage: self.percentage,
            amount: self.amount,
        }
    }
}

pub(crate) fn amount_for(total_budget: f64, percentage: f64) -> f64 {
    total_budget * percentage / 100.0
}

/// Opening share of a category when an allocator is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTemplate {
    pub id: String,
    pub name: String,
    pub percentage: f64,
}

impl CategoryTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, percentage: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            percentage,
        }
    }

    /// Food 20 / Transport 30 / Accommodation 40 / Activities 10.
    pub fn defaults() -> Vec<CategoryTemplate> {
        vec![
            CategoryTemplate::new("cat_food", "Food", 20.0),
            CategoryTemplate::new("cat_transport", "Transport", 30.0),
            CategoryTemplate::new("cat_accommodation", "Accommodation", 40.0),
            CategoryTemplate::new("cat_activities", "Activities", 10.0),
        ]
    }
}

/// Final `{name, percentage, amount}` tuple recorded on a submitted trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub name: String,
    pub percentage: f64,
    pub amount: f64,
}
