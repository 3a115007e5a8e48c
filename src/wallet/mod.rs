//! Prepaid gift cards that can be earmarked for a trip.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{PlannerError, Result};
use crate::trip::{TripPlan, TripStatus};

/// Gift cards stay valid for this long after purchase.
pub const GIFT_CARD_VALIDITY_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftCard {
    pub id: Uuid,
    pub provider: String,
    pub amount: f64,
    pub purchase_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<Uuid>,
}

impl GiftCard {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| today > expiry)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(default)]
    pub cards: Vec<GiftCard>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a purchased card; provider is required and the amount must be positive.
    pub fn purchase(
        &mut self,
        provider: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Result<&GiftCard> {
        let provider = provider.trim();
        if provider.is_empty() {
            return Err(PlannerError::Validation("gift card provider is required".into()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PlannerError::Validation(format!(
                "gift card amount must be positive (got {})",
                amount
            )));
        }

        let card = GiftCard {
            id: Uuid::new_v4(),
            provider: provider.to_string(),
            amount,
            purchase_date: today,
            expiry_date: today.checked_add_months(Months::new(GIFT_CARD_VALIDITY_MONTHS)),
            trip_id: None,
        };
        info!(card = %card.id, provider, amount, "gift card purchased");
        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub fn card(&self, id: Uuid) -> Option<&GiftCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Earmarks a card for `trip`. Only unexpired cards can be assigned, and
    /// only to trips that have not started yet.
    pub fn assign(&mut self, card_id: Uuid, trip: &TripPlan, today: NaiveDate) -> Result<()> {
        let status = trip.status_on(today);
        if status != TripStatus::Planned {
            return Err(PlannerError::Validation(format!(
                "gift cards can only be assigned to planned trips (`{}` is {})",
                trip.name, status
            )));
        }

        let card = self
            .cards
            .iter_mut()
            .find(|card| card.id == card_id)
            .ok_or_else(|| PlannerError::NotFound(format!("gift card {}", card_id)))?;
        if card.is_expired(today) {
            return Err(PlannerError::Validation(format!(
                "gift card from {} expired on {}",
                card.provider,
                card.expiry_date.map(|d| d.to_string()).unwrap_or_default()
            )));
        }
        card.trip_id = Some(trip.id);
        info!(card = %card_id, trip = %trip.id, "gift card assigned");
        Ok(())
    }

    pub fn active_cards(&self, today: NaiveDate) -> Vec<&GiftCard> {
        self.cards
            .iter()
            .filter(|card| !card.is_expired(today))
            .collect()
    }

    /// Sum of all unexpired card amounts.
    pub fn balance(&self, today: NaiveDate) -> f64 {
        self.active_cards(today).iter().map(|card| card.amount).sum()
    }

    pub fn cards_for_trip(&self, trip_id: Uuid) -> Vec<&GiftCard> {
        self.cards
            .iter()
            .filter(|card| card.trip_id == Some(trip_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::CategoryTemplate;
    use crate::trip::TripDraft;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn purchase_sets_one_year_expiry() {
        let mut wallet = Wallet::new();
        let card = wallet.purchase("Airbnb", 120.0, date(2024, 2, 29)).unwrap();
        assert_eq!(card.expiry_date, Some(date(2025, 2, 28)));
        assert!(card.trip_id.is_none());
    }

    #[test]
    fn purchase_validates_required_fields() {
        let mut wallet = Wallet::new();
        assert!(wallet.purchase("  ", 50.0, date(2025, 1, 1)).is_err());
        assert!(wallet.purchase("Uber", 0.0, date(2025, 1, 1)).is_err());
        assert!(wallet.cards.is_empty());
    }

    #[test]
    fn balance_ignores_expired_cards() {
        let mut wallet = Wallet::new();
        wallet.purchase("Uber", 50.0, date(2024, 1, 10)).unwrap();
        wallet.purchase("Starbucks", 25.0, date(2024, 6, 1)).unwrap();
        assert_eq!(wallet.balance(date(2024, 12, 31)), 75.0);
        assert_eq!(wallet.balance(date(2025, 2, 1)), 25.0);
        assert_eq!(wallet.active_cards(date(2025, 2, 1)).len(), 1);
    }

    fn trip(name: &str, start: NaiveDate, end: NaiveDate) -> TripPlan {
        let mut draft = TripDraft::new(800.0, &CategoryTemplate::defaults()).unwrap();
        draft.set_name(name);
        draft.set_dates(start, end).unwrap();
        draft.submit(Utc::now()).unwrap()
    }

    #[test]
    fn assign_links_card_to_trip() {
        let mut wallet = Wallet::new();
        let card_id = wallet.purchase("Avianca", 300.0, date(2025, 3, 1)).unwrap().id;
        let plan = trip("Bogota", date(2025, 4, 10), date(2025, 4, 14));
        wallet.assign(card_id, &plan, date(2025, 3, 2)).unwrap();
        assert_eq!(wallet.cards_for_trip(plan.id).len(), 1);

        assert!(matches!(
            wallet.assign(Uuid::new_v4(), &plan, date(2025, 3, 2)),
            Err(PlannerError::NotFound(_))
        ));
        let later = trip("Santa Marta", date(2026, 6, 1), date(2026, 6, 3));
        assert!(matches!(
            wallet.assign(card_id, &later, date(2026, 4, 1)),
            Err(PlannerError::Validation(_))
        ));
    }

    #[test]
    fn cards_only_go_to_trips_that_have_not_started() {
        let mut wallet = Wallet::new();
        let card_id = wallet.purchase("Uber", 50.0, date(2025, 5, 1)).unwrap().id;
        let plan = trip("Cali", date(2025, 5, 10), date(2025, 5, 12));

        for today in [date(2025, 5, 10), date(2025, 5, 12), date(2025, 5, 20)] {
            assert!(matches!(
                wallet.assign(card_id, &plan, today),
                Err(PlannerError::Validation(_))
            ));
        }
        assert!(wallet.card(card_id).unwrap().trip_id.is_none());

        wallet.assign(card_id, &plan, date(2025, 5, 9)).unwrap();
        assert_eq!(wallet.card(card_id).unwrap().trip_id, Some(plan.id));
    }
}
