use std::path::Path;

use chrono::Local;

use crate::cli::core::{
    parse_amount, parse_position, required_arg, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::utils::persistence;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "giftcard-buy",
            "Record a purchased gift card",
            "giftcard-buy <provider> <amount>",
            cmd_giftcard_buy,
        ),
        CommandEntry::new(
            "giftcard-assign",
            "Earmark a gift card for the last submitted trip (planned trips only)",
            "giftcard-assign <card#>",
            cmd_giftcard_assign,
        ),
        CommandEntry::new(
            "wallet-show",
            "List gift cards and the available balance",
            "wallet-show",
            cmd_wallet_show,
        ),
        CommandEntry::new(
            "wallet-save",
            "Save the wallet as JSON",
            "wallet-save <file>",
            cmd_wallet_save,
        ),
        CommandEntry::new(
            "wallet-load",
            "Replace the wallet with a saved one",
            "wallet-load <file>",
            cmd_wallet_load,
        ),
    ]
}

fn cmd_giftcard_buy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "giftcard-buy <provider> <amount>";
    let provider = required_arg(args, 0, usage)?;
    let amount = parse_amount(required_arg(args, 1, usage)?, "amount")?;
    let today = Local::now().date_naive();

    let card = context.wallet.purchase(provider, amount, today)?.clone();
    let expiry = card
        .expiry_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "never".into());
    io::print_success(format!(
        "{} gift card for {} added (expires {}).",
        card.provider,
        context.money(card.amount),
        expiry
    ));
    Ok(())
}

fn cmd_giftcard_assign(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position = parse_position(required_arg(args, 0, "giftcard-assign <card#>")?, "card#")?;
    let Some(plan) = context.last_plan.as_ref() else {
        return Err(CommandError::NoTripPlan);
    };
    let card_id = context
        .wallet
        .cards
        .get(position)
        .map(|card| card.id)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "gift card #{} does not exist (wallet holds {})",
                position + 1,
                context.wallet.cards.len()
            ))
        })?;

    context
        .wallet
        .assign(card_id, plan, Local::now().date_naive())?;
    io::print_success(format!("Gift card #{} assigned to `{}`.", position + 1, plan.name));
    Ok(())
}

fn cmd_wallet_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = Local::now().date_naive();
    section("Wallet");
    if context.wallet.cards.is_empty() {
        line("  No gift cards yet. Use `giftcard-buy <provider> <amount>`.");
        return Ok(());
    }

    for (position, card) in context.wallet.cards.iter().enumerate() {
        let state = if card.is_expired(today) {
            "expired"
        } else if card.trip_id.is_some() {
            "assigned"
        } else {
            "available"
        };
        line(format!(
            "  {:>2}. {:<16} {:>12}  {:<10} bought {}",
            position + 1,
            card.provider,
            context.money(card.amount),
            state,
            card.purchase_date
        ));
    }
    line(format!(
        "  Balance: {}",
        context.money(context.wallet.balance(today))
    ));
    Ok(())
}

fn cmd_wallet_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required_arg(args, 0, "wallet-save <file>")?);
    persistence::save_wallet_to_file(&context.wallet, path)?;
    io::print_success(format!("Wallet saved to {}.", path.display()));
    Ok(())
}

fn cmd_wallet_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required_arg(args, 0, "wallet-load <file>")?);
    context.wallet = persistence::load_wallet_from_file(path)?;
    io::print_success(format!(
        "Loaded {} gift card(s) from {}.",
        context.wallet.cards.len(),
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, script_context, CommandError};
    use crate::errors::PlannerError;

    #[test]
    fn wallet_round_trips_through_a_file() {
        let (mut context, dir) = script_context();
        let path = dir.path().join("wallet.json");
        let save = format!("wallet-save {}", path.display());
        let load = format!("wallet-load {}", path.display());

        process_script(
            &mut context,
            &["giftcard-buy Airbnb 120", "giftcard-buy \"Rail Pass\" 80", save.as_str()],
        )
        .unwrap();
        context.wallet = Default::default();
        context.process_line(&load).unwrap();
        assert_eq!(context.wallet.cards.len(), 2);
        assert_eq!(context.wallet.cards[1].provider, "Rail Pass");
    }

    #[test]
    fn assigning_links_the_card_to_the_saved_trip() {
        let (mut context, dir) = script_context();
        let trip = format!("trip-save {}", dir.path().join("trip.json").display());
        process_script(
            &mut context,
            &[
                "trip-new Oaxaca",
                "trip-dates 2099-10-01 2099-10-03",
                trip.as_str(),
                "giftcard-buy Uber 40",
                "giftcard-assign 1",
            ],
        )
        .unwrap();
        let trip_id = context.last_plan.as_ref().unwrap().id;
        assert_eq!(context.wallet.cards_for_trip(trip_id).len(), 1);
        assert!(context.process_line("giftcard-assign 3").is_err());
    }

    #[test]
    fn past_trips_cannot_receive_gift_cards() {
        let (mut context, dir) = script_context();
        let trip = format!("trip-save {}", dir.path().join("past.json").display());
        process_script(
            &mut context,
            &[
                "trip-new Past",
                "trip-dates 2020-01-01 2020-01-03",
                trip.as_str(),
                "giftcard-buy Uber 50",
            ],
        )
        .unwrap();

        assert!(matches!(
            context.process_line("giftcard-assign 1"),
            Err(CommandError::Core(PlannerError::Validation(_)))
        ));
        assert!(context.wallet.cards[0].trip_id.is_none());
    }
}
