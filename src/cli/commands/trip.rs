use std::path::Path;

use chrono::{Local, Utc};

use crate::cli::core::{
    parse_amount, parse_date, parse_position, parse_time, required_arg, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::trip::{ActivityCategory, ActivityDraft, TripDraft, TripPlan, TripTemplate};
use crate::utils::persistence;

use super::budget::print_budget;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "trip-new",
            "Start a new trip draft",
            "trip-new <name>",
            cmd_trip_new,
        ),
        CommandEntry::new(
            "trip-describe",
            "Set or clear the draft's description",
            "trip-describe [text]",
            cmd_trip_describe,
        ),
        CommandEntry::new(
            "trip-dates",
            "Set travel dates and rebuild the itinerary",
            "trip-dates <start YYYY-MM-DD> <end YYYY-MM-DD>",
            cmd_trip_dates,
        ),
        CommandEntry::new(
            "trip-template",
            "Start a draft from a built-in template",
            "trip-template <beach-weekend|mountain-adventure> [start YYYY-MM-DD]",
            cmd_trip_template,
        ),
        CommandEntry::new(
            "activity-add",
            "Add an activity to an itinerary day",
            "activity-add <day#> <name> [cost] [category] [HH:MM] [location]",
            cmd_activity_add,
        ),
        CommandEntry::new(
            "activity-remove",
            "Remove an activity from an itinerary day",
            "activity-remove <day#> <activity#>",
            cmd_activity_remove,
        ),
        CommandEntry::new(
            "trip-show",
            "Show the current draft",
            "trip-show",
            cmd_trip_show,
        ),
        CommandEntry::new(
            "trip-save",
            "Submit the draft and save the trip plan as JSON",
            "trip-save <file>",
            cmd_trip_save,
        ),
        CommandEntry::new(
            "trip-load",
            "Load a saved trip plan",
            "trip-load <file>",
            cmd_trip_load,
        ),
    ]
}

fn cmd_trip_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    required_arg(args, 0, "trip-new <name>")?;
    let mut draft = context.fresh_draft()?;
    draft.set_name(args.join(" "));
    context.draft = draft;
    io::print_success(format!("New trip draft `{}` created.", context.draft.name()));
    Ok(())
}

fn cmd_trip_describe(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.draft.set_description(args.join(" "));
    match context.draft.description() {
        Some(_) => io::print_success("Description updated."),
        None => io::print_success("Description cleared."),
    }
    Ok(())
}

fn cmd_trip_dates(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "trip-dates <start> <end>";
    let start = parse_date(required_arg(args, 0, usage)?)?;
    let end = parse_date(required_arg(args, 1, usage)?)?;
    context.draft.set_dates(start, end)?;
    io::print_success(format!(
        "Trip runs {} to {} ({} days).",
        start,
        end,
        context.draft.days().len()
    ));
    Ok(())
}

fn cmd_trip_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "trip-template <template> [start]";
    let template: TripTemplate = required_arg(args, 0, usage)?.parse()?;
    let start = match args.get(1) {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };
    context.draft = TripDraft::from_template(template, start, &context.config.categories)?;
    io::print_success(format!(
        "Draft `{}` created from template `{}`.",
        context.draft.name(),
        template.slug()
    ));
    Ok(())
}

fn cmd_activity_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "activity-add <day#> <name> [cost] [category] [HH:MM] [location]";
    let day = parse_position(required_arg(args, 0, usage)?, "day#")?;
    let mut activity = ActivityDraft::new(required_arg(args, 1, usage)?);
    if let Some(cost) = args.get(2) {
        activity = activity.with_cost(parse_amount(cost, "cost")?);
    }
    if let Some(category) = args.get(3) {
        activity = activity.with_category(category.parse::<ActivityCategory>()?);
    }
    if let Some(time) = args.get(4) {
        activity = activity.with_time(parse_time(time)?);
    }
    if args.len() > 5 {
        activity = activity.with_location(args[5..].join(" "));
    }

    context.draft.add_activity(day, activity)?;
    io::print_success(format!(
        "Activity added to day {}. Planned activities now total {}.",
        day + 1,
        context.money(context.draft.total_activity_cost())
    ));
    Ok(())
}

fn cmd_activity_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "activity-remove <day#> <activity#>";
    let day = parse_position(required_arg(args, 0, usage)?, "day#")?;
    let position = parse_position(required_arg(args, 1, usage)?, "activity#")?;

    let activity_id = context
        .draft
        .days()
        .get(day)
        .and_then(|trip_day| trip_day.activities.get(position))
        .map(|activity| activity.id)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "day {} has no activity #{}",
                day + 1,
                position + 1
            ))
        })?;
    let removed = context.draft.remove_activity(day, activity_id)?;
    io::print_success(format!("Removed `{}` from day {}.", removed.name, day + 1));
    Ok(())
}

fn cmd_trip_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let draft = &context.draft;
    let title = if draft.name().is_empty() {
        "(unnamed trip)"
    } else {
        draft.name()
    };
    section(format!("Trip {}", title));
    if let Some(description) = draft.description() {
        line(format!("  {}", description));
    }
    match (draft.start_date(), draft.end_date()) {
        (Some(start), Some(end)) => line(format!("  Dates: {} to {}", start, end)),
        _ => line("  Dates: not set"),
    }

    for (position, day) in draft.days().iter().enumerate() {
        let label = day.description.as_deref().unwrap_or("");
        line(format!("  Day {} ({}) {}", position + 1, day.date, label));
        for (index, activity) in day.activities.iter().enumerate() {
            let time = activity
                .time
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".into());
            let location = activity
                .location
                .as_deref()
                .map(|location| format!(" @ {}", location))
                .unwrap_or_default();
            line(format!(
                "      {}. {} {:<24} {:<14} {:>12}{}",
                index + 1,
                time,
                activity.name,
                activity.category.as_str(),
                context.money(activity.cost),
                location
            ));
        }
    }
    line(format!(
        "  Planned activities: {}",
        context.money(draft.total_activity_cost())
    ));
    print_budget(context);
    Ok(())
}

fn cmd_trip_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required_arg(args, 0, "trip-save <file>")?);
    let plan = context.draft.submit(Utc::now())?;
    persistence::save_plan_to_file(&plan, path)?;
    io::print_success(format!(
        "Trip `{}` saved to {}.",
        plan.name,
        path.display()
    ));
    context.last_plan = Some(plan);
    Ok(())
}

fn cmd_trip_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required_arg(args, 0, "trip-load <file>")?);
    let plan = persistence::load_plan_from_file(path)?;
    print_plan(context, &plan);
    context.last_plan = Some(plan);
    Ok(())
}

fn print_plan(context: &ShellContext, plan: &TripPlan) {
    let today = Local::now().date_naive();
    section(format!("Trip {}", plan.name));
    line(format!(
        "  {} to {} ({} days, {})",
        plan.start_date,
        plan.end_date,
        plan.duration_days(),
        plan.status_on(today)
    ));
    line(format!("  Budget: {}", context.money(plan.budget)));
    for budget_line in &plan.budget_breakdown {
        line(format!(
            "    {:<16} {:>6.1}%  {:>14}",
            budget_line.name,
            budget_line.percentage,
            context.money(budget_line.amount)
        ));
    }
    line(format!(
        "  Planned activities: {}",
        context.money(plan.total_activity_cost())
    ));
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, script_context, CommandError};

    #[test]
    fn activities_are_addressed_by_position() {
        let (mut context, _dir) = script_context();
        process_script(
            &mut context,
            &[
                "trip-template beach 2025-07-04",
                "activity-add 2 \"Surf lesson\" 60 entertainment",
                "activity-add 2 Lunch 18.50 food",
            ],
        )
        .unwrap();
        assert_eq!(context.draft.days()[1].activities.len(), 2);
        assert_eq!(context.draft.total_activity_cost(), 78.5);

        context
            .process_line("activity-add 3 Ferry 12 transport 07:45 Old harbour pier")
            .unwrap();
        let ferry = &context.draft.days()[2].activities[0];
        assert_eq!(ferry.time.map(|t| t.to_string()).as_deref(), Some("07:45:00"));
        assert_eq!(ferry.location.as_deref(), Some("Old harbour pier"));
        assert!(context.process_line("activity-add 3 Taxi 9 transport 7pm").is_err());

        context.process_line("activity-remove 2 1").unwrap();
        assert_eq!(context.draft.days()[1].activities[0].name, "Lunch");
        assert!(matches!(
            context.process_line("activity-remove 2 5"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(context.process_line("activity-add 1 Dinner 20 party").is_err());
    }

    #[test]
    fn saved_trips_can_be_loaded_back() {
        let (mut context, dir) = script_context();
        let path = dir.path().join("lisbon.json");
        let save = format!("trip-save {}", path.display());
        let load = format!("trip-load {}", path.display());
        process_script(
            &mut context,
            &[
                "trip-new Lisbon",
                "trip-describe Pasteis and trams",
                "trip-dates 2025-05-01 2025-05-02",
                save.as_str(),
            ],
        )
        .unwrap();
        let saved = context.last_plan.take().unwrap();

        context.process_line(&load).unwrap();
        assert_eq!(context.last_plan.as_ref(), Some(&saved));
        assert_eq!(saved.description.as_deref(), Some("Pasteis and trams"));
    }
}
