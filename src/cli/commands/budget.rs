use crate::cli::core::{
    parse_amount, parse_position, required_arg, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::currency::format_percentage;
use crate::errors::PlannerError;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "budget",
            "Set the trip's total budget (resets the category split)",
            "budget <amount>",
            cmd_budget,
        ),
        CommandEntry::new(
            "share",
            "Set one category's share; the others rebalance proportionally",
            "share <category#> <percent>",
            cmd_share,
        ),
        CommandEntry::new(
            "budget-show",
            "Show the budget split",
            "budget-show",
            cmd_budget_show,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = parse_amount(required_arg(args, 0, "budget <amount>")?, "amount")?;
    context.draft.set_budget(amount)?;
    io::print_success(format!("Total budget set to {}.", context.money(amount)));
    print_budget(context);
    Ok(())
}

fn cmd_share(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "share <category#> <percent>";
    let index = parse_position(required_arg(args, 0, usage)?, "category#")?;
    let percentage = parse_amount(
        required_arg(args, 1, usage)?.trim_end_matches('%'),
        "percent",
    )?;

    match context.draft.set_budget_share(index, percentage) {
        Ok(_) => {}
        Err(PlannerError::InvalidIndex { len, .. }) => {
            return Err(CommandError::InvalidArguments(format!(
                "category #{} does not exist (choose 1-{})",
                index + 1,
                len
            )))
        }
        Err(err) => return Err(err.into()),
    }

    if !(0.0..=100.0).contains(&percentage) {
        io::print_warning("Shares are limited to 0-100%; the value was clamped.");
    }
    print_budget(context);
    Ok(())
}

fn cmd_budget_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_budget(context);
    Ok(())
}

pub(crate) fn print_budget(context: &ShellContext) {
    let allocator = context.draft.allocator();
    section(format!(
        "Budget {}",
        context.money(allocator.total_budget())
    ));
    for (position, category) in allocator.categories().iter().enumerate() {
        line(format!(
            "  {:>2}. {:<16} {:>5}  {:>14}",
            position + 1,
            category.name(),
            format_percentage(category.percentage()),
            context.money(category.amount())
        ));
    }
}
