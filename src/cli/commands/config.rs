use crate::cli::core::{required_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::currency::format_percentage;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config-show",
            "Show the current settings",
            "config-show",
            cmd_config_show,
        ),
        CommandEntry::new(
            "config-set",
            "Change a setting (locale, currency, default_budget)",
            "config-set <key> <value>",
            cmd_config_set,
        ),
    ]
}

fn cmd_config_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let config = &context.config;
    section("Configuration");
    line(format!("  File           : {}", context.config_manager.path().display()));
    line(format!("  locale         : {}", config.locale));
    line(format!("  currency       : {}", config.currency));
    line(format!(
        "  default_budget : {}",
        context.money(config.default_budget)
    ));
    line("  categories     :");
    for template in &config.categories {
        line(format!(
            "    {:<20} {:<16} {:>5}",
            template.id,
            template.name,
            format_percentage(template.percentage)
        ));
    }
    Ok(())
}

fn cmd_config_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "config-set <key> <value>";
    let key = required_arg(args, 0, usage)?.to_ascii_lowercase();
    let value = required_arg(args, 1, usage)?;

    let mut updated = context.config.clone();
    updated.apply_setting(&key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;

    io::print_success(format!("{} updated.", key));
    if key == "default_budget" {
        io::print_hint(format!(
            "New drafts start at {}; use `budget` to change the current one.",
            context.money(context.config.default_budget)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{script_context, CommandError};
    use crate::errors::PlannerError;

    #[test]
    fn settings_are_persisted() {
        let (mut context, _dir) = script_context();
        context.process_line("config-set currency eur").unwrap();
        assert_eq!(context.config.currency, "EUR");
        let stored = context.config_manager.load().unwrap();
        assert_eq!(stored.currency, "EUR");
    }

    #[test]
    fn unknown_keys_leave_the_config_alone() {
        let (mut context, _dir) = script_context();
        let before = context.config.clone();
        assert!(matches!(
            context.process_line("config-set theme dark"),
            Err(CommandError::Core(PlannerError::InvalidInput(_)))
        ));
        assert_eq!(context.config, before);
    }
}
