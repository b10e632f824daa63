//! Scheduled-task settings: show and partial update.

use std::fmt::Write;

use subsman_core::settings::weekday_name;
use subsman_core::{Dashboard, SystemSettings, TimeOfDay, UpdateSchedule};

use crate::cli::{Schedule, SettingsArgs, SettingsCommand, SettingsSetArgs};
use crate::error::CliError;
use crate::output;

use super::Context;

fn detail(settings: &SystemSettings, color: bool) -> String {
    let tasks = &settings.scheduled_tasks;
    let update = &tasks.subscription_update;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        output::label("Scheduled tasks:", color),
        if tasks.enabled { "enabled" } else { "disabled" }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::label("Subscription update", color));
    let _ = writeln!(out, "  Schedule: {}", update.schedule);
    if update.schedule == UpdateSchedule::Weekly {
        let day = update.weekday.and_then(weekday_name).unwrap_or("-");
        let _ = writeln!(out, "  Weekday:  {day}");
    }
    let time = update.time.map_or_else(|| "-".into(), |t| t.to_string());
    let _ = writeln!(out, "  Time:     {time}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::label("Node check", color));
    let _ = write!(out, "  Interval: {} min", tasks.node_check.interval);
    out
}

/// Overlay the given flags on the current settings.
///
/// Switching to a daily schedule drops any stored weekday.
fn apply(mut settings: SystemSettings, args: &SettingsSetArgs) -> SystemSettings {
    let tasks = &mut settings.scheduled_tasks;
    if let Some(enabled) = args.enabled {
        tasks.enabled = enabled;
    }
    if let Some(schedule) = args.schedule {
        tasks.subscription_update.schedule = match schedule {
            Schedule::Daily => UpdateSchedule::Daily,
            Schedule::Weekly => UpdateSchedule::Weekly,
        };
    }
    if let Some(weekday) = args.weekday {
        tasks.subscription_update.weekday = Some(weekday);
    }
    if tasks.subscription_update.schedule == UpdateSchedule::Daily {
        tasks.subscription_update.weekday = None;
    }
    if let Some(at) = args.at {
        tasks.subscription_update.time = Some(TimeOfDay {
            hour: at.hour,
            minute: at.minute,
        });
    }
    if let Some(interval) = args.check_interval {
        tasks.node_check.interval = interval;
    }
    settings
}

fn show(dashboard: &Dashboard, ctx: &Context) -> Result<(), CliError> {
    let snap = dashboard.store().settings_snapshot();
    let Some(settings) = snap.as_ref() else {
        return Err(CliError::Internal("settings missing after fetch".into()));
    };
    let out = output::render_single(
        ctx.format,
        settings,
        |s| detail(s, ctx.color),
        |s| s.scheduled_tasks.enabled.to_string(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle(
    dashboard: &Dashboard,
    args: SettingsArgs,
    ctx: &Context,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            dashboard.fetch_settings().await?;
            show(dashboard, ctx)
        }

        SettingsCommand::Set(set) => {
            dashboard.fetch_settings().await?;
            let current = dashboard
                .store()
                .settings_snapshot()
                .as_ref()
                .clone()
                .unwrap_or_default();
            let updated = apply(current, &set);
            dashboard.update_settings(updated).await?;
            output::print_status("Settings saved", ctx.quiet);
            show(dashboard, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::ClockTime;

    fn set_args() -> SettingsSetArgs {
        SettingsSetArgs {
            enabled: None,
            schedule: None,
            weekday: None,
            at: None,
            check_interval: None,
        }
    }

    #[test]
    fn unspecified_flags_keep_current_values() {
        let mut current = SystemSettings::default();
        current.scheduled_tasks.enabled = true;
        current.scheduled_tasks.node_check.interval = 60;

        let updated = apply(
            current.clone(),
            &SettingsSetArgs {
                at: Some(ClockTime { hour: 4, minute: 30 }),
                ..set_args()
            },
        );
        assert!(updated.scheduled_tasks.enabled);
        assert_eq!(updated.scheduled_tasks.node_check.interval, 60);
        assert_eq!(
            updated.scheduled_tasks.subscription_update.time,
            Some(TimeOfDay { hour: 4, minute: 30 })
        );
    }

    #[test]
    fn weekly_keeps_weekday_and_daily_drops_it() {
        let weekly = apply(
            SystemSettings::default(),
            &SettingsSetArgs {
                schedule: Some(Schedule::Weekly),
                weekday: Some(3),
                ..set_args()
            },
        );
        assert_eq!(weekly.scheduled_tasks.subscription_update.weekday, Some(3));

        let daily = apply(
            weekly,
            &SettingsSetArgs {
                schedule: Some(Schedule::Daily),
                ..set_args()
            },
        );
        assert_eq!(daily.scheduled_tasks.subscription_update.weekday, None);
    }

    #[test]
    fn detail_names_the_weekday() {
        let settings = apply(
            SystemSettings::default(),
            &SettingsSetArgs {
                schedule: Some(Schedule::Weekly),
                weekday: Some(0),
                ..set_args()
            },
        );
        assert!(detail(&settings, false).contains("Weekday:  Sun"));
    }
}
