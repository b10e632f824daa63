// ── Settings validation ──
//
// The backend accepts whatever it is sent, so range checks happen here
// before an update leaves the process.

use crate::error::CoreError;
use crate::model::{SystemSettings, UpdateSchedule};

/// Check a settings document before it is sent to the backend.
pub fn validate(settings: &SystemSettings) -> Result<(), CoreError> {
    let tasks = &settings.scheduled_tasks;
    let update = &tasks.subscription_update;

    if let Some(time) = update.time {
        if time.hour > 23 {
            return Err(CoreError::validation(format!(
                "hour must be 0-23, got {}",
                time.hour
            )));
        }
        if time.minute > 59 {
            return Err(CoreError::validation(format!(
                "minute must be 0-59, got {}",
                time.minute
            )));
        }
    }

    match (update.schedule, update.weekday) {
        (_, Some(day)) if day > 6 => {
            return Err(CoreError::validation(format!(
                "weekday must be 0-6 (0 = Sunday), got {day}"
            )));
        }
        (UpdateSchedule::Weekly, None) => {
            return Err(CoreError::validation(
                "weekly schedule requires a weekday",
            ));
        }
        _ => {}
    }

    if tasks.node_check.interval == 0 {
        return Err(CoreError::validation(
            "node check interval must be at least one minute",
        ));
    }

    Ok(())
}

/// Short weekday name for display, Sunday first.
pub fn weekday_name(day: u8) -> Option<&'static str> {
    const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    NAMES.get(usize::from(day)).copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{NodeCheck, ScheduledTasks, SubscriptionUpdate, TimeOfDay};

    fn settings(schedule: UpdateSchedule, weekday: Option<u8>, hour: u8, minute: u8) -> SystemSettings {
        SystemSettings {
            scheduled_tasks: ScheduledTasks {
                enabled: true,
                subscription_update: SubscriptionUpdate {
                    schedule,
                    weekday,
                    time: Some(TimeOfDay { hour, minute }),
                },
                node_check: NodeCheck { interval: 60 },
            },
        }
    }

    #[test]
    fn accepts_daily_and_weekly() {
        assert!(validate(&settings(UpdateSchedule::Daily, None, 23, 59)).is_ok());
        assert!(validate(&settings(UpdateSchedule::Weekly, Some(6), 0, 0)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_time() {
        assert!(validate(&settings(UpdateSchedule::Daily, None, 24, 0)).is_err());
        assert!(validate(&settings(UpdateSchedule::Daily, None, 3, 60)).is_err());
    }

    #[test]
    fn rejects_bad_weekday() {
        assert!(validate(&settings(UpdateSchedule::Weekly, Some(7), 3, 0)).is_err());
        assert!(validate(&settings(UpdateSchedule::Weekly, None, 3, 0)).is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        let mut s = settings(UpdateSchedule::Daily, None, 3, 0);
        s.scheduled_tasks.node_check.interval = 0;
        let err = validate(&s).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[test]
    fn weekday_names_start_on_sunday() {
        assert_eq!(weekday_name(0), Some("Sun"));
        assert_eq!(weekday_name(6), Some("Sat"));
        assert_eq!(weekday_name(7), None);
    }
}
