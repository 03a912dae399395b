use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::appointment::Appointment;
use crate::models::lead_time::{LeadTimes, describe_lead_time};
use crate::service::notifier::{CardSender, DeliveryOutcome, Notifier};
use crate::service::remaining_time::status_line;
use crate::tasks::clock::Clock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredReminder {
    pub id: Uuid,
    pub lead_time: Duration,
    pub fired_at: DateTime<Utc>,
    pub outcome: DeliveryOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Waiting { remaining: Duration },
    Fired(FiredReminder),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoopReport {
    pub fired: Vec<FiredReminder>,
    pub cancelled: bool,
}

/// One pass over the head threshold: fire it if due, otherwise report
/// how long is left.
pub async fn reminder_tick<S: CardSender + ?Sized>(
    appointment: &Appointment,
    lead_times: &mut LeadTimes,
    notifier: &Notifier<S>,
    now: DateTime<Utc>,
) -> Tick {
    let Some(lead_time) = lead_times.current() else {
        return Tick::Finished;
    };
    let remaining = appointment.remaining(now);
    if remaining > lead_time {
        return Tick::Waiting { remaining };
    }

    let id = appointment.reminder_id(lead_time);
    info!(
        reminder_id = %id,
        lead_time = %describe_lead_time(lead_time),
        title = %appointment.title,
        "sending reminder"
    );
    let outcome = notifier.send(appointment, now).await;
    lead_times.advance();
    Tick::Fired(FiredReminder {
        id,
        lead_time,
        fired_at: now,
        outcome,
    })
}

pub async fn run_reminder_loop<S: CardSender + ?Sized, C: Clock + ?Sized>(
    appointment: &Appointment,
    mut lead_times: LeadTimes,
    notifier: &Notifier<S>,
    clock: &C,
    poll_interval: std::time::Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> LoopReport {
    let mut report = LoopReport::default();
    let locale = notifier.options().locale;
    info!(
        title = %appointment.title,
        begin = %appointment.begin,
        reminders = lead_times.len(),
        "starting reminder loop"
    );

    loop {
        if *shutdown.borrow() {
            report.cancelled = true;
            break;
        }
        match reminder_tick(appointment, &mut lead_times, notifier, clock.now()).await {
            Tick::Finished => break,
            Tick::Fired(fired) => report.fired.push(fired),
            Tick::Waiting { remaining } => {
                info!("{}", status_line(remaining, locale));
                tokio::select! {
                    _ = clock.sleep(poll_interval) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            // Nobody can signal shutdown any more; keep polling.
                            clock.sleep(poll_interval).await;
                        }
                    }
                }
            }
        }
    }

    if report.cancelled {
        info!(
            outstanding = lead_times.len(),
            "reminder loop cancelled"
        );
    } else {
        debug!(fired = report.fired.len(), "all reminders sent");
    }
    report
}
