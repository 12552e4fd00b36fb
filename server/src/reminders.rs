//! Background reminder sweep.
//!
//! Periodically finds active appointments starting within the lead window
//! that have not been reminded, emails the customer, and stamps
//! `reminder_sent_at` so each appointment is reminded at most once. A
//! reschedule clears the stamp, so the moved appointment gets a fresh
//! reminder for its new time.

use crate::config::ReminderConfig;
use dearly_booking::notify;
use dearly_booking::{BookingEngine, BookingError};
use chrono::Duration;
use tracing::{info, warn};

/// Run the sweep loop forever. Spawn as a background task.
pub async fn run_reminder_loop(engine: BookingEngine, config: ReminderConfig) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(config.interval_secs));
    // A missed tick (slow sweep, suspended host) should not burst.
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    info!(
        interval_secs = config.interval_secs,
        lead_hours = config.lead_hours,
        "reminder sweep started"
    );
    loop {
        interval.tick().await;
        if let Err(err) = sweep_once(&engine, config.lead_hours).await {
            warn!(error = %err, "reminder sweep failed");
        }
    }
}

/// One sweep pass. Sends at most one reminder per due appointment.
///
/// The stamp is written only after the email goes out, so a failed send is
/// retried on the next pass rather than silently dropped.
///
/// # Errors
///
/// Returns [`BookingError::Internal`] if the due-appointment query fails;
/// per-appointment failures are logged and skipped.
pub async fn sweep_once(engine: &BookingEngine, lead_hours: i64) -> Result<usize, BookingError> {
    let env = engine.env();
    let now = env.clock.now();
    let due = env
        .appointments
        .due_for_reminder(now, now + Duration::hours(lead_hours))
        .await?;

    let mut sent = 0;
    for appointment in due {
        let session = match env.sessions.get(appointment.session_id).await {
            Ok(session) => session,
            Err(err) => {
                warn!(appointment_id = %appointment.id, error = %err, "reminder skipped: session lookup failed");
                continue;
            }
        };
        let mail = notify::reminder_notice(&appointment);
        if let Err(err) = env
            .mailer
            .send(&session.customer_email, &mail.subject, &mail.html_body)
            .await
        {
            warn!(appointment_id = %appointment.id, error = %err, "reminder send failed, will retry next sweep");
            continue;
        }
        if let Err(err) = env.appointments.mark_reminded(appointment.id, now).await {
            warn!(appointment_id = %appointment.id, error = %err, "failed to stamp reminder");
            continue;
        }
        sent += 1;
    }
    if sent > 0 {
        info!(sent, "reminders sent");
    }
    Ok(sent)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dearly_booking::mocks::{FixedClock, InMemoryStore, MockMailer};
    use dearly_booking::{BookingConfig, BookingEnvironment, Session, SessionId, UserId};
    use dearly_booking::types::{AvailabilitySlot, SlotId};
    use std::sync::Arc;

    fn engine_with(store: &InMemoryStore, mailer: &Arc<MockMailer>) -> BookingEngine {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
        BookingEngine::new(BookingEnvironment::new(
            clock,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            mailer.clone(),
            BookingConfig::default(),
        ))
    }

    #[tokio::test]
    async fn sweep_reminds_each_due_appointment_once() {
        let store = InMemoryStore::new();
        let mailer = Arc::new(MockMailer::new());
        let engine = engine_with(&store, &mailer);
        let now = engine.env().clock.now();

        let session = Session::paid(
            SessionId::new(),
            UserId::new(),
            "nana@example.com".to_string(),
            14900,
            now,
        );
        store.put_session(session.clone());
        let slot_id = SlotId::new();
        let start = now + chrono::Duration::hours(3);
        store.put_slot(AvailabilitySlot {
            id: slot_id,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            booked: false,
            created_by: UserId::new(),
        });
        engine.book(session.id, slot_id).await.unwrap();
        let booked_mail_count = mailer.sent().len();

        assert_eq!(sweep_once(&engine, 24).await.unwrap(), 1);
        let sent = mailer.sent();
        assert_eq!(sent.len(), booked_mail_count + 1);
        assert!(sent.last().unwrap().subject.starts_with("Reminder"));

        // Second sweep finds nothing.
        assert_eq!(sweep_once(&engine, 24).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_send_leaves_appointment_due() {
        let store = InMemoryStore::new();
        let mailer = Arc::new(MockMailer::new());
        let engine = engine_with(&store, &mailer);
        let now = engine.env().clock.now();

        let session = Session::paid(
            SessionId::new(),
            UserId::new(),
            "nana@example.com".to_string(),
            14900,
            now,
        );
        store.put_session(session.clone());
        let slot_id = SlotId::new();
        let start = now + chrono::Duration::hours(3);
        store.put_slot(AvailabilitySlot {
            id: slot_id,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            booked: false,
            created_by: UserId::new(),
        });
        mailer.set_failing(true);
        engine.book(session.id, slot_id).await.unwrap();

        assert_eq!(sweep_once(&engine, 24).await.unwrap(), 0);

        mailer.set_failing(false);
        assert_eq!(sweep_once(&engine, 24).await.unwrap(), 1);
    }
}
