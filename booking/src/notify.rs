//! Outgoing email content for booking lifecycle notifications.
//!
//! Subjects and HTML bodies only; delivery goes through the
//! [`crate::providers::Mailer`] and is best-effort.

use crate::types::Appointment;
use chrono::{DateTime, Utc};

/// A composed email, ready to hand to the mailer.
#[derive(Debug, Clone)]
pub struct EmailContent {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

fn format_when(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{} – {} UTC",
        start.format("%A %-d %B %Y, %H:%M"),
        end.format("%H:%M")
    )
}

fn layout(heading: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #7c3aed;">{heading}</h2>
        {body_html}
        <p style="color: #666; font-size: 12px; margin-top: 40px;">
            Dearly — recorded life-story interviews
        </p>
    </div>
</body>
</html>"#
    )
}

/// Confirmation sent to the customer after a successful booking.
#[must_use]
pub fn booking_confirmation(appointment: &Appointment, manage_url: &str) -> EmailContent {
    let when = format_when(appointment.start_time, appointment.end_time);
    EmailContent {
        subject: "Your Dearly interview is booked".to_string(),
        html_body: layout(
            "Your interview is booked",
            &format!(
                r#"<p>Your interview is scheduled for <strong>{when}</strong>.</p>
        <p style="margin: 30px 0;">
            <a href="{manage_url}"
               style="display: inline-block; background-color: #7c3aed; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;">
                Manage booking
            </a>
        </p>
        <p style="color: #666; font-size: 14px;">
            Use the link above to reschedule or cancel. Keep it private — anyone with it can manage this booking.
        </p>"#
            ),
        ),
    }
}

/// Update sent to the customer after a reschedule, naming both times.
#[must_use]
pub fn reschedule_notice(
    appointment: &Appointment,
    old_start: DateTime<Utc>,
    old_end: DateTime<Utc>,
    manage_url: &str,
) -> EmailContent {
    let old_when = format_when(old_start, old_end);
    let new_when = format_when(appointment.start_time, appointment.end_time);
    EmailContent {
        subject: "Your Dearly interview was rescheduled".to_string(),
        html_body: layout(
            "Your interview was rescheduled",
            &format!(
                r#"<p>Previous time: <s>{old_when}</s></p>
        <p>New time: <strong>{new_when}</strong></p>
        <p style="margin: 30px 0;">
            <a href="{manage_url}"
               style="display: inline-block; background-color: #7c3aed; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;">
                Manage booking
            </a>
        </p>"#
            ),
        ),
    }
}

/// Cancellation notice sent to the customer.
#[must_use]
pub fn cancellation_notice(appointment: &Appointment) -> EmailContent {
    let when = format_when(appointment.start_time, appointment.end_time);
    EmailContent {
        subject: "Your Dearly interview was cancelled".to_string(),
        html_body: layout(
            "Your interview was cancelled",
            &format!(
                "<p>The interview scheduled for <strong>{when}</strong> has been cancelled. \
                 Your purchase remains valid — book a new time whenever you're ready.</p>"
            ),
        ),
    }
}

/// Day-ahead reminder sent to the customer.
#[must_use]
pub fn reminder_notice(appointment: &Appointment) -> EmailContent {
    let when = format_when(appointment.start_time, appointment.end_time);
    EmailContent {
        subject: "Reminder: your Dearly interview is tomorrow".to_string(),
        html_body: layout(
            "Your interview is tomorrow",
            &format!(
                "<p>A reminder that your interview is scheduled for <strong>{when}</strong>. \
                 Your interviewer will call you at the booked time.</p>"
            ),
        ),
    }
}

/// Delivery notice with the shareable playback link.
#[must_use]
pub fn delivery_notice(playback_url: &str) -> EmailContent {
    EmailContent {
        subject: "Your Dearly story is ready".to_string(),
        html_body: layout(
            "Your story is ready",
            &format!(
                r#"<p>Your recorded interview has been prepared and is ready to listen to and share.</p>
        <p style="margin: 30px 0;">
            <a href="{playback_url}"
               style="display: inline-block; background-color: #7c3aed; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;">
                Listen to your story
            </a>
        </p>
        <p style="color: #666; font-size: 14px;">
            Anyone with this link can listen — share it with family as you wish.
        </p>"#
            ),
        ),
    }
}

/// Internal staff copy describing booking activity.
#[must_use]
pub fn staff_notice(event: &str, appointment: &Appointment) -> EmailContent {
    let when = format_when(appointment.start_time, appointment.end_time);
    EmailContent {
        subject: format!("[Dearly] {event}: {when}"),
        html_body: layout(
            event,
            &format!(
                "<p>Session {}, appointment {}, slot {}: <strong>{when}</strong>.</p>",
                appointment.session_id, appointment.id, appointment.slot_id
            ),
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        AppointmentId, AppointmentStatus, SessionId, SlotId, UserId,
    };
    use chrono::TimeZone;

    fn appointment() -> Appointment {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        Appointment {
            id: AppointmentId::new(),
            session_id: SessionId::new(),
            customer_id: UserId::new(),
            slot_id: SlotId::new(),
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            status: AppointmentStatus::Scheduled,
            manage_token: "tok".to_string(),
            reminder_sent_at: None,
            created_at: start,
        }
    }

    #[test]
    fn confirmation_embeds_manage_link_and_time() {
        let mail = booking_confirmation(&appointment(), "https://x/manage/tok");
        assert!(mail.html_body.contains("https://x/manage/tok"));
        assert!(mail.html_body.contains("Sunday 1 June 2025, 10:00"));
    }

    #[test]
    fn reschedule_names_both_times() {
        let appt = appointment();
        let old_start = appt.start_time - chrono::Duration::hours(2);
        let old_end = appt.end_time - chrono::Duration::hours(2);
        let mail = reschedule_notice(&appt, old_start, old_end, "https://x/manage/tok");
        assert!(mail.html_body.contains("08:00"));
        assert!(mail.html_body.contains("10:00"));
    }
}
