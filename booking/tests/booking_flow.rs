//! End-to-end lifecycle tests for the booking engine against the
//! in-memory providers.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use dearly_booking::mocks::{FixedClock, InMemoryStore, MockMailer};
use dearly_booking::types::{AvailabilitySlot, ProcessingStatus};
use dearly_booking::{
    AppointmentStatus, BookingChannel, BookingConfig, BookingEngine, BookingEnvironment,
    BookingError, Identity, Role, Session, SessionId, SessionStatus, SlotId, UserId,
};
use std::sync::Arc;

struct Harness {
    engine: BookingEngine,
    store: InMemoryStore,
    mailer: Arc<MockMailer>,
    clock: Arc<FixedClock>,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn harness() -> Harness {
    let store = InMemoryStore::new();
    let mailer = Arc::new(MockMailer::new());
    let clock = Arc::new(FixedClock::new(now()));
    let env = BookingEnvironment::new(
        clock.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        mailer.clone(),
        BookingConfig::default(),
    );
    Harness {
        engine: BookingEngine::new(env),
        store,
        mailer,
        clock,
    }
}

fn admin() -> Identity {
    Identity {
        user_id: UserId::new(),
        role: Role::Admin,
    }
}

fn interviewer() -> Identity {
    Identity {
        user_id: UserId::new(),
        role: Role::Interviewer,
    }
}

fn customer() -> Identity {
    Identity {
        user_id: UserId::new(),
        role: Role::Customer,
    }
}

fn paid_session(h: &Harness) -> Session {
    let session = Session::paid(
        SessionId::new(),
        UserId::new(),
        "nana@example.com".to_string(),
        14900,
        now(),
    );
    h.store.put_session(session.clone());
    session
}

/// A free slot starting `hours` after the fixed clock.
fn open_slot(h: &Harness, hours: i64) -> AvailabilitySlot {
    let start = now() + Duration::hours(hours);
    let slot = AvailabilitySlot {
        id: SlotId::new(),
        start_time: start,
        end_time: start + Duration::hours(1),
        booked: false,
        created_by: UserId::new(),
    };
    h.store.put_slot(slot.clone());
    slot
}

// ============================================================================
// Slot generation
// ============================================================================

#[tokio::test]
async fn generate_slots_rounds_and_fills_window() {
    let h = harness();
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 15, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap();

    let slots = h.engine.generate_slots(admin(), start, end).await.unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(
        slots[0].start_time,
        Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
    );
    assert_eq!(slots[2].end_time, end);
    assert!(slots.iter().all(|s| !s.booked));
}

#[tokio::test]
async fn generate_slots_rejects_overlap_with_existing() {
    let h = harness();
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
    h.engine.generate_slots(admin(), start, end).await.unwrap();

    // Second window sharing the 11:00 hour fails whole, nothing is added.
    let err = h
        .engine
        .generate_slots(admin(), start + Duration::hours(2), end + Duration::hours(2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    let open = h.engine.list_open_slots().await.unwrap();
    assert_eq!(open.len(), 3);
}

#[tokio::test]
async fn generate_slots_allows_adjacent_windows() {
    let h = harness();
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    let mid = start + Duration::hours(2);
    h.engine.generate_slots(admin(), start, mid).await.unwrap();
    // [9,11) then [11,13): shared boundary is not an overlap.
    h.engine
        .generate_slots(admin(), mid, mid + Duration::hours(2))
        .await
        .unwrap();

    assert_eq!(h.engine.list_open_slots().await.unwrap().len(), 4);
}

#[tokio::test]
async fn generate_slots_requires_admin() {
    let h = harness();
    let start = now() + Duration::hours(1);
    for actor in [interviewer(), customer()] {
        let err = h
            .engine
            .generate_slots(actor, start, start + Duration::hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn delete_slot_only_when_unbooked() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    let free = open_slot(&h, 5);

    h.engine.book(session.id, slot.id).await.unwrap();
    let err = h.engine.delete_slot(admin(), slot.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    h.engine.delete_slot(admin(), free.id).await.unwrap();
    assert!(h.store.slot(free.id).is_none());
}

#[tokio::test]
async fn slot_starting_right_now_is_neither_listed_nor_bookable() {
    let h = harness();
    let session = paid_session(&h);
    let boundary = open_slot(&h, 0);
    let future = open_slot(&h, 3);

    let open = h.engine.list_open_slots().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, future.id);

    let err = h.engine.book(session.id, boundary.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

// ============================================================================
// Booking
// ============================================================================

#[tokio::test]
async fn book_moves_session_to_scheduled_with_cached_times() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);

    let appt = h.engine.book(session.id, slot.id).await.unwrap();

    assert_eq!(appt.status, AppointmentStatus::Scheduled);
    assert_eq!(appt.start_time, slot.start_time);
    assert_eq!(appt.manage_token.len(), 43);

    let stored = h.store.session(session.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Scheduled);
    assert_eq!(stored.channel, BookingChannel::SlotSystem);
    assert_eq!(stored.appointment_id, Some(appt.id));
    assert_eq!(stored.scheduled_start, Some(slot.start_time));
    assert_eq!(stored.scheduled_end, Some(slot.end_time));

    assert!(h.store.slot(slot.id).unwrap().booked);

    // Customer confirmation plus staff notice.
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "nana@example.com");
    assert!(sent[0].html_body.contains(&appt.manage_token));
}

#[tokio::test]
async fn book_rejects_double_booking_of_a_slot() {
    let h = harness();
    let first = paid_session(&h);
    let second = paid_session(&h);
    let slot = open_slot(&h, 3);

    h.engine.book(first.id, slot.id).await.unwrap();
    let err = h.engine.book(second.id, slot.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // The loser's session is untouched.
    let stored = h.store.session(second.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Paid);
    assert!(stored.appointment_id.is_none());
}

#[tokio::test]
async fn book_rejects_past_slot_and_non_paid_session() {
    let h = harness();
    let session = paid_session(&h);
    let past = open_slot(&h, -2);
    let err = h.engine.book(session.id, past.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    let slot = open_slot(&h, 3);
    h.engine.book(session.id, slot.id).await.unwrap();
    // Already scheduled, cannot book again.
    let other = open_slot(&h, 6);
    let err = h.engine.book(session.id, other.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

#[tokio::test]
async fn book_unknown_session_or_slot_is_not_found() {
    let h = harness();
    let err = h
        .engine
        .book(SessionId::new(), SlotId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));

    let session = paid_session(&h);
    let err = h.engine.book(session.id, SlotId::new()).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

#[tokio::test]
async fn failed_appointment_write_releases_the_slot() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);

    h.store.set_fail_appointment_writes(true);
    let err = h.engine.book(session.id, slot.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Internal(_)));

    // Compensation freed the reservation; the slot sells again.
    assert!(!h.store.slot(slot.id).unwrap().booked);
    let stored = h.store.session(session.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Paid);

    h.store.set_fail_appointment_writes(false);
    h.engine.book(session.id, slot.id).await.unwrap();
}

#[tokio::test]
async fn mailer_failure_does_not_abort_booking() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);

    h.mailer.set_failing(true);
    let appt = h.engine.book(session.id, slot.id).await.unwrap();

    assert_eq!(appt.status, AppointmentStatus::Scheduled);
    assert!(h.store.slot(slot.id).unwrap().booked);
    assert!(h.mailer.sent().is_empty());
}

// ============================================================================
// Reschedule / Cancel
// ============================================================================

#[tokio::test]
async fn reschedule_swaps_slots_and_recaches_times() {
    let h = harness();
    let session = paid_session(&h);
    let old = open_slot(&h, 3);
    let new = open_slot(&h, 6);

    let appt = h.engine.book(session.id, old.id).await.unwrap();
    let moved = h
        .engine
        .reschedule(&appt.manage_token, new.id)
        .await
        .unwrap();

    assert_eq!(moved.slot_id, new.id);
    assert_eq!(moved.start_time, new.start_time);
    assert!(!h.store.slot(old.id).unwrap().booked);
    assert!(h.store.slot(new.id).unwrap().booked);

    let stored = h.store.session(session.id).unwrap();
    assert_eq!(stored.scheduled_start, Some(new.start_time));
    assert_eq!(stored.scheduled_end, Some(new.end_time));
}

#[tokio::test]
async fn reschedule_onto_booked_slot_keeps_original() {
    let h = harness();
    let session = paid_session(&h);
    let other = paid_session(&h);
    let mine = open_slot(&h, 3);
    let taken = open_slot(&h, 6);

    let appt = h.engine.book(session.id, mine.id).await.unwrap();
    h.engine.book(other.id, taken.id).await.unwrap();

    let err = h
        .engine
        .reschedule(&appt.manage_token, taken.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // Original booking untouched.
    assert!(h.store.slot(mine.id).unwrap().booked);
    assert_eq!(h.store.appointment(appt.id).unwrap().slot_id, mine.id);
}

#[tokio::test]
async fn failed_reschedule_write_releases_the_new_slot() {
    let h = harness();
    let session = paid_session(&h);
    let old = open_slot(&h, 3);
    let new = open_slot(&h, 6);

    let appt = h.engine.book(session.id, old.id).await.unwrap();

    h.store.set_fail_appointment_writes(true);
    let err = h
        .engine
        .reschedule(&appt.manage_token, new.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Internal(_)));

    // Compensation freed the new slot; the original booking stands.
    assert!(!h.store.slot(new.id).unwrap().booked);
    assert!(h.store.slot(old.id).unwrap().booked);
    let stored = h.store.appointment(appt.id).unwrap();
    assert_eq!(stored.slot_id, old.id);
    assert_eq!(stored.start_time, old.start_time);

    // Once writes recover the same reschedule goes through.
    h.store.set_fail_appointment_writes(false);
    let moved = h
        .engine
        .reschedule(&appt.manage_token, new.id)
        .await
        .unwrap();
    assert_eq!(moved.slot_id, new.id);
}

#[tokio::test]
async fn cancel_rolls_session_back_to_paid_and_frees_slot() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);

    let appt = h.engine.book(session.id, slot.id).await.unwrap();
    let cancelled = h.engine.cancel(&appt.manage_token).await.unwrap();

    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(!h.store.slot(slot.id).unwrap().booked);

    let stored = h.store.session(session.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Paid);
    assert!(stored.appointment_id.is_none());
    assert!(stored.scheduled_start.is_none());

    // Cancelling twice fails, rebooking the freed session works.
    let err = h.engine.cancel(&appt.manage_token).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
    let again = open_slot(&h, 6);
    h.engine.book(session.id, again.id).await.unwrap();
}

#[tokio::test]
async fn cancel_after_start_is_rejected() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    let appt = h.engine.book(session.id, slot.id).await.unwrap();

    h.clock.set(slot.start_time + Duration::minutes(10));
    let err = h.engine.cancel(&appt.manage_token).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

#[tokio::test]
async fn unknown_manage_token_is_not_found() {
    let h = harness();
    let err = h.engine.cancel("no-such-token").await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
    let err = h
        .engine
        .appointment_by_token("no-such-token")
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

// ============================================================================
// External calendar channel
// ============================================================================

#[tokio::test]
async fn external_booking_and_slot_booking_are_mutually_exclusive() {
    let h = harness();
    let session = paid_session(&h);
    let start = now() + Duration::days(2);

    let scheduled = h
        .engine
        .register_external_booking(session.id, start, start + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(scheduled.status, SessionStatus::Scheduled);
    assert_eq!(scheduled.channel, BookingChannel::ExternalCalendar);
    assert!(scheduled.appointment_id.is_none());

    // Slot-system booking now refuses the session.
    let slot = open_slot(&h, 3);
    let err = h.engine.book(session.id, slot.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
    assert!(!h.store.slot(slot.id).unwrap().booked);

    // And the reverse: a slot-booked session refuses external scheduling.
    let other = paid_session(&h);
    h.engine.book(other.id, slot.id).await.unwrap();
    let err = h
        .engine
        .register_external_booking(other.id, start, start + Duration::hours(1))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

// ============================================================================
// Claim / Unclaim
// ============================================================================

#[tokio::test]
async fn concurrent_claims_have_exactly_one_winner() {
    let h = harness();
    let session = paid_session(&h);

    let a = interviewer();
    let b = interviewer();
    let (ra, rb) = tokio::join!(
        h.engine.claim(a, session.id),
        h.engine.claim(b, session.id),
    );

    let winners = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(loser.unwrap_err(), BookingError::Conflict(_)));

    let stored = h.store.session(session.id).unwrap();
    assert!(stored.interviewer_id.is_some());
}

#[tokio::test]
async fn claim_requires_staff_and_unclaim_requires_admin() {
    let h = harness();
    let session = paid_session(&h);

    let err = h.engine.claim(customer(), session.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Unauthorized(_)));

    let iv = interviewer();
    h.engine.claim(iv, session.id).await.unwrap();

    let err = h.engine.unclaim(iv, session.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Unauthorized(_)));

    let cleared = h.engine.unclaim(admin(), session.id).await.unwrap();
    assert!(cleared.interviewer_id.is_none());
}

// ============================================================================
// Recording, processing, delivery
// ============================================================================

#[tokio::test]
async fn full_delivery_flow_ends_with_share_token_and_email() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    let iv = interviewer();

    h.engine.claim(iv, session.id).await.unwrap();
    h.engine.book(session.id, slot.id).await.unwrap();

    let uploading = h
        .engine
        .begin_recording_upload(iv, session.id)
        .await
        .unwrap();
    assert_eq!(uploading.processing, Some(ProcessingStatus::Uploading));

    let completed = h
        .engine
        .attach_recording(iv, session.id, "audio/a.mp3", "transcripts/a.json")
        .await
        .unwrap();
    assert_eq!(completed.status, SessionStatus::Completed);
    assert_eq!(completed.processing, Some(ProcessingStatus::Processing));

    // Not deliverable until alignment lands.
    let err = h.engine.deliver(iv, session.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    h.engine
        .store_alignment(iv, session.id, "{\"words\":[]}".to_string())
        .await
        .unwrap();
    let delivered = h.engine.deliver(iv, session.id).await.unwrap();

    assert_eq!(delivered.status, SessionStatus::Delivered);
    let token = delivered.share_token.unwrap();
    assert_eq!(token.len(), 43);

    let last = h.mailer.sent().pop().unwrap();
    assert_eq!(last.to, "nana@example.com");
    assert!(last.html_body.contains(&token));
}

#[tokio::test]
async fn upload_start_is_idempotent_but_blocked_once_processing() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    h.engine.book(session.id, slot.id).await.unwrap();

    // A stalled client may re-signal the start.
    h.engine
        .begin_recording_upload(admin(), session.id)
        .await
        .unwrap();
    h.engine
        .begin_recording_upload(admin(), session.id)
        .await
        .unwrap();

    h.engine
        .attach_recording(admin(), session.id, "a.mp3", "a.json")
        .await
        .unwrap();
    let err = h
        .engine
        .begin_recording_upload(admin(), session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

#[tokio::test]
async fn recording_is_restricted_to_assigned_interviewer_or_admin() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    let assigned = interviewer();
    h.engine.claim(assigned, session.id).await.unwrap();
    h.engine.book(session.id, slot.id).await.unwrap();

    let err = h
        .engine
        .attach_recording(interviewer(), session.id, "a.mp3", "a.json")
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Unauthorized(_)));

    // Admin passes even unassigned.
    h.engine
        .attach_recording(admin(), session.id, "a.mp3", "a.json")
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_processing_blocks_delivery() {
    let h = harness();
    let session = paid_session(&h);
    let slot = open_slot(&h, 3);
    h.engine.book(session.id, slot.id).await.unwrap();
    h.engine
        .attach_recording(admin(), session.id, "a.mp3", "a.json")
        .await
        .unwrap();
    h.engine
        .mark_processing_failed(admin(), session.id, "aligner timeout")
        .await
        .unwrap();

    let err = h.engine.deliver(admin(), session.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
}

// ============================================================================
// Payment intake
// ============================================================================

#[tokio::test]
async fn register_payment_validates_and_persists() {
    let h = harness();
    let err = h
        .engine
        .register_payment(UserId::new(), "  ", 14900)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));

    let err = h
        .engine
        .register_payment(UserId::new(), "x@example.com", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));

    let session = h
        .engine
        .register_payment(UserId::new(), "x@example.com", 14900)
        .await
        .unwrap();
    assert_eq!(session.status, SessionStatus::Paid);
    assert_eq!(h.store.session(session.id).unwrap().id, session.id);
}
