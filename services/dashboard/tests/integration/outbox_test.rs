use chrono::Utc;
use uuid::Uuid;

use siteplane_dashboard::domain::types::{DefaultOrg, OutboxEvent};
use siteplane_dashboard::usecase::outbox::{DispatchOutboxUseCase, MAX_ATTEMPTS};
use siteplane_dashboard::usecase::sync::ENROLL_DEFAULT_ORG;
use siteplane_domain::role::MembershipRole;

use crate::helpers::{DEFAULT_ORG_EXTERNAL_ID, MockEnrollmentPort, MockOutboxRepo};

fn enrollment_event(auth_user_id: &str, attempts: i32) -> OutboxEvent {
    OutboxEvent {
        id: Uuid::new_v4(),
        kind: ENROLL_DEFAULT_ORG.to_owned(),
        payload: serde_json::json!({ "auth_user_id": auth_user_id }),
        idempotency_key: format!("{ENROLL_DEFAULT_ORG}:{auth_user_id}"),
        attempts,
    }
}

#[tokio::test]
async fn should_enroll_user_and_mark_event_processed() {
    let outbox = MockOutboxRepo::new(vec![enrollment_event("user_01A", 0)]);
    let enrollment = MockEnrollmentPort::succeeding();

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment: enrollment.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let processed = usecase.execute(10).await.unwrap();
    assert_eq!(processed, 1);

    let calls = enrollment.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "user_01A");
    assert_eq!(calls[0].1, DEFAULT_ORG_EXTERNAL_ID);
    assert_eq!(calls[0].2, MembershipRole::Member);

    let rows = outbox.rows.lock().unwrap();
    assert!(rows[0].processed);
    assert!(!rows[0].failed);
}

#[tokio::test]
async fn should_schedule_retry_with_backoff_on_failure() {
    let outbox = MockOutboxRepo::new(vec![enrollment_event("user_01A", 0)]);

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment: MockEnrollmentPort::failing(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let processed = usecase.execute(10).await.unwrap();
    assert_eq!(processed, 0);

    let rows = outbox.rows.lock().unwrap();
    assert!(!rows[0].processed);
    assert!(!rows[0].failed, "first failure must not dead-letter");
    assert_eq!(rows[0].event.attempts, 1);
    assert!(rows[0].last_error.is_some());
    let next_attempt_at = rows[0].next_attempt_at.unwrap();
    assert!(
        next_attempt_at > Utc::now(),
        "retry must be scheduled in the future"
    );
}

#[tokio::test]
async fn should_not_redispatch_before_next_attempt() {
    let outbox = MockOutboxRepo::new(vec![enrollment_event("user_01A", 0)]);
    let enrollment = MockEnrollmentPort::failing();

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase.execute(10).await.unwrap();
    // Second cycle runs before the backoff elapses: nothing is due.
    usecase.execute(10).await.unwrap();

    let rows = outbox.rows.lock().unwrap();
    assert_eq!(rows[0].event.attempts, 1);
}

#[tokio::test]
async fn should_dead_letter_after_exhausting_retries() {
    let outbox = MockOutboxRepo::new(vec![enrollment_event("user_01A", MAX_ATTEMPTS - 1)]);

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment: MockEnrollmentPort::failing(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase.execute(10).await.unwrap();

    let rows = outbox.rows.lock().unwrap();
    assert!(rows[0].failed, "event should be kept as a dead-letter row");
    assert!(!rows[0].processed);
    assert!(rows[0].last_error.is_some());
}

#[tokio::test]
async fn should_dead_letter_events_of_unknown_kind_eventually() {
    let event = OutboxEvent {
        id: Uuid::new_v4(),
        kind: "mystery".to_owned(),
        payload: serde_json::json!({}),
        idempotency_key: "mystery:1".to_owned(),
        attempts: MAX_ATTEMPTS - 1,
    };
    let outbox = MockOutboxRepo::new(vec![event]);
    let enrollment = MockEnrollmentPort::succeeding();

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment: enrollment.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase.execute(10).await.unwrap();

    let rows = outbox.rows.lock().unwrap();
    assert!(rows[0].failed);
    assert!(enrollment.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_process_remaining_events_when_one_fails() {
    let failing = OutboxEvent {
        id: Uuid::new_v4(),
        kind: "mystery".to_owned(),
        payload: serde_json::json!({}),
        idempotency_key: "mystery:2".to_owned(),
        attempts: 0,
    };
    let outbox = MockOutboxRepo::new(vec![failing, enrollment_event("user_01A", 0)]);
    let enrollment = MockEnrollmentPort::succeeding();

    let usecase = DispatchOutboxUseCase {
        outbox: outbox.clone(),
        enrollment: enrollment.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let processed = usecase.execute(10).await.unwrap();
    assert_eq!(processed, 1);
    assert_eq!(enrollment.calls.lock().unwrap().len(), 1);
}
