//! Outbox dispatcher.
//!
//! Drains due outbox events and performs the corresponding identity-provider
//! call. Failures retry with exponential backoff up to [`MAX_ATTEMPTS`],
//! after which the event is kept as a dead-letter row (`failed_at` set)
//! instead of being silently lost.

use chrono::{Duration, Utc};
use tracing::{error, warn};

use siteplane_domain::role::MembershipRole;

use crate::domain::repository::{EnrollmentPort, OutboxRepository};
use crate::domain::types::{DefaultOrg, OutboxEvent};
use crate::error::DashboardError;
use crate::usecase::sync::ENROLL_DEFAULT_ORG;

/// Attempts before an event is dead-lettered.
pub const MAX_ATTEMPTS: i32 = 8;

/// Events fetched per dispatch cycle.
pub const DEFAULT_BATCH_SIZE: u64 = 20;

const BASE_BACKOFF_SECS: i64 = 30;

pub struct DispatchOutboxUseCase<R, E>
where
    R: OutboxRepository,
    E: EnrollmentPort,
{
    pub outbox: R,
    pub enrollment: E,
    pub default_org: DefaultOrg,
}

impl<R, E> DispatchOutboxUseCase<R, E>
where
    R: OutboxRepository,
    E: EnrollmentPort,
{
    /// Dispatch one batch. Returns the number of events processed successfully.
    pub async fn execute(&self, batch_size: u64) -> Result<usize, DashboardError> {
        let due = self.outbox.fetch_due(batch_size).await?;
        let mut processed = 0;
        for event in due {
            match self.dispatch(&event).await {
                Ok(()) => {
                    self.outbox.mark_processed(event.id).await?;
                    processed += 1;
                }
                Err(e) => {
                    let attempts = event.attempts + 1;
                    let message = e.to_string();
                    if attempts >= MAX_ATTEMPTS {
                        error!(
                            id = %event.id,
                            kind = %event.kind,
                            error = %message,
                            "outbox event exhausted retries, dead-lettering"
                        );
                        self.outbox.mark_failed(event.id, &message).await?;
                    } else {
                        warn!(
                            id = %event.id,
                            kind = %event.kind,
                            attempt = attempts,
                            error = %message,
                            "outbox dispatch failed, scheduling retry"
                        );
                        let next_attempt_at = Utc::now() + Duration::seconds(backoff_secs(attempts));
                        self.outbox
                            .record_failure(event.id, &message, next_attempt_at)
                            .await?;
                    }
                }
            }
        }
        Ok(processed)
    }

    async fn dispatch(&self, event: &OutboxEvent) -> Result<(), DashboardError> {
        match event.kind.as_str() {
            ENROLL_DEFAULT_ORG => {
                let auth_user_id = event
                    .payload
                    .get("auth_user_id")
                    .and_then(|v| v.as_str())
                    .ok_or(DashboardError::MissingData)?;
                self.enrollment
                    .create_membership(
                        auth_user_id,
                        self.default_org.as_str(),
                        MembershipRole::Member,
                    )
                    .await
            }
            other => Err(DashboardError::Internal(anyhow::anyhow!(
                "unknown outbox event kind: {other}"
            ))),
        }
    }
}

/// Exponential backoff: 60s, 120s, 240s, ... capped by the shift bound.
fn backoff_secs(attempts: i32) -> i64 {
    BASE_BACKOFF_SECS * (1i64 << attempts.clamp(1, 10))
}
