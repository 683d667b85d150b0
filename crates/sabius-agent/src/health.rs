// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic health monitoring of a running voice session.

use std::time::Duration;

use sabius_core::{ConnectionState, HealthStatus, SabiusError, VoiceRoom, VoiceSession};
use sabius_resilience::with_timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Checks the room and session every `interval` until `cancel` fires.
///
/// Returns `Ok(())` on cancellation. A failed reconnect or an unhealthy
/// session ends monitoring with a [`SabiusError::Connection`] so the
/// supervisor can recover.
pub async fn monitor_health(
    room: &dyn VoiceRoom,
    session: &dyn VoiceSession,
    interval: Duration,
    reconnect_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), SabiusError> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("session monitoring cancelled");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
        check_health(room, session, reconnect_timeout).await?;
    }
}

/// One health check: reconnect the room if it dropped, then query the session.
pub async fn check_health(
    room: &dyn VoiceRoom,
    session: &dyn VoiceSession,
    reconnect_timeout: Duration,
) -> Result<HealthStatus, SabiusError> {
    if room.connection_state() == ConnectionState::Disconnected {
        warn!(room = room.name(), "room disconnected, attempting to reconnect");
        with_timeout(reconnect_timeout, room.connect())
            .await
            .map_err(|e| into_connection_error("room reconnect failed", e))?;
        info!(room = room.name(), "room reconnected");
    }

    let status = session
        .health_check()
        .await
        .map_err(|e| into_connection_error("session health check failed", e))?;
    match &status {
        HealthStatus::Healthy => debug!("session health check passed"),
        HealthStatus::Degraded(reason) => warn!(reason = reason.as_str(), "session degraded"),
        HealthStatus::Unhealthy(reason) => {
            error!(reason = reason.as_str(), "session unhealthy");
            return Err(SabiusError::connection(format!("session unhealthy: {reason}")));
        }
    }
    Ok(status)
}

/// Keeps connection errors as they are and wraps anything else as one,
/// so the supervisor treats it as recoverable.
pub(crate) fn into_connection_error(what: &str, e: SabiusError) -> SabiusError {
    if e.is_retryable() {
        return e;
    }
    SabiusError::Connection {
        message: format!("{what}: {e}"),
        source: Some(Box::new(e)),
    }
}
