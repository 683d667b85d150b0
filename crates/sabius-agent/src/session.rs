// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervised voice session with automatic recovery.
//!
//! Each attempt goes through: Connecting -> Greeting -> Active. A connection
//! failure moves the supervisor to Recovering, and after a backoff delay it
//! connects again. Any other failure, exhausted attempts, or cancellation
//! end in Stopped.

use std::sync::Arc;
use std::time::Duration;

use sabius_config::{QueryKind, SabiusConfig};
use sabius_core::{
    ModelSpec, RealtimeConnector, RealtimeModel, SabiusError, TurnHandler, VoiceRoom,
    VoiceSession,
};
use sabius_resilience::{BackoffPolicy, retry_with_backoff, with_timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::assistant::Assistant;
use crate::health::{into_connection_error, monitor_health};

/// States in the session FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started yet.
    Idle,
    /// Creating the model and starting the session.
    Connecting,
    /// Waiting for the initial greeting.
    Greeting,
    /// Session running, health monitored.
    Active,
    /// Backing off after a connection failure.
    Recovering,
    /// Finished, successfully or not.
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Greeting => write!(f, "greeting"),
            SessionState::Active => write!(f, "active"),
            SessionState::Recovering => write!(f, "recovering"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Keeps one voice session alive in a room, recovering from connection loss.
pub struct SessionSupervisor {
    assistant: Arc<Assistant>,
    state: SessionState,
    model_spec: ModelSpec,
    greeting_instructions: String,
    greeting_timeout: Duration,
    connection_timeout: Duration,
    health_interval: Duration,
    /// Retries model creation within one session attempt.
    model_policy: BackoffPolicy,
    /// Attempts and delays for whole-session recovery.
    recovery_policy: BackoffPolicy,
}

impl SessionSupervisor {
    pub fn new(config: &SabiusConfig, assistant: Arc<Assistant>) -> Self {
        let timeouts = config.timeouts.effective();
        let policy = BackoffPolicy::from(&config.retry);
        Self {
            assistant,
            state: SessionState::Idle,
            model_spec: ModelSpec {
                model: config.realtime.model.clone(),
                voice: config.realtime.voice.clone(),
                temperature: config.realtime.temperature,
                max_response_tokens: timeouts.max_response_tokens,
            },
            greeting_instructions: config.agent.greeting_instructions.clone(),
            greeting_timeout: timeouts.timeout_for(QueryKind::Greeting),
            connection_timeout: timeouts.connection_timeout(),
            health_interval: timeouts.health_check_interval(),
            model_policy: policy.clone(),
            recovery_policy: policy,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn assistant(&self) -> &Arc<Assistant> {
        &self.assistant
    }

    pub fn model_spec(&self) -> &ModelSpec {
        &self.model_spec
    }

    /// Runs sessions in `room` until cancelled or a failure is not recoverable.
    ///
    /// Connection failures are retried up to the configured attempts with
    /// exponential backoff; the last one is returned. Other errors are
    /// returned immediately. Every started session is stopped before this
    /// returns; errors from stopping are ignored.
    pub async fn run(
        &mut self,
        room: &dyn VoiceRoom,
        connector: &dyn RealtimeConnector,
        cancel: CancellationToken,
    ) -> Result<(), SabiusError> {
        let attempts = self.recovery_policy.attempts();

        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                break;
            }
            info!(attempt, max_attempts = attempts, room = room.name(), "starting voice session");

            let mut session: Option<Box<dyn VoiceSession>> = None;
            let outcome = self.run_attempt(room, connector, &cancel, &mut session).await;

            match outcome {
                Ok(()) => {
                    stop_quietly(session.as_deref()).await;
                    self.transition(SessionState::Stopped);
                    info!("voice session stopped");
                    return Ok(());
                }
                Err(e) if e.is_retryable() => {
                    error!(attempt, error = %e, "connection error during voice session");
                    stop_quietly(session.as_deref()).await;

                    if attempt == attempts {
                        error!("failed to maintain a stable connection after all attempts");
                        self.transition(SessionState::Stopped);
                        return Err(e);
                    }

                    self.transition(SessionState::Recovering);
                    let delay = self.recovery_policy.delay_for(attempt - 1);
                    info!(delay_ms = delay.as_millis() as u64, "retrying voice session");
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("shutdown requested during recovery");
                            self.transition(SessionState::Stopped);
                            return Ok(());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => {
                    error!(attempt, error = %e, "unexpected error during voice session");
                    stop_quietly(session.as_deref()).await;
                    self.transition(SessionState::Stopped);
                    return Err(e);
                }
            }
        }

        self.transition(SessionState::Stopped);
        Ok(())
    }

    /// One session attempt. The started session is left in `slot` so the
    /// caller can stop it whatever the outcome.
    async fn run_attempt(
        &mut self,
        room: &dyn VoiceRoom,
        connector: &dyn RealtimeConnector,
        cancel: &CancellationToken,
        slot: &mut Option<Box<dyn VoiceSession>>,
    ) -> Result<(), SabiusError> {
        self.transition(SessionState::Connecting);

        let model = tokio::select! {
            _ = cancel.cancelled() => {
                info!("shutdown requested while creating the realtime model");
                return Ok(());
            }
            model = self.create_model(connector) => model?,
        };
        let instructions = self.assistant.instructions();
        let handler: Arc<dyn TurnHandler> = self.assistant.clone();
        let started = model.start_session(room, &instructions, handler).await?;
        let session: &dyn VoiceSession = &**slot.insert(started);
        info!(
            room = room.name(),
            instructions_chars = instructions.chars().count(),
            "voice session started"
        );

        self.transition(SessionState::Greeting);
        self.greet(session).await;

        self.transition(SessionState::Active);
        monitor_health(
            room,
            session,
            self.health_interval,
            self.connection_timeout,
            cancel,
        )
        .await
    }

    async fn create_model(
        &self,
        connector: &dyn RealtimeConnector,
    ) -> Result<Box<dyn RealtimeModel>, SabiusError> {
        let spec = &self.model_spec;
        let timeout = self.connection_timeout;
        let model = retry_with_backoff(&self.model_policy, "create realtime model", move |attempt| async move {
            debug!(attempt, model = spec.model.as_str(), "creating realtime model");
            with_timeout(timeout, connector.create_model(spec))
                .await
                .map_err(|e| match e {
                    SabiusError::Timeout { .. } => into_connection_error("model creation", e),
                    other => other,
                })
        })
        .await?;
        info!(model = spec.model.as_str(), voice = spec.voice.as_str(), "realtime model created");
        Ok(model)
    }

    /// Asks for the opening greeting. Failures are logged; the session stays up.
    async fn greet(&self, session: &dyn VoiceSession) {
        match with_timeout(
            self.greeting_timeout,
            session.generate_reply(&self.greeting_instructions),
        )
        .await
        {
            Ok(()) => info!("initial greeting generated"),
            Err(SabiusError::Timeout { duration }) => warn!(
                timeout_secs = duration.as_secs_f64(),
                "initial greeting timed out, session remains active"
            ),
            Err(e) => warn!(error = %e, "failed to generate initial greeting, session remains active"),
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "session state changed");
            self.state = next;
        }
    }
}

async fn stop_quietly(session: Option<&dyn VoiceSession>) {
    if let Some(session) = session
        && let Err(e) = session.stop().await
    {
        debug!(error = %e, "ignoring error while stopping session");
    }
}
