// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock real-time connector, model and voice session.
//!
//! [`MockConnector`] hands out sessions that follow a [`SessionScript`] and
//! record everything the assistant sends them in a [`SessionRecord`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sabius_core::{
    ChatItem, HealthStatus, ModelSpec, RealtimeConnector, RealtimeModel, SabiusError, TurnHandler,
    VoiceRoom, VoiceSession,
};

use crate::lock;

/// How one scripted session fails, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Connection,
    Session,
}

impl Failure {
    fn to_error(self, what: &str) -> SabiusError {
        match self {
            Failure::Connection => SabiusError::connection(format!("{what}: connection lost")),
            Failure::Session => SabiusError::session(format!("{what}: session rejected")),
        }
    }
}

/// Behaviour of the next session started through a [`MockConnector`].
#[derive(Debug, Clone, Default)]
pub struct SessionScript {
    /// `start_session` fails instead of returning a session.
    pub start_failure: Option<Failure>,
    /// Results of successive health checks; `Healthy` once exhausted.
    pub health: Vec<HealthStatus>,
    /// The greeting takes this long to complete.
    pub greeting_delay: Option<Duration>,
    /// The greeting fails outright.
    pub greeting_failure: Option<Failure>,
    /// `stop` returns an error (after recording the call).
    pub stop_failure: bool,
}

impl SessionScript {
    /// A session that reports `Unhealthy` on its first health check.
    pub fn unhealthy() -> Self {
        Self {
            health: vec![HealthStatus::Unhealthy("audio track lost".into())],
            ..Self::default()
        }
    }
}

/// Everything a mock session observed.
pub struct SessionRecord {
    instructions: String,
    handler: Arc<dyn TurnHandler>,
    replies: Mutex<Vec<String>>,
    chat: Mutex<Vec<ChatItem>>,
    chat_updates: AtomicU32,
    health_checks: AtomicU32,
    stops: AtomicU32,
}

impl SessionRecord {
    /// Instructions the session was started with.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Instructions passed to `generate_reply`, in order.
    pub fn replies(&self) -> Vec<String> {
        lock(&self.replies).clone()
    }

    /// The chat context the model currently sees.
    pub fn chat(&self) -> Vec<ChatItem> {
        lock(&self.chat).clone()
    }

    pub fn chat_updates(&self) -> u32 {
        self.chat_updates.load(Ordering::SeqCst)
    }

    pub fn health_checks(&self) -> u32 {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }

    /// Play a transcribed user turn the way the framework does: append the
    /// message, hand the context to the turn handler and install its result.
    pub async fn user_turn(&self, text: &str) -> Vec<ChatItem> {
        let message = ChatItem::user(text);
        let mut chat = self.chat();
        chat.push(message.clone());
        let items = self.handler.on_user_turn_completed(chat, &message).await;
        self.set_chat(items.clone());
        items
    }

    fn set_chat(&self, items: Vec<ChatItem>) {
        *lock(&self.chat) = items;
        self.chat_updates.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connector whose model creation fails a configurable number of times.
pub struct MockConnector {
    create_failures: AtomicU32,
    create_delay: Mutex<Option<Duration>>,
    create_calls: AtomicU32,
    specs: Mutex<Vec<ModelSpec>>,
    scripts: Arc<Mutex<VecDeque<SessionScript>>>,
    sessions: Arc<Mutex<Vec<Arc<SessionRecord>>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            create_failures: AtomicU32::new(0),
            create_delay: Mutex::new(None),
            create_calls: AtomicU32::new(0),
            specs: Mutex::new(Vec::new()),
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            sessions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next `n` `create_model` calls fail with a connection error.
    pub fn fail_next_creates(&self, n: u32) {
        self.create_failures.store(n, Ordering::SeqCst);
    }

    /// Delay every `create_model` call by `delay`.
    pub fn delay_creates(&self, delay: Duration) {
        *lock(&self.create_delay) = Some(delay);
    }

    /// Queue the script for the next started session. Unscripted sessions
    /// stay healthy.
    pub fn push_script(&self, script: SessionScript) {
        lock(&self.scripts).push_back(script);
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Specs passed to `create_model`, in order.
    pub fn specs(&self) -> Vec<ModelSpec> {
        lock(&self.specs).clone()
    }

    /// Records of every session started so far.
    pub fn sessions(&self) -> Vec<Arc<SessionRecord>> {
        lock(&self.sessions).clone()
    }

    /// The most recently started session.
    pub fn last_session(&self) -> Option<Arc<SessionRecord>> {
        lock(&self.sessions).last().cloned()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeConnector for MockConnector {
    async fn create_model(&self, spec: &ModelSpec) -> Result<Box<dyn RealtimeModel>, SabiusError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.specs).push(spec.clone());

        let delay = *lock(&self.create_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .create_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SabiusError::connection("realtime endpoint unreachable"));
        }

        Ok(Box::new(MockModel {
            scripts: Arc::clone(&self.scripts),
            sessions: Arc::clone(&self.sessions),
        }))
    }
}

struct MockModel {
    scripts: Arc<Mutex<VecDeque<SessionScript>>>,
    sessions: Arc<Mutex<Vec<Arc<SessionRecord>>>>,
}

#[async_trait]
impl RealtimeModel for MockModel {
    async fn start_session(
        &self,
        _room: &dyn VoiceRoom,
        instructions: &str,
        handler: Arc<dyn TurnHandler>,
    ) -> Result<Box<dyn VoiceSession>, SabiusError> {
        let script = lock(&self.scripts).pop_front().unwrap_or_default();
        if let Some(failure) = script.start_failure {
            return Err(failure.to_error("start session"));
        }

        let record = Arc::new(SessionRecord {
            instructions: instructions.to_string(),
            handler,
            replies: Mutex::new(Vec::new()),
            chat: Mutex::new(Vec::new()),
            chat_updates: AtomicU32::new(0),
            health_checks: AtomicU32::new(0),
            stops: AtomicU32::new(0),
        });
        lock(&self.sessions).push(Arc::clone(&record));

        Ok(Box::new(MockSession {
            health: Mutex::new(script.health.iter().cloned().collect()),
            script,
            record,
        }))
    }
}

struct MockSession {
    script: SessionScript,
    health: Mutex<VecDeque<HealthStatus>>,
    record: Arc<SessionRecord>,
}

#[async_trait]
impl VoiceSession for MockSession {
    async fn generate_reply(&self, instructions: &str) -> Result<(), SabiusError> {
        if let Some(delay) = self.script.greeting_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = self.script.greeting_failure {
            return Err(failure.to_error("generate reply"));
        }
        lock(&self.record.replies).push(instructions.to_string());
        Ok(())
    }


    async fn health_check(&self) -> Result<HealthStatus, SabiusError> {
        self.record.health_checks.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.health).pop_front().unwrap_or(HealthStatus::Healthy))
    }

    async fn stop(&self) -> Result<(), SabiusError> {
        self.record.stops.fetch_add(1, Ordering::SeqCst);
        if self.script.stop_failure {
            return Err(SabiusError::session("already closed"));
        }
        Ok(())
    }
}
