// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session tests.
//!
//! `TestHarness` assembles the knowledge store, prompt assembler, assistant
//! and session supervisor over a fixture directory and mock framework
//! adapters.

use std::sync::Arc;

use sabius_agent::{Assistant, SessionSupervisor};
use sabius_config::SabiusConfig;
use sabius_config::model::{AgentConfig, RetryConfig, SessionConfig};
use sabius_core::SabiusError;
use sabius_knowledge::{RelevanceScorer, load_scorer};
use tokio_util::sync::CancellationToken;

use crate::fixtures::KnowledgeFixture;
use crate::mock_realtime::{MockConnector, SessionScript};
use crate::mock_room::MockRoom;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    fixture: Option<KnowledgeFixture>,
    system_prompt: Option<String>,
    retry: RetryConfig,
    session: SessionConfig,
    create_failures: u32,
    scripts: Vec<SessionScript>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            fixture: None,
            system_prompt: None,
            retry: RetryConfig::default(),
            session: SessionConfig::default(),
            create_failures: 0,
            scripts: Vec::new(),
        }
    }

    /// Use `fixture` instead of the Convergence Lab data set.
    pub fn with_fixture(mut self, fixture: KnowledgeFixture) -> Self {
        self.fixture = Some(fixture);
        self
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Fail the first `n` model creations with connection errors.
    pub fn with_create_failures(mut self, n: u32) -> Self {
        self.create_failures = n;
        self
    }

    /// Scripts for successive sessions, in start order.
    pub fn with_scripts(mut self, scripts: Vec<SessionScript>) -> Self {
        self.scripts = scripts;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SabiusError> {
        let fixture = match self.fixture {
            Some(f) => f,
            None => KnowledgeFixture::convergence_lab()
                .map_err(|e| SabiusError::Internal(format!("failed to write fixture: {e}")))?,
        };

        let config = SabiusConfig {
            agent: AgentConfig {
                system_prompt: self.system_prompt,
                ..AgentConfig::default()
            },
            knowledge: fixture.knowledge_config(),
            retry: self.retry,
            session: self.session,
            ..SabiusConfig::default()
        };

        let scorer = Arc::new(load_scorer(&config.knowledge));
        let assistant = Arc::new(Assistant::from_config(&config, Arc::clone(&scorer)).await?);

        let connector = Arc::new(MockConnector::new());
        connector.fail_next_creates(self.create_failures);
        for script in self.scripts {
            connector.push_script(script);
        }

        Ok(TestHarness {
            config,
            scorer,
            assistant,
            connector,
            room: Arc::new(MockRoom::default()),
            _fixture: fixture,
        })
    }
}

/// A complete test environment with mock adapters and fixture data.
pub struct TestHarness {
    pub config: SabiusConfig,
    pub scorer: Arc<RelevanceScorer>,
    pub assistant: Arc<Assistant>,
    pub connector: Arc<MockConnector>,
    pub room: Arc<MockRoom>,
    _fixture: KnowledgeFixture,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh supervisor over the harness assistant and config.
    pub fn supervisor(&self) -> SessionSupervisor {
        SessionSupervisor::new(&self.config, Arc::clone(&self.assistant))
    }

    /// Run a supervisor to completion with `cancel`.
    pub async fn run_session(
        &self,
        cancel: CancellationToken,
    ) -> (SessionSupervisor, Result<(), SabiusError>) {
        let mut supervisor = self.supervisor();
        let result = supervisor
            .run(self.room.as_ref(), self.connector.as_ref(), cancel)
            .await;
        (supervisor, result)
    }
}
