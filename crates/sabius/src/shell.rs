// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sabius shell` command implementation.
//!
//! Runs the session supervisor against a console stand-in for the voice
//! framework: typed lines play the role of transcribed user turns, and the
//! shell shows what the real-time model would receive for each of them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sabius_agent::{Assistant, SessionSupervisor, install_signal_handler};
use sabius_config::SabiusConfig;
use sabius_context::PromptStats;
use sabius_core::{
    ChatItem, ChatRole, ConnectionState, HealthStatus, ModelSpec, RealtimeConnector,
    RealtimeModel, SabiusError, TurnHandler, VoiceRoom, VoiceSession,
};
use sabius_knowledge::{RelevanceScorer, load_scorer};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

const PREVIEW_CHARS: usize = 160;

/// Runs the `sabius shell` interactive REPL.
pub async fn run_shell(config: SabiusConfig) -> Result<(), SabiusError> {
    let scorer = Arc::new(load_scorer(&config.knowledge));
    let assistant = Arc::new(Assistant::from_config(&config, Arc::clone(&scorer)).await?);
    let max_sections = config.knowledge.max_sections;

    let (session_tx, session_rx) = watch::channel(None);
    let connector = ConsoleConnector { session_tx };
    let room = ConsoleRoom;
    let cancel = install_signal_handler();

    let supervisor = {
        let cancel = cancel.clone();
        let config = config.clone();
        let assistant = Arc::clone(&assistant);
        tokio::spawn(async move {
            let mut supervisor = SessionSupervisor::new(&config, assistant);
            supervisor.run(&room, &connector, cancel).await
        })
    };

    println!("{}", format!("{} shell", config.agent.name.to_lowercase()).bold().green());
    println!(
        "{} entries loaded. Type {} to exit, {} or {} to inspect.\n",
        scorer.store().len(),
        "/quit".yellow(),
        "/prompt".yellow(),
        "/chat".yellow()
    );

    let mut lines = spawn_reader(format!("{}> ", "tú".green()));
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let current = session_rx.borrow().clone();
                match current {
                    Some(session) => handle_line(&session, &scorer, max_sections, &line).await,
                    None => eprintln!("{}", "session not ready yet".yellow()),
                }
            }
            _ = cancel.cancelled() => break,
        }
    }

    cancel.cancel();
    match supervisor.await {
        Ok(result) => result,
        Err(e) => Err(SabiusError::Internal(format!("session task failed: {e}"))),
    }
}

/// Reads lines on a dedicated thread; the channel closes on `/quit`,
/// Ctrl+C or Ctrl+D.
fn spawn_reader(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("{}: failed to initialize readline: {e}", "error".red());
                return;
            }
        };
        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == "/quit" || trimmed == "/exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);
                    if tx.send(trimmed.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    break;
                }
            }
        }
    });
    rx
}

async fn handle_line(
    session: &ConsoleState,
    scorer: &RelevanceScorer,
    max_sections: usize,
    line: &str,
) {
    match line {
        "/prompt" => {
            let stats = PromptStats::of(session.instructions());
            println!(
                "{}",
                format!(
                    "instructions: {} characters, ~{} tokens, {} lines",
                    stats.characters, stats.estimated_tokens, stats.lines
                )
                .dimmed()
            );
        }
        "/chat" => {
            for item in session.chat() {
                println!("{} {}", format!("[{}]", item.role).cyan(), preview(&item.text));
            }
        }
        query => {
            let scored = scorer.score(query, max_sections);
            if scored.is_empty() {
                println!("{}", "no matching entries".dimmed());
            } else {
                let matched: Vec<String> = scored
                    .iter()
                    .map(|s| format!("{} ({})", s.entry.id, s.score))
                    .collect();
                println!("{} {}", "matched:".dimmed(), matched.join(", "));
            }

            let items = session.user_turn(query).await;
            match items.last() {
                Some(item) if item.role == ChatRole::System => println!(
                    "{} {}",
                    "context:".dimmed(),
                    preview(&item.text).dimmed()
                ),
                _ => println!("{}", "no additional context injected".dimmed()),
            }
            println!("{}", format!("chat context: {} items", items.len()).dimmed());
        }
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    match flat.char_indices().nth(PREVIEW_CHARS) {
        Some((offset, _)) => format!("{}…", &flat[..offset]),
        None => flat,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared between the running session and the REPL.
struct ConsoleState {
    handler: Arc<dyn TurnHandler>,
    instructions: String,
    chat: Mutex<Vec<ChatItem>>,
}

impl ConsoleState {
    fn instructions(&self) -> &str {
        &self.instructions
    }

    fn chat(&self) -> Vec<ChatItem> {
        lock(&self.chat).clone()
    }

    async fn user_turn(&self, text: &str) -> Vec<ChatItem> {
        let message = ChatItem::user(text);
        let mut chat = self.chat();
        chat.push(message.clone());
        let items = self.handler.on_user_turn_completed(chat, &message).await;
        *lock(&self.chat) = items.clone();
        items
    }
}

struct ConsoleRoom;

#[async_trait]
impl VoiceRoom for ConsoleRoom {
    fn name(&self) -> &str {
        "console"
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    async fn connect(&self) -> Result<(), SabiusError> {
        Ok(())
    }
}

struct ConsoleConnector {
    session_tx: watch::Sender<Option<Arc<ConsoleState>>>,
}

#[async_trait]
impl RealtimeConnector for ConsoleConnector {
    async fn create_model(&self, spec: &ModelSpec) -> Result<Box<dyn RealtimeModel>, SabiusError> {
        info!(model = spec.model.as_str(), voice = spec.voice.as_str(), "console model ready");
        Ok(Box::new(ConsoleModel {
            session_tx: self.session_tx.clone(),
        }))
    }
}

struct ConsoleModel {
    session_tx: watch::Sender<Option<Arc<ConsoleState>>>,
}

#[async_trait]
impl RealtimeModel for ConsoleModel {
    async fn start_session(
        &self,
        _room: &dyn VoiceRoom,
        instructions: &str,
        handler: Arc<dyn TurnHandler>,
    ) -> Result<Box<dyn VoiceSession>, SabiusError> {
        let state = Arc::new(ConsoleState {
            handler,
            instructions: instructions.to_string(),
            chat: Mutex::new(Vec::new()),
        });
        self.session_tx.send_replace(Some(state));
        Ok(Box::new(ConsoleSession))
    }
}

struct ConsoleSession;

#[async_trait]
impl VoiceSession for ConsoleSession {
    async fn generate_reply(&self, instructions: &str) -> Result<(), SabiusError> {
        println!("{} {}", "sabius>".green(), instructions.italic());
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, SabiusError> {
        Ok(HealthStatus::Healthy)
    }

    async fn stop(&self) -> Result<(), SabiusError> {
        debug!("console session stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "ñ".repeat(200);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
        assert_eq!(preview("a\nb"), "a b");
    }
}
