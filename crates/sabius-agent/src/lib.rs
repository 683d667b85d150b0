// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice session supervision for the Sabius assistant.
//!
//! - [`Assistant`]: session instructions and per-turn chat context
//! - [`SessionSupervisor`]: model creation with retry, greeting, health
//!   monitoring, and recovery from connection loss
//! - [`install_signal_handler`]: SIGINT/SIGTERM to a cancellation token

pub mod assistant;
pub mod health;
pub mod session;
pub mod shutdown;

pub use assistant::Assistant;
pub use health::{check_health, monitor_health};
pub use session::{SessionState, SessionSupervisor};
pub use shutdown::install_signal_handler;
