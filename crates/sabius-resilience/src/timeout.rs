// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::future::Future;
use std::time::Duration;

use sabius_core::SabiusError;

/// Await `fut`, failing with [`SabiusError::Timeout`] after `duration`.
pub async fn with_timeout<T, Fut>(duration: Duration, fut: Fut) -> Result<T, SabiusError>
where
    Fut: Future<Output = Result<T, SabiusError>>,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| SabiusError::Timeout { duration })?
}
