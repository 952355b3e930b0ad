//! Inline or background execution of blocking config operations.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::ConfigError;

/// Where a config operation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// Run on the calling thread; the returned task is already complete.
    #[default]
    Inline,
    /// Run on the tokio blocking pool; the returned task completes later.
    Background,
}

/// A config operation that has finished or is running in the background.
///
/// Dropping a background task detaches it; the operation still runs to
/// completion.
#[must_use = "a ConfigTask carries the operation's result"]
pub struct ConfigTask<T> {
    state: TaskState<T>,
}

enum TaskState<T> {
    Ready(Option<Result<T, ConfigError>>),
    Spawned(JoinHandle<Result<T, ConfigError>>),
}

// The result is never pinned in place, only moved out once ready.
impl<T> Unpin for ConfigTask<T> {}

impl<T> std::fmt::Debug for ConfigTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            TaskState::Ready(_) => "ready",
            TaskState::Spawned(_) => "spawned",
        };
        f.debug_struct("ConfigTask").field("state", &state).finish()
    }
}

impl<T: Send + 'static> ConfigTask<T> {
    /// Runs `op` according to `execution`.
    ///
    /// Background execution needs a running tokio runtime; without one the
    /// task resolves to [`ConfigError::NoRuntime`] and `op` is never called.
    pub fn run<F>(execution: Execution, op: F) -> Self
    where
        F: FnOnce() -> Result<T, ConfigError> + Send + 'static,
    {
        match execution {
            Execution::Inline => Self::ready(op()),
            Execution::Background => match tokio::runtime::Handle::try_current() {
                Ok(handle) => Self {
                    state: TaskState::Spawned(handle.spawn_blocking(op)),
                },
                Err(_) => Self::ready(Err(ConfigError::NoRuntime)),
            },
        }
    }
}

impl<T> ConfigTask<T> {
    /// Wraps an already computed result.
    pub fn ready(result: Result<T, ConfigError>) -> Self {
        Self {
            state: TaskState::Ready(Some(result)),
        }
    }

    /// Returns true if the result is available without waiting.
    pub fn is_ready(&self) -> bool {
        match &self.state {
            TaskState::Ready(_) => true,
            TaskState::Spawned(handle) => handle.is_finished(),
        }
    }
}

impl<T> Future for ConfigTask<T> {
    type Output = Result<T, ConfigError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            TaskState::Ready(result) => match result.take() {
                Some(result) => Poll::Ready(result),
                None => Poll::Ready(Err(ConfigError::TaskFailed(
                    "task polled after completion".to_string(),
                ))),
            },
            TaskState::Spawned(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) => Poll::Ready(Err(ConfigError::TaskFailed(e.to_string()))),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
