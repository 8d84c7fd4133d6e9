use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Lifetime of a view. Every request a view starts runs inside its scope;
/// once the scope is closed, pending continuations are dropped instead of
/// writing into a view that no longer exists.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope that closes with this one but can also be closed alone.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Drives `fut` unless the scope closes first, in which case the future
    /// is dropped and `Error::Cancelled` is returned.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_closed() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            out = fut => out,
        }
    }
}
