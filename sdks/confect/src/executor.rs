//! Blocking bridge between sync call variants and the async execution path.
//!
//! Synchronous SDK methods run their async counterpart to completion on an
//! [`Executor`]: either a caller-supplied Tokio runtime handle, or a shared
//! runtime the SDK lazily spawns once per process and keeps around for every
//! manager that needs it.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Builder, Handle, Runtime};

use crate::errors::SdkError;

/// Process-wide fallback runtime, spawned on first use.
static SHARED_RUNTIME: OnceLock<Arc<Runtime>> = OnceLock::new();

/// Executor driving blocking SDK call variants.
///
/// Blocking variants must not be invoked from inside an async context; doing
/// so panics in the underlying runtime.
#[derive(Debug, Clone)]
pub struct Executor {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Handle(Handle),
    Owned(Arc<Runtime>),
}

impl Executor {
    /// Bridge onto a caller-owned runtime.
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            kind: Kind::Handle(handle),
        }
    }

    /// The process-wide shared runtime, spawned lazily.
    pub(crate) fn shared() -> Result<Self, SdkError> {
        if let Some(rt) = SHARED_RUNTIME.get() {
            return Ok(Self {
                kind: Kind::Owned(rt.clone()),
            });
        }

        let rt = Builder::new_multi_thread()
            .worker_threads(3)
            .thread_name("confect-sdk")
            .enable_all()
            .build()
            .map_err(SdkError::setup)?;
        let rt = Arc::new(rt);

        // A racing thread may have installed its runtime first; use whichever
        // landed in the cell.
        let _ = SHARED_RUNTIME.set(rt.clone());
        let installed = SHARED_RUNTIME.get().cloned().unwrap_or(rt);
        Ok(Self {
            kind: Kind::Owned(installed),
        })
    }

    /// Run the future to completion, blocking the calling thread.
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        debug_assert!(
            Handle::try_current().is_err(),
            "blocking SDK variants must not be called from an async context"
        );
        match &self.kind {
            Kind::Handle(handle) => handle.block_on(fut),
            Kind::Owned(rt) => rt.block_on(fut),
        }
    }
}
