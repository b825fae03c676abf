//! Request-scoped context passed to handlers
//!
//! # Background vs request contexts
//!
//! [`Context::background()`] is an explicit marker for "no request in flight".
//! Handlers skip context extraction for it without looking at its contents.
//! Any context built with [`Context::new()`] is a request context, even when
//! it carries no fields.
//!
//! # Async-Safe Storage
//!
//! When the `async` feature is enabled, the ambient context uses
//! `tokio::task_local!` and survives across `.await` points in multi-thread
//! Tokio runtimes. Without it, the context lives in a `thread_local!`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Storage backend
// ---------------------------------------------------------------------------

#[cfg(feature = "async")]
mod storage {
    use super::{Arc, Context};
    use std::future::Future;

    tokio::task_local! {
        static CTX: Arc<Context>;
    }

    #[inline]
    pub fn current() -> Arc<Context> {
        CTX.try_with(Arc::clone)
            .unwrap_or_else(|_| Arc::new(Context::background()))
    }

    pub async fn with_ctx<F: Future>(ctx: Arc<Context>, f: F) -> F::Output {
        CTX.scope(ctx, f).await
    }

    pub fn with_ctx_sync<R>(ctx: Arc<Context>, f: impl FnOnce() -> R) -> R {
        CTX.sync_scope(ctx, f)
    }
}

#[cfg(not(feature = "async"))]
mod storage {
    use super::{Arc, Context};
    use std::cell::RefCell;

    thread_local! {
        static CTX: RefCell<Arc<Context>> = RefCell::new(Arc::new(Context::background()));
    }

    #[inline]
    pub fn current() -> Arc<Context> {
        CTX.with(|c| Arc::clone(&c.borrow()))
    }

    pub fn with_ctx_sync<R>(ctx: Arc<Context>, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Arc<Context>>);

        impl Drop for Restore {
            fn drop(&mut self) {
                if let Some(prev) = self.0.take() {
                    CTX.with(|cell| *cell.borrow_mut() = prev);
                }
            }
        }

        let prev = CTX.with(|cell| cell.replace(ctx));
        let _restore = Restore(Some(prev));
        f()
    }
}

// ---------------------------------------------------------------------------
// Context type
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Scope {
    Background,
    #[default]
    Request,
}

/// Request-scoped values for structured logging
///
/// Carries well-known identifiers plus free-form fields. Handlers pass it to
/// the configured [`ContextExtractor`](crate::ContextExtractor).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(skip)]
    scope: Scope,
    /// Request ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// User ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Session ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Additional fields
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new, empty request context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The background context: no request data, extraction is skipped
    #[must_use]
    pub fn background() -> Self {
        Self {
            scope: Scope::Background,
            ..Self::default()
        }
    }

    /// Whether this is the background marker
    #[inline]
    pub fn is_background(&self) -> bool {
        self.scope == Scope::Background
    }

    /// Set request ID
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.scope = Scope::Request;
        self.request_id = Some(id.into());
        self
    }

    /// Set user ID
    #[must_use]
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.scope = Scope::Request;
        self.user_id = Some(id.into());
        self
    }

    /// Set session ID
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.scope = Scope::Request;
        self.session_id = Some(id.into());
        self
    }

    /// Add a field. Values that fail to serialize are skipped.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.scope = Scope::Request;
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Look up a free-form field
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Get the ambient context (cheap `Arc::clone`).
    ///
    /// Returns the background context when no scope is active.
    #[inline]
    #[must_use]
    pub fn current() -> Arc<Self> {
        storage::current()
    }

    /// Run a synchronous closure with this context as the ambient one.
    ///
    /// Nested scopes shadow outer ones and restore on return.
    pub fn scope_sync<R>(self, f: impl FnOnce() -> R) -> R {
        storage::with_ctx_sync(Arc::new(self), f)
    }

    /// Run a future with this context as the ambient one.
    #[cfg(feature = "async")]
    pub async fn scope<F: std::future::Future>(self, f: F) -> F::Output {
        storage::with_ctx(Arc::new(self), f).await
    }
}
