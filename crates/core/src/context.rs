// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation build context, and the wrapped variant the scheduler
//! hands to each concurrently building chunk.
//!
//! A [`BuildContext`] is the root context for one `build` invocation. A
//! [`WrappedContext`] overlays it with a private, tombstone-aware local
//! store so a chunk's builders cannot see or clobber another chunk's
//! per-chunk user data, while writes to *global* keys still land on the
//! shared delegate.

use crate::config::BuildConfig;
use crate::message::{BuildMessage, MessageKind, MessageBus};
use crate::registries::{ClearedOutputRegistry, RemovedSources};
use crate::scope::Scope;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Raised by [`BuildContextApi::check_canceled`] once the cancel token has
/// been tripped.
#[derive(Debug, Error, Clone, Copy)]
#[error("build canceled")]
pub struct CanceledError;

/// A process-global cancellation token, polled at builder boundaries,
/// during async-task wait loops, and inside deletion loops.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A typed key into a context's user-data store. Two contexts using the
/// same `Key<T>` name address the same slot.
pub struct Key<T> {
    name: &'static str,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// `Key` is just a named slot descriptor; it is `Copy`/`Clone` regardless of `T`.
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Key<T> {}

type AnyValue = Arc<dyn Any + Send + Sync>;

/// A plain key→value map used for both the global store and a wrapped
/// context's local overlay. `None` is a tombstone: it shadows a delegate's
/// value for that key without the key ever being observed as absent from
/// `contains`.
#[derive(Default)]
struct DataStore {
    entries: parking_lot::RwLock<HashMap<&'static str, Option<AnyValue>>>,
}

impl DataStore {
    fn get(&self, key: &'static str) -> Option<AnyValue> {
        self.entries.read().get(key).cloned().flatten()
    }

    /// Returns `true` if this store has *any* entry (including a
    /// tombstone) for `key`, used by the wrapped context to decide whether
    /// to consult the delegate at all.
    fn has_entry(&self, key: &'static str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn put(&self, key: &'static str, value: Option<AnyValue>) {
        self.entries.write().insert(key, value);
    }
}

/// Root, per-invocation build context.
pub struct BuildContext {
    scope: Arc<dyn Scope>,
    cancel: CancelToken,
    bus: MessageBus,
    config: BuildConfig,
    global: DataStore,
    errors_detected: AtomicBool,
    /// Progress fraction encoded as bits of an f64, so it can be updated
    /// from any worker thread without a lock.
    done_bits: AtomicU64,
    cleared_outputs: ClearedOutputRegistry,
    removed_sources: RemovedSources,
}

impl BuildContext {
    pub fn new(scope: Arc<dyn Scope>, bus: MessageBus, config: BuildConfig) -> Self {
        Self {
            scope,
            cancel: CancelToken::new(),
            bus,
            config,
            global: DataStore::default(),
            errors_detected: AtomicBool::new(false),
            done_bits: AtomicU64::new(0),
            cleared_outputs: ClearedOutputRegistry::new(),
            removed_sources: RemovedSources::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn cleared_outputs(&self) -> &ClearedOutputRegistry {
        &self.cleared_outputs
    }

    pub fn removed_sources(&self) -> &RemovedSources {
        &self.removed_sources
    }
}

/// Common operations available on both [`BuildContext`] and
/// [`WrappedContext`].
pub trait BuildContextApi: Send + Sync {
    fn scope(&self) -> &dyn Scope;
    fn config(&self) -> &BuildConfig;
    fn check_canceled(&self) -> Result<(), CanceledError>;
    fn publish(&self, message: BuildMessage);

    fn get_local_any(&self, key: &'static str) -> Option<AnyValue>;
    fn put_local_any(&self, key: &'static str, value: Option<AnyValue>);
    fn get_global_any(&self, key: &'static str) -> Option<AnyValue>;
    fn put_global_any(&self, key: &'static str, value: Option<AnyValue>);

    fn errors_detected(&self) -> bool;
    fn mark_errors_detected(&self);
    fn clear_errors_detected(&self);

    fn done(&self) -> f64;
    /// Sets the progress fraction. Per §8 invariant 2, callers must never
    /// pass a value lower than the current `done()`.
    fn set_done(&self, value: f64);

    fn get<T: Send + Sync + 'static>(&self, key: Key<T>) -> Option<Arc<T>>
    where
        Self: Sized,
    {
        self.get_local_any(key.name())
            .and_then(|v| v.downcast::<T>().ok())
    }

    fn put<T: Send + Sync + 'static>(&self, key: Key<T>, value: T)
    where
        Self: Sized,
    {
        self.put_local_any(key.name(), Some(Arc::new(value)));
    }

    fn remove<T: Send + Sync + 'static>(&self, key: Key<T>)
    where
        Self: Sized,
    {
        self.put_local_any(key.name(), None);
    }

    fn get_global<T: Send + Sync + 'static>(&self, key: Key<T>) -> Option<Arc<T>>
    where
        Self: Sized,
    {
        self.get_global_any(key.name())
            .and_then(|v| v.downcast::<T>().ok())
    }

    fn put_global<T: Send + Sync + 'static>(&self, key: Key<T>, value: T)
    where
        Self: Sized,
    {
        self.put_global_any(key.name(), Some(Arc::new(value)));
    }
}

impl BuildContextApi for BuildContext {
    fn scope(&self) -> &dyn Scope {
        self.scope.as_ref()
    }

    fn config(&self) -> &BuildConfig {
        &self.config
    }

    fn check_canceled(&self) -> Result<(), CanceledError> {
        if self.cancel.is_canceled() {
            Err(CanceledError)
        } else {
            Ok(())
        }
    }

    fn publish(&self, message: BuildMessage) {
        if let BuildMessage::Compiler(ref m) = message {
            if m.kind == MessageKind::Error {
                self.mark_errors_detected();
            }
        }
        self.bus.publish(message);
    }

    // At the root, "local" and "global" address the same store: there is
    // no delegate to distinguish them from.
    fn get_local_any(&self, key: &'static str) -> Option<AnyValue> {
        self.global.get(key)
    }

    fn put_local_any(&self, key: &'static str, value: Option<AnyValue>) {
        self.global.put(key, value);
    }

    fn get_global_any(&self, key: &'static str) -> Option<AnyValue> {
        self.global.get(key)
    }

    fn put_global_any(&self, key: &'static str, value: Option<AnyValue>) {
        self.global.put(key, value);
    }

    fn errors_detected(&self) -> bool {
        self.errors_detected.load(Ordering::SeqCst)
    }

    fn mark_errors_detected(&self) {
        self.errors_detected.store(true, Ordering::SeqCst);
    }

    fn clear_errors_detected(&self) {
        self.errors_detected.store(false, Ordering::SeqCst);
    }

    fn done(&self) -> f64 {
        f64::from_bits(self.done_bits.load(Ordering::SeqCst))
    }

    fn set_done(&self, value: f64) {
        self.done_bits.store(value.to_bits(), Ordering::SeqCst);
    }
}

/// A context the scheduler hands to a single chunk's pipeline: it isolates
/// writes to per-chunk ("local") keys in a private store while passing
/// writes to "global" keys through to the delegate, and tracks its own
/// `errorsDetected` flag independent of the delegate's.
pub struct WrappedContext {
    delegate: Arc<BuildContext>,
    local: DataStore,
    errors_detected: AtomicBool,
    done_bits: AtomicU64,
}

impl WrappedContext {
    pub fn new(delegate: Arc<BuildContext>) -> Self {
        let done_bits = AtomicU64::new(delegate.done_bits.load(Ordering::SeqCst));
        Self {
            delegate,
            local: DataStore::default(),
            errors_detected: AtomicBool::new(false),
            done_bits,
        }
    }

    pub fn delegate(&self) -> &Arc<BuildContext> {
        &self.delegate
    }

    pub fn cleared_outputs(&self) -> &ClearedOutputRegistry {
        self.delegate.cleared_outputs()
    }

    pub fn removed_sources(&self) -> &RemovedSources {
        self.delegate.removed_sources()
    }
}

impl BuildContextApi for WrappedContext {
    fn scope(&self) -> &dyn Scope {
        self.delegate.scope()
    }

    fn config(&self) -> &BuildConfig {
        self.delegate.config()
    }

    fn check_canceled(&self) -> Result<(), CanceledError> {
        self.delegate.check_canceled()
    }

    fn publish(&self, message: BuildMessage) {
        if let BuildMessage::Compiler(ref m) = message {
            if m.kind == MessageKind::Error {
                self.mark_errors_detected();
            }
        }
        self.delegate.bus.publish(message);
    }

    fn get_local_any(&self, key: &'static str) -> Option<AnyValue> {
        if self.local.has_entry(key) {
            self.local.get(key)
        } else {
            self.delegate.get_local_any(key)
        }
    }

    fn put_local_any(&self, key: &'static str, value: Option<AnyValue>) {
        self.local.put(key, value);
    }

    fn get_global_any(&self, key: &'static str) -> Option<AnyValue> {
        self.delegate.get_global_any(key)
    }

    fn put_global_any(&self, key: &'static str, value: Option<AnyValue>) {
        self.delegate.put_global_any(key, value);
    }

    fn errors_detected(&self) -> bool {
        self.errors_detected.load(Ordering::SeqCst)
    }

    fn mark_errors_detected(&self) {
        self.errors_detected.store(true, Ordering::SeqCst);
    }

    fn clear_errors_detected(&self) {
        self.errors_detected.store(false, Ordering::SeqCst);
    }

    fn done(&self) -> f64 {
        f64::from_bits(self.done_bits.load(Ordering::SeqCst))
    }

    fn set_done(&self, value: f64) {
        self.done_bits.store(value.to_bits(), Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
