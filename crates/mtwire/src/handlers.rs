// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registration and dispatch for a single kind of event.
//!
//! A [`HandlerArena`] owns every handler registered for one event type and
//! walks them in registration order when [`HandlerArena::dispatch`] is
//! called. Each handler can be pointed at a [`crate::filters::Filter`], can
//! be paused and resumed without losing its place in line, and can be
//! stopped permanently. [`HandlerHandle`] is what callers get back from
//! registration; it only holds a weak reference to the arena so dropping
//! every handle for an event does not keep the arena's `Vec` pinned open
//! through a reference cycle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use log::warn;
use tokio::sync::Notify;

use crate::errors::DispatchError;
use crate::filters::Filter;

/// A callback registered against an event of type `T`.
pub type Callback<T> = Arc<dyn Fn(&T) -> Result<(), DispatchError> + Send + Sync>;

/// An async boolean condition that can be waited on without busy-polling.
///
/// Built the way `tokio::sync::Notify`'s own docs recommend for a
/// "wait until a flag is set" condition: the `Notified` future is created
/// before the flag is checked, so a `set()` that races with `wait()` can
/// never be missed.
struct Gate {
    open: AtomicBool,
    notify: Notify,
}

impl Gate {
    fn new(open: bool) -> Self {
        Self { open: AtomicBool::new(open), notify: Notify::new() }
    }

    fn set(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn clear(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_open() {
                return;
            }
            notified.await;
        }
    }
}

/// One registered handler: a name, an optional filter, a callback, and its
/// own pause/stop state.
pub struct Handler<T> {
    id: u64,
    name: String,
    filter: Option<Filter<T>>,
    callback: Callback<T>,
    stopped: AtomicBool,
    gate: Gate,
}

impl<T> Handler<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        !self.gate.is_open()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn start(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.gate.clear();
    }

    pub fn resume(&self) {
        self.gate.set();
    }

    /// Runs this handler's callback against `value`, unless it is stopped
    /// or its filter rejects the value. Waits for the handler to be resumed
    /// if it is currently paused.
    async fn execute(&self, value: &T) -> Result<(), DispatchError> {
        if self.is_stopped() {
            return Ok(());
        }
        if let Some(filter) = &self.filter {
            if !filter.evaluate(value).await {
                return Ok(());
            }
        }
        self.gate.wait().await;
        (self.callback)(value)
    }
}

struct ArenaState<T> {
    next_id: AtomicU64,
    handlers: Mutex<Vec<Arc<Handler<T>>>>,
}

/// Owns every handler registered for one event type.
pub struct HandlerArena<T>(Arc<ArenaState<T>>);

impl<T> Clone for HandlerArena<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> HandlerArena<T> {
    pub fn new() -> Self {
        Self(Arc::new(ArenaState { next_id: AtomicU64::new(1), handlers: Mutex::new(Vec::new()) }))
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        filter: Option<Filter<T>>,
        callback: Callback<T>,
    ) -> HandlerHandle<T> {
        let id = self.0.next_id.fetch_add(1, Ordering::Relaxed);
        let handler = Arc::new(Handler {
            id,
            name: name.into(),
            filter,
            callback,
            stopped: AtomicBool::new(false),
            gate: Gate::new(true),
        });
        self.0.handlers.lock().unwrap().push(handler.clone());
        HandlerHandle { handler, arena: Arc::downgrade(&self.0) }
    }

    /// Runs every registered handler against `value` in registration order.
    /// A handler returning [`DispatchError::StopPropagation`] stops the
    /// remaining handlers from seeing this value; any other error is logged
    /// and dispatch continues.
    pub async fn dispatch(&self, value: &T) {
        let handlers: Vec<_> = self.0.handlers.lock().unwrap().clone();
        for handler in handlers {
            match handler.execute(value).await {
                Ok(()) => {}
                Err(DispatchError::StopPropagation) => break,
                Err(DispatchError::Handler(message)) => {
                    warn!("handler {:?} failed: {message}", handler.name());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.handlers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reference to a registered handler, returned from
/// [`HandlerArena::register`]. Does not keep the arena alive.
pub struct HandlerHandle<T> {
    handler: Arc<Handler<T>>,
    arena: Weak<ArenaState<T>>,
}

impl<T> Clone for HandlerHandle<T> {
    fn clone(&self) -> Self {
        Self { handler: self.handler.clone(), arena: self.arena.clone() }
    }
}

impl<T> HandlerHandle<T> {
    pub fn id(&self) -> u64 {
        self.handler.id()
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    pub fn pause(&self) {
        self.handler.pause();
    }

    pub fn resume(&self) {
        self.handler.resume();
    }

    pub fn stop(&self) {
        self.handler.stop();
    }

    pub fn start(&self) {
        self.handler.start();
    }

    pub fn is_paused(&self) -> bool {
        self.handler.is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.handler.is_stopped()
    }

    /// Removes this handler from its arena. Returns `false` if the arena
    /// has already been dropped or the handler was already removed.
    pub fn unregister(&self) -> bool {
        let Some(state) = self.arena.upgrade() else {
            return false;
        };
        let mut handlers = state.handlers.lock().unwrap();
        let before = handlers.len();
        handlers.retain(|handler| handler.id() != self.handler.id());
        handlers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn arena() -> HandlerArena<i32> {
        HandlerArena::new()
    }

    #[tokio::test]
    async fn dispatch_runs_registered_handlers_in_order() {
        let arena = arena();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            arena.register(format!("h{tag}"), None, Arc::new(move |_: &i32| {
                order.lock().unwrap().push(tag);
                Ok(())
            }));
        }
        arena.dispatch(&1).await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn stop_propagation_halts_remaining_handlers() {
        let arena = arena();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_second = ran.clone();
        arena.register("first", None, Arc::new(|_: &i32| Err(DispatchError::StopPropagation)));
        arena.register("second", None, Arc::new(move |_: &i32| {
            ran_second.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        arena.dispatch(&1).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn filter_skips_non_matching_values() {
        let arena = arena();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();
        let filter = Filter::eq_by(|n: &i32| *n as i64, 7);
        arena.register("only-sevens", Some(filter), Arc::new(move |_: &i32| {
            ran_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        arena.dispatch(&1).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        arena.dispatch(&7).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stopped_handler_never_runs_again() {
        let arena = arena();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();
        let handle = arena.register("once", None, Arc::new(move |_: &i32| {
            ran_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        handle.stop();
        arena.dispatch(&1).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unregister_removes_handler_and_shrinks_arena() {
        let arena = arena();
        let handle = arena.register("temp", None, Arc::new(|_: &i32| Ok(())));
        assert_eq!(arena.len(), 1);
        assert!(handle.unregister());
        assert_eq!(arena.len(), 0);
        assert!(!handle.unregister());
    }

    #[tokio::test]
    async fn paused_handler_waits_until_resumed() {
        let arena = arena();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();
        let handle = arena.register("pausable", None, Arc::new(move |_: &i32| {
            ran_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        handle.pause();
        let arena_clone = arena.clone();
        let dispatched = tokio::spawn(async move {
            arena_clone.dispatch(&1).await;
        });
        tokio::task::yield_now().await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        handle.resume();
        dispatched.await.unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
