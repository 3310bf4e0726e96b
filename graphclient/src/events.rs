// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lifecycle events around statement execution
//!
//! Three signals are published by the client and by transactions:
//! - [`Signal::PreRun`] - statements are about to be sent to a connection
//! - [`Signal::PostRun`] - the connection returned results
//! - [`Signal::OnFailure`] - the connection raised a [`DatabaseError`]
//!
//! Dispatch is synchronous: every listener runs, in registration order, before
//! the emitting call continues. Events are read-only. Failure listeners vote
//! with an optional [`FailureDecision`]; the last vote wins and the error
//! propagates when nobody votes.

use chrono::{DateTime, Utc};
use log::trace;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::result::ResultCollection;
use crate::statement::Statement;

/// Well-known event signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    PreRun,
    PostRun,
    OnFailure,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::PreRun => "graphclient.pre_run",
            Signal::PostRun => "graphclient.post_run",
            Signal::OnFailure => "graphclient.on_failure",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Statements about to be executed
#[derive(Debug, Clone, Serialize)]
pub struct PreRunEvent {
    execution_id: Uuid,
    occurred_at: DateTime<Utc>,
    statements: Vec<Statement>,
}

impl PreRunEvent {
    pub fn new(execution_id: Uuid, statements: Vec<Statement>) -> Self {
        Self {
            execution_id,
            occurred_at: Utc::now(),
            statements,
        }
    }

    /// Identifier shared by all events of one execution
    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// Results of a successful execution
#[derive(Debug, Clone, Serialize)]
pub struct PostRunEvent {
    execution_id: Uuid,
    occurred_at: DateTime<Utc>,
    results: ResultCollection,
}

impl PostRunEvent {
    pub fn new(execution_id: Uuid, results: ResultCollection) -> Self {
        Self {
            execution_id,
            occurred_at: Utc::now(),
            results,
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn results(&self) -> &ResultCollection {
        &self.results
    }
}

/// Driver error raised by an execution
#[derive(Debug, Clone, Serialize)]
pub struct FailureEvent {
    execution_id: Uuid,
    occurred_at: DateTime<Utc>,
    error: DatabaseError,
}

impl FailureEvent {
    pub fn new(execution_id: Uuid, error: DatabaseError) -> Self {
        Self {
            execution_id,
            occurred_at: Utc::now(),
            error,
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn error(&self) -> &DatabaseError {
        &self.error
    }

    pub fn into_error(self) -> DatabaseError {
        self.error
    }
}

/// What should happen to a failed execution's error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureDecision {
    /// Return the error to the caller
    #[default]
    Propagate,
    /// Swallow the error; the caller gets no result
    Suppress,
}

/// Listener interface for all three signals; every method defaults to a no-op
pub trait EventSubscriber: Send + Sync {
    fn on_pre_run(&self, _event: &PreRunEvent) {}

    fn on_post_run(&self, _event: &PostRunEvent) {}

    /// Return `Some` to vote on the error's fate, `None` to abstain
    fn on_failure(&self, _event: &FailureEvent) -> Option<FailureDecision> {
        None
    }
}

type PreRunListener = Arc<dyn Fn(&PreRunEvent) + Send + Sync>;
type PostRunListener = Arc<dyn Fn(&PostRunEvent) + Send + Sync>;
type FailureListener = Arc<dyn Fn(&FailureEvent) -> Option<FailureDecision> + Send + Sync>;

/// Synchronous publish/subscribe channel for execution events
#[derive(Default)]
pub struct EventChannel {
    pre_run: RwLock<Vec<PreRunListener>>,
    post_run: RwLock<Vec<PostRunListener>>,
    on_failure: RwLock<Vec<FailureListener>>,
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("pre_run", &self.listener_count(Signal::PreRun))
            .field("post_run", &self.listener_count(Signal::PostRun))
            .field("on_failure", &self.listener_count(Signal::OnFailure))
            .finish()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pre_run<F>(&self, listener: F)
    where
        F: Fn(&PreRunEvent) + Send + Sync + 'static,
    {
        self.pre_run.write().push(Arc::new(listener));
    }

    pub fn on_post_run<F>(&self, listener: F)
    where
        F: Fn(&PostRunEvent) + Send + Sync + 'static,
    {
        self.post_run.write().push(Arc::new(listener));
    }

    pub fn on_failure<F>(&self, listener: F)
    where
        F: Fn(&FailureEvent) -> Option<FailureDecision> + Send + Sync + 'static,
    {
        self.on_failure.write().push(Arc::new(listener));
    }

    /// Register a subscriber on all three signals
    pub fn add_subscriber(&self, subscriber: Arc<dyn EventSubscriber>) {
        let s = Arc::clone(&subscriber);
        self.on_pre_run(move |event| s.on_pre_run(event));
        let s = Arc::clone(&subscriber);
        self.on_post_run(move |event| s.on_post_run(event));
        self.on_failure(move |event| subscriber.on_failure(event));
    }

    pub fn listener_count(&self, signal: Signal) -> usize {
        match signal {
            Signal::PreRun => self.pre_run.read().len(),
            Signal::PostRun => self.post_run.read().len(),
            Signal::OnFailure => self.on_failure.read().len(),
        }
    }

    pub fn dispatch_pre_run(&self, event: &PreRunEvent) {
        // Snapshot so listeners may register further listeners.
        let listeners = self.pre_run.read().clone();
        trace!("{} -> {} listener(s)", Signal::PreRun, listeners.len());
        for listener in listeners {
            listener(event);
        }
    }

    pub fn dispatch_post_run(&self, event: &PostRunEvent) {
        let listeners = self.post_run.read().clone();
        trace!("{} -> {} listener(s)", Signal::PostRun, listeners.len());
        for listener in listeners {
            listener(event);
        }
    }

    /// Run every failure listener and fold their votes
    pub fn dispatch_failure(&self, event: &FailureEvent) -> FailureDecision {
        let listeners = self.on_failure.read().clone();
        trace!("{} -> {} listener(s)", Signal::OnFailure, listeners.len());
        listeners
            .iter()
            .fold(FailureDecision::default(), |decision, listener| {
                listener(event).unwrap_or(decision)
            })
    }
}
