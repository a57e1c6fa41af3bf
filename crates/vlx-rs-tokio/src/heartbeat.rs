// crates/vlx-rs-tokio/src/heartbeat.rs

//! Keeps the gateway session alive.
//!
//! The gateway silently drops sessions without traffic. [`Heartbeat`] runs a
//! loop task that sends GW_GET_STATE_REQ every `timeout` and, after each
//! successful request, refreshes every blind with a status request (the
//! house status broadcast reports a wrong orientation value for blinds).
//!
//! Lifecycle: `Stopped -> Running` on [`Heartbeat::start`],
//! `Running -> Stopping -> Stopped` inside [`Heartbeat::stop`], which only
//! returns once the loop task has exited.

use crate::config::{ConfigError, HeartbeatConfig};
use crate::registry::NodeRegistry;
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use vlx_rs::api::{GetState, StatusRequest};
use vlx_rs::{ApiCall, DeviceKind, ProtocolError, Session};

/// Signals shared between a [`Heartbeat`] and one run of its loop task.
///
/// A fresh set is created on every start so nothing left over from a previous
/// run (e.g. an unconsumed wake permit) leaks into the next one.
#[derive(Debug, Default)]
struct LoopSignals {
    /// Single-slot wake event. `Notify` stores at most one permit.
    wake: Notify,
    stop_requested: AtomicBool,
}

impl LoopSignals {
    fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }
}

/// Periodic keep-alive supervisor.
///
/// Must be started from within a tokio runtime. Calling [`start`](Self::start)
/// while already running is a no-op. Dropping a running heartbeat aborts its
/// loop task; call [`stop`](Self::stop) for an orderly shutdown.
pub struct Heartbeat<S> {
    session: Arc<S>,
    nodes: NodeRegistry,
    timeout: Duration,
    signals: Arc<LoopSignals>,
    /// Completes when the loop has exited and its timer is gone.
    run_task: Option<JoinHandle<()>>,
}

impl<S> Heartbeat<S>
where
    S: Session + 'static,
{
    /// Creates a stopped heartbeat pulsing every `timeout`.
    ///
    /// A zero `timeout` is rejected: the loop would pulse back to back.
    pub fn new(session: Arc<S>, nodes: NodeRegistry, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue("heartbeat interval must be greater than 0"));
        }
        Ok(Self {
            session,
            nodes,
            timeout,
            signals: Arc::new(LoopSignals::default()),
            run_task: None,
        })
    }

    pub fn from_config(
        session: Arc<S>,
        nodes: NodeRegistry,
        config: &HeartbeatConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(session, nodes, config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_running(&self) -> bool {
        self.run_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Launches the loop task and returns immediately. The first pulse happens
    /// one `timeout` later.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("[HB] start() called while the heartbeat is running, ignoring.");
            return;
        }

        let signals = Arc::new(LoopSignals::default());
        self.signals = Arc::clone(&signals);
        self.run_task = Some(tokio::spawn(run_loop(
            Arc::clone(&self.session),
            self.nodes.clone(),
            self.timeout,
            signals,
        )));
        info!("[HB] Heartbeat started (interval {:?}).", self.timeout);
    }

    /// Stops the loop and waits until it has fully exited.
    ///
    /// A pulse that is already in flight runs to completion first. Returns
    /// immediately if the heartbeat is not running.
    ///
    /// The loop handle is only released once the loop has exited. If the
    /// returned future is dropped early, the heartbeat still counts as running
    /// and a later `stop()` (or `Drop`) finishes the job.
    pub async fn stop(&mut self) {
        let Some(task) = self.run_task.as_mut() else {
            debug!("[HB] stop() called while the heartbeat is stopped.");
            return;
        };

        self.signals.request_stop();
        let result = task.await;
        self.run_task = None;
        match result {
            Ok(()) => info!("[HB] Heartbeat stopped."),
            Err(e) if e.is_panic() => warn!("[HB] Heartbeat loop panicked: {}", e),
            Err(e) => debug!("[HB] Heartbeat loop ended early: {}", e),
        }
    }

    /// Runs one keep-alive cycle immediately, outside of the loop.
    pub async fn pulse(&self) -> Result<(), ProtocolError> {
        pulse(self.session.as_ref(), &self.nodes).await
    }
}

impl<S> Drop for Heartbeat<S> {
    fn drop(&mut self) {
        // Aborting the task drops its pending timer.
        if let Some(task) = self.run_task.take() {
            if !task.is_finished() {
                debug!("[HB] Heartbeat dropped while running, aborting loop task.");
            }
            task.abort();
        }
    }
}

/// Pulses every `timeout` until a stop is requested.
async fn run_loop<S: Session>(
    session: Arc<S>,
    nodes: NodeRegistry,
    timeout: Duration,
    signals: Arc<LoopSignals>,
) {
    while !signals.stop_requested() {
        // The cycle timer lives for one iteration only; leaving the select
        // drops it, so at most one timer is ever pending.
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {}
            _ = signals.wake.notified() => {}
        }
        if signals.stop_requested() {
            break;
        }

        // A failed pulse is retried on the next cycle, never fatal.
        if let Err(e) = pulse(session.as_ref(), &nodes).await {
            warn!("[HB] Pulse failed: {}", e);
        }
    }
    debug!("[HB] Heartbeat loop exited.");
}

/// One keep-alive cycle: GW_GET_STATE_REQ, then a status request per blind.
///
/// Only the state request decides the outcome. Status request failures are
/// logged per node and do not abort the remaining requests.
async fn pulse<S: Session>(session: &S, nodes: &NodeRegistry) -> Result<(), ProtocolError> {
    let mut get_state = GetState::new();
    session.do_api_call(&mut get_state).await?;
    if !get_state.success() {
        return Err(ProtocolError::CallFailed("Unable to send get state"));
    }
    trace!(
        "[HB] Gateway state {:?}/{:?}",
        get_state.gateway_state(),
        get_state.gateway_sub_state()
    );

    // The house status monitor delivers a wrong FP3 (orientation) value for
    // blinds; ask each of them directly.
    for node_id in nodes.ids_where(DeviceKind::is_blind) {
        let mut status_request = StatusRequest::new(session.next_session_id(), node_id);
        match session.do_api_call(&mut status_request).await {
            Ok(()) if status_request.success() => {
                trace!("[HB] Refreshed status of blind {}", node_id)
            }
            Ok(()) => warn!("[HB] Status request for blind {} was not confirmed", node_id),
            Err(e) => warn!("[HB] Status request for blind {} failed: {}", node_id, e),
        }
    }
    Ok(())
}
