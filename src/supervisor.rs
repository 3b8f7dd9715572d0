//! Lifecycle of the binding between a local proxy and one remote profile service.
//!
//! A [ConnectionSupervisor] keeps at most one binding alive while the adapter is powered
//! and tears it down when the adapter goes off, the remote process dies, or the
//! supervisor is shut down. Binding itself is performed by a [ServiceBinder], which
//! reports back through the [ServiceConnection] it was handed.
//!
//! Lifecycle: `Unbound -> Binding -> Bound`, `Bound -> Unbound` (remote died or adapter
//! off), `Binding -> Unbound` (bind failed or adapter off). Failed binds are never
//! retried automatically; the next power-on event or [ConnectionSupervisor::bind] starts
//! a fresh attempt. A bind that never completes keeps the supervisor in `Binding` until
//! the adapter is toggled.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use async_lock::Mutex;
use log::{debug, error, info, warn};

use crate::adapter_state::{AdapterStateNotifier, AdapterStateObserver, ObserverId};
use crate::util::defer;
use crate::{ProfileId, Result};

/// Binding state of a [ConnectionSupervisor].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindState {
    Unbound,
    Binding,
    Bound,
}

/// Signals emitted by a [ConnectionSupervisor], delivered one at a time in the order
/// the transitions happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisorEvent {
    /// A bind attempt succeeded; the remote handle is available.
    Connected,
    /// A bind attempt failed; the supervisor is unbound.
    BindFailed,
    /// The remote handle was lost because the remote process died or the adapter was
    /// powered off.
    Disconnected,
}

/// The OS facility that binds to remote profile services.
///
/// `bind` may complete synchronously or later, from any thread, by calling exactly one
/// of [ServiceConnection::on_service_connected] or [ServiceConnection::on_bind_failed].
/// Returning an error counts as a failed attempt. `unbind` releases the binding made
/// through `connection`; it is called at most once per connection that was handed to
/// `bind` and did not fail.
pub trait ServiceBinder<S: ?Sized + Send + Sync + 'static>: Send + Sync {
    fn bind(&self, profile: ProfileId, connection: ServiceConnection<S>) -> Result<()>;
    fn unbind(&self, profile: ProfileId, connection: &ServiceConnection<S>);
}

/// Callback handle for one bind attempt.
///
/// Reports for an attempt that is no longer current (abandoned on power-off, replaced
/// by a newer attempt, or arriving after shutdown) are ignored.
pub struct ServiceConnection<S: ?Sized + Send + Sync + 'static> {
    generation: u64,
    supervisor: Weak<SupervisorInner<S>>,
}

impl<S: ?Sized + Send + Sync + 'static> ServiceConnection<S> {
    /// Sequence number of the bind attempt, unique per supervisor.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The remote service is bound and reachable through `service`.
    pub fn on_service_connected(&self, service: Arc<S>) {
        if let Some(inner) = self.supervisor.upgrade() {
            inner.complete_bind(Some(self.generation), Some(service));
        }
    }

    /// The bind attempt failed.
    pub fn on_bind_failed(&self) {
        if let Some(inner) = self.supervisor.upgrade() {
            inner.complete_bind(Some(self.generation), None);
        }
    }

    /// The process hosting the remote service went away.
    pub fn on_service_disconnected(&self) {
        if let Some(inner) = self.supervisor.upgrade() {
            inner.remote_disconnected(Some(self.generation));
        }
    }
}

impl<S: ?Sized + Send + Sync + 'static> Clone for ServiceConnection<S> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            supervisor: self.supervisor.clone(),
        }
    }
}

impl<S: ?Sized + Send + Sync + 'static> std::fmt::Debug for ServiceConnection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConnection")
            .field("generation", &self.generation)
            .finish()
    }
}

struct State<S: ?Sized> {
    powered: bool,
    /// A power event arrived since registration; it overrides the sampled state.
    power_reported: bool,
    handle: Option<Arc<S>>,
    bound_generation: Option<u64>,
    bind_in_flight: Option<u64>,
    next_generation: u64,
    registered: bool,
    closed: bool,
    pending: VecDeque<SupervisorEvent>,
    dispatching: bool,
}

impl<S: ?Sized> State<S> {
    fn bind_state(&self) -> BindState {
        if self.handle.is_some() {
            BindState::Bound
        } else if self.bind_in_flight.is_some() {
            BindState::Binding
        } else {
            BindState::Unbound
        }
    }
}

type EventSink = Box<dyn Fn(SupervisorEvent) + Send + Sync>;

struct SupervisorInner<S: ?Sized + Send + Sync + 'static> {
    profile: ProfileId,
    observer_id: ObserverId,
    weak_self: Weak<SupervisorInner<S>>,
    binder: Arc<dyn ServiceBinder<S>>,
    notifier: Arc<dyn AdapterStateNotifier>,
    sink: EventSink,
    state: Mutex<State<S>>,
}

impl<S: ?Sized + Send + Sync + 'static> SupervisorInner<S> {
    fn connection(&self, generation: u64) -> ServiceConnection<S> {
        ServiceConnection {
            generation,
            supervisor: self.weak_self.clone(),
        }
    }

    /// Reserves a new bind attempt if one is allowed right now.
    fn prepare_bind(&self, state: &mut State<S>) -> Option<ServiceConnection<S>> {
        if state.closed || !state.powered || state.handle.is_some() || state.bind_in_flight.is_some()
        {
            return None;
        }
        let generation = state.next_generation;
        state.next_generation += 1;
        state.bind_in_flight = Some(generation);
        Some(self.connection(generation))
    }

    fn issue_bind(&self, connection: ServiceConnection<S>) {
        debug!(
            "{}: binding to service (attempt {})",
            self.profile, connection.generation
        );
        if let Err(e) = self.binder.bind(self.profile, connection.clone()) {
            error!("{}: could not bind to service: {e}", self.profile);
            self.complete_bind(Some(connection.generation), None);
        }
    }

    fn release(&self, connection: Option<ServiceConnection<S>>) {
        if let Some(connection) = connection {
            debug!(
                "{}: unbinding from service (attempt {})",
                self.profile, connection.generation
            );
            self.binder.unbind(self.profile, &connection);
        }
    }

    fn power_changed(&self, on: bool) {
        let mut bind = None;
        let mut unbind = None;
        {
            let mut state = self.state.lock_blocking();
            if state.closed {
                return;
            }
            state.powered = on;
            state.power_reported = true;
            if on {
                bind = self.prepare_bind(&mut state);
            } else if let Some(generation) = state.bound_generation.take() {
                state.handle = None;
                state.pending.push_back(SupervisorEvent::Disconnected);
                unbind = Some(self.connection(generation));
            } else if let Some(generation) = state.bind_in_flight.take() {
                unbind = Some(self.connection(generation));
            }
        }
        if unbind.is_some() {
            info!("{}: adapter powered off, releasing service", self.profile);
        }
        self.release(unbind);
        if let Some(connection) = bind {
            self.issue_bind(connection);
        }
        self.dispatch();
    }

    fn start_bind(&self) -> bool {
        let bind = self.prepare_bind(&mut self.state.lock_blocking());
        let issued = bind.is_some();
        if let Some(connection) = bind {
            self.issue_bind(connection);
        }
        self.dispatch();
        issued
    }

    /// `generation` of `None` targets whichever attempt is in flight.
    fn complete_bind(&self, generation: Option<u64>, service: Option<Arc<S>>) {
        {
            let mut state = self.state.lock_blocking();
            let current = state.bind_in_flight;
            if state.closed || current.is_none() || (generation.is_some() && generation != current)
            {
                debug!(
                    "{}: ignoring result of stale bind attempt {generation:?}",
                    self.profile
                );
                return;
            }
            state.bind_in_flight = None;
            match service {
                Some(service) if state.powered => {
                    state.handle = Some(service);
                    state.bound_generation = current;
                    state.pending.push_back(SupervisorEvent::Connected);
                }
                _ => state.pending.push_back(SupervisorEvent::BindFailed),
            }
            match state.bind_state() {
                BindState::Bound => info!("{}: proxy bound to service", self.profile),
                _ => warn!("{}: bind attempt failed", self.profile),
            }
        }
        self.dispatch();
    }

    fn remote_disconnected(&self, generation: Option<u64>) {
        let released = {
            let mut state = self.state.lock_blocking();
            let current = state.bound_generation;
            if state.closed || current.is_none() || (generation.is_some() && generation != current)
            {
                debug!(
                    "{}: ignoring disconnect of stale binding {generation:?}",
                    self.profile
                );
                return;
            }
            state.handle = None;
            state.bound_generation = None;
            state.pending.push_back(SupervisorEvent::Disconnected);
            current.map(|generation| self.connection(generation))
        };
        warn!("{}: remote service died", self.profile);
        self.release(released);
        self.dispatch();
    }

    fn shutdown(&self) {
        let released = {
            let mut state = self.state.lock_blocking();
            if state.closed {
                return;
            }
            state.closed = true;
            state.pending.clear();
            state.handle = None;
            let bound = state.bound_generation.take();
            let in_flight = state.bind_in_flight.take();
            bound.or(in_flight).map(|generation| self.connection(generation))
        };
        self.notifier.unregister(self.observer_id);
        self.release(released);
        info!("{}: supervisor shut down", self.profile);
    }

    /// Delivers queued signals. Only one thread delivers at a time; signals queued
    /// meanwhile, including from inside the sink, are picked up by that thread.
    fn dispatch(&self) {
        loop {
            let event = {
                let mut state = self.state.lock_blocking();
                if state.dispatching {
                    return;
                }
                let Some(event) = state.pending.pop_front() else {
                    return;
                };
                state.dispatching = true;
                event
            };
            let _reset = defer(|| self.state.lock_blocking().dispatching = false);
            (self.sink)(event);
        }
    }
}

impl<S: ?Sized + Send + Sync + 'static> AdapterStateObserver for SupervisorInner<S> {
    fn on_adapter_state_changed(&self, enabled: bool) {
        self.power_changed(enabled);
    }
}

/// Owns the binding between a local proxy and one remote profile service.
///
/// All state lives behind one lock per supervisor; calls into the [ServiceBinder] and
/// the event sink are made without holding it. Dropping the supervisor shuts it down.
pub struct ConnectionSupervisor<S: ?Sized + Send + Sync + 'static> {
    inner: Arc<SupervisorInner<S>>,
}

impl<S: ?Sized + Send + Sync + 'static> ConnectionSupervisor<S> {
    /// Creates an unbound supervisor. Nothing happens until [ConnectionSupervisor::start].
    pub fn new(
        profile: ProfileId,
        binder: Arc<dyn ServiceBinder<S>>,
        notifier: Arc<dyn AdapterStateNotifier>,
        sink: impl Fn(SupervisorEvent) + Send + Sync + 'static,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak_self| SupervisorInner {
            profile,
            observer_id: ObserverId::next(),
            weak_self: weak_self.clone(),
            binder,
            notifier,
            sink: Box::new(sink),
            state: Mutex::new(State {
                powered: false,
                power_reported: false,
                handle: None,
                bound_generation: None,
                bind_in_flight: None,
                next_generation: 0,
                registered: false,
                closed: false,
                pending: VecDeque::new(),
                dispatching: false,
            }),
        });
        Self { inner }
    }

    /// Registers for adapter power changes and samples the current power state. A power
    /// event delivered while sampling takes precedence over the sample. If the adapter is
    /// on and `bind_now` is set, the first bind is issued. Later calls do nothing.
    pub fn start(&self, bind_now: bool) {
        {
            let mut state = self.inner.state.lock_blocking();
            if state.closed || state.registered {
                return;
            }
            state.registered = true;
        }
        let observer: Weak<dyn AdapterStateObserver> = self.inner.weak_self.clone();
        self.inner.notifier.register(self.inner.observer_id, observer);
        let sampled = self.inner.notifier.is_enabled();
        let powered = {
            let mut state = self.inner.state.lock_blocking();
            if !state.power_reported {
                state.powered = sampled;
            }
            state.powered
        };
        debug!(
            "{}: supervisor started, adapter {}",
            self.inner.profile,
            if powered { "on" } else { "off" }
        );
        if bind_now {
            self.inner.start_bind();
        }
    }

    pub fn profile(&self) -> ProfileId {
        self.inner.profile
    }

    /// Reacts to an adapter power transition: binds on power-on when unbound and idle,
    /// releases the handle (or the pending attempt) on power-off.
    pub fn on_adapter_power_changed(&self, on: bool) {
        self.inner.power_changed(on);
    }

    /// Starts a fresh bind attempt if the adapter is powered, nothing is bound and no
    /// attempt is in flight. Returns whether an attempt was issued.
    pub fn bind(&self) -> bool {
        self.inner.start_bind()
    }

    /// Completes the attempt currently in flight; ignored if there is none.
    pub fn on_bind_result(&self, handle: Option<Arc<S>>) {
        self.inner.complete_bind(None, handle);
    }

    /// The remote process died. The handle is dropped and no rebind is attempted.
    pub fn on_remote_disconnected(&self) {
        self.inner.remote_disconnected(None);
    }

    /// Snapshot of the remote handle. `None` means the service is unavailable.
    pub fn current_handle(&self) -> Option<Arc<S>> {
        self.inner.state.lock_blocking().handle.clone()
    }

    pub fn state(&self) -> BindState {
        self.inner.state.lock_blocking().bind_state()
    }

    pub fn is_powered(&self) -> bool {
        self.inner.state.lock_blocking().powered
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock_blocking().closed
    }

    /// Unregisters from power notifications and releases any binding. Safe to call
    /// more than once; every later event is ignored.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<S: ?Sized + Send + Sync + 'static> Drop for ConnectionSupervisor<S> {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl<S: ?Sized + Send + Sync + 'static> std::fmt::Debug for ConnectionSupervisor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSupervisor")
            .field("profile", &self.inner.profile)
            .field("state", &self.state())
            .finish()
    }
}
