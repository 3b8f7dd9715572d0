//! Default-safe call surface over a supervised remote profile service.

use std::any::Any;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_lock::Mutex;
use futures_core::Stream;
use futures_lite::{FutureExt, StreamExt};
use futures_timer::Delay;
use log::{debug, error, info, warn};

use crate::adapter_state::AdapterStateNotifier;
use crate::async_util::Notifier;
use crate::error::{BluetoothStatusCode, Error, ErrorKind, RemoteError};
use crate::supervisor::{BindState, ConnectionSupervisor, ServiceBinder, SupervisorEvent};
use crate::{BluetoothDevice, ConnectionState, Priority, ProfileId, ProxyConfig, Result};

/// Result of a call made on a remote profile service.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Remote interface shared by all profile services.
///
/// Every method may fail with a [RemoteError]; proxies turn failures into the
/// default value documented on the corresponding [ProfileProxy] method.
pub trait ProfileService: Send + Sync {
    fn connect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        Err(BluetoothStatusCode::FeatureNotSupported.into())
    }

    fn disconnect(&self, device: &BluetoothDevice) -> RemoteResult<bool>;

    fn connected_devices(&self) -> RemoteResult<Vec<BluetoothDevice>>;

    fn devices_matching_connection_states(
        &self,
        states: &[ConnectionState],
    ) -> RemoteResult<Vec<BluetoothDevice>>;

    fn connection_state(&self, device: &BluetoothDevice) -> RemoteResult<ConnectionState>;

    fn set_priority(&self, _device: &BluetoothDevice, _priority: Priority) -> RemoteResult<bool> {
        Err(BluetoothStatusCode::FeatureNotSupported.into())
    }

    fn priority(&self, _device: &BluetoothDevice) -> RemoteResult<Priority> {
        Err(BluetoothStatusCode::FeatureNotSupported.into())
    }
}

/// Ties a remote interface (usually a `dyn Trait`) to the profile it serves.
pub trait RemoteProfile: ProfileService + 'static {
    const PROFILE: ProfileId;
}

/// Profile-independent view of a proxy, handed to [ServiceListener]s.
pub trait BluetoothProfile: Send + Sync {
    fn profile(&self) -> ProfileId;

    /// Connected devices; empty when the proxy is not bound.
    fn connected_devices(&self) -> Vec<BluetoothDevice>;

    /// Devices in any of `states`; empty when the proxy is not bound.
    fn devices_matching_connection_states(
        &self,
        states: &[ConnectionState],
    ) -> Vec<BluetoothDevice>;

    /// Connection state of `device`; [ConnectionState::Disconnected] when unknown.
    fn connection_state(&self, device: &BluetoothDevice) -> ConnectionState;

    /// Allows downcasting to the concrete proxy type, e.g. `Arc<A2dp>`.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Notified when a proxy gains or loses its remote service.
///
/// Callbacks run synchronously on whichever thread delivered the transition, one at a
/// time and in the order the transitions happened.
pub trait ServiceListener: Send + Sync {
    fn on_service_connected(&self, profile: ProfileId, proxy: Arc<dyn BluetoothProfile>);
    fn on_service_disconnected(&self, profile: ProfileId);
}

/// Connection transitions of a proxy, as seen by [ProfileProxy::service_events].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceEvent {
    Connected(ProfileId),
    Disconnected(ProfileId),
}

/// Client of one remote profile service.
///
/// Calls are forwarded while the proxy is bound. When it is not bound, when a device
/// argument is malformed, or when the remote call fails, the documented default is
/// returned instead and nothing is propagated to the caller. The `try_*` methods
/// report the reason as an [Error].
///
/// [ProfileProxy::close] must be called to release the binding when the proxy is
/// kept alive by its listener; dropping the last reference closes it too.
pub struct ProfileProxy<S: ?Sized + RemoteProfile> {
    supervisor: ConnectionSupervisor<S>,
    listener: Mutex<Option<Arc<dyn ServiceListener>>>,
    events: Notifier<ServiceEvent>,
    config: ProxyConfig,
    weak_self: Weak<ProfileProxy<S>>,
}

impl<S: ?Sized + RemoteProfile> ProfileProxy<S> {
    /// Creates the proxy and, if the adapter is powered and `config.bind_on_create` is
    /// set, starts binding to the remote service.
    pub fn new(
        binder: Arc<dyn ServiceBinder<S>>,
        notifier: Arc<dyn AdapterStateNotifier>,
        listener: Option<Arc<dyn ServiceListener>>,
        config: ProxyConfig,
    ) -> Arc<Self> {
        let proxy = Arc::new_cyclic(|weak_self: &Weak<Self>| {
            let sink_proxy = weak_self.clone();
            let supervisor = ConnectionSupervisor::new(S::PROFILE, binder, notifier, move |event| {
                if let Some(proxy) = sink_proxy.upgrade() {
                    proxy.on_supervisor_event(event);
                }
            });
            Self {
                supervisor,
                listener: Mutex::new(listener),
                events: Notifier::new(config.event_capacity),
                config,
                weak_self: weak_self.clone(),
            }
        });
        proxy.supervisor.start(proxy.config.bind_on_create);
        proxy
    }

    fn on_supervisor_event(&self, event: SupervisorEvent) {
        let profile = S::PROFILE;
        let listener = self.listener.lock_blocking().clone();
        if self.supervisor.is_closed() {
            return;
        }
        match event {
            SupervisorEvent::Connected => {
                info!("{profile}: proxy connected to service");
                if let (Some(listener), Some(this)) = (listener, self.weak_self.upgrade()) {
                    listener.on_service_connected(profile, this);
                }
                self.events.notify(ServiceEvent::Connected(profile));
            }
            SupervisorEvent::Disconnected => {
                info!("{profile}: proxy disconnected from service");
                if let Some(listener) = listener {
                    listener.on_service_disconnected(profile);
                }
                self.events.notify(ServiceEvent::Disconnected(profile));
            }
            SupervisorEvent::BindFailed => error!("{profile}: could not bind to service"),
        }
    }

    pub fn profile(&self) -> ProfileId {
        S::PROFILE
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Whether a remote handle is currently held.
    pub fn is_bound(&self) -> bool {
        self.supervisor.current_handle().is_some()
    }

    pub fn bind_state(&self) -> BindState {
        self.supervisor.state()
    }

    pub fn is_closed(&self) -> bool {
        self.supervisor.is_closed()
    }

    /// Starts a new bind attempt if the adapter is on and the proxy is neither bound nor
    /// binding. Returns whether an attempt was issued.
    pub fn rebind(&self) -> bool {
        self.supervisor.bind()
    }

    /// Replaces the listener. Transitions already being delivered may still reach the
    /// previous one.
    pub fn set_listener(&self, listener: Option<Arc<dyn ServiceListener>>) {
        *self.listener.lock_blocking() = listener;
    }

    /// Stream of connection transitions happening after this call. It ends when the
    /// proxy is closed.
    pub fn service_events(&self) -> impl Stream<Item = ServiceEvent> + Send + Unpin {
        self.events.subscribe()
    }

    /// Waits until the proxy is bound. Returns `false` if `timeout` passes first or the
    /// proxy is closed. Binding itself is not affected by the timeout.
    pub async fn wait_for_service(&self, timeout: Duration) -> bool {
        let mut events = self.events.subscribe();
        if self.is_bound() {
            return true;
        }
        if self.is_closed() {
            return false;
        }
        let connected = async {
            while let Some(event) = events.next().await {
                if matches!(event, ServiceEvent::Connected(_)) {
                    return true;
                }
            }
            false
        };
        connected
            .or(async {
                Delay::new(timeout).await;
                false
            })
            .await
    }

    /// Drops the listener and releases the binding. Later calls return their defaults.
    /// Safe to call more than once.
    ///
    /// Transitions still queued are discarded. A callback that another thread is already
    /// running when `close` is called may finish after `close` returns.
    pub fn close(&self) {
        let _ = self.listener.lock_blocking().take();
        if self.supervisor.is_closed() {
            return;
        }
        self.supervisor.shutdown();
        self.events.close();
        info!("{}: proxy closed", S::PROFILE);
    }

    /// Forwards `f` to the remote service.
    ///
    /// The handle is sampled once; a concurrent power-off does not affect a call that
    /// already started, which then fails or succeeds on its own.
    pub fn try_call<T>(&self, op: &str, f: impl FnOnce(&S) -> RemoteResult<T>) -> Result<T> {
        let Some(service) = self.supervisor.current_handle() else {
            return Err(Error::new(
                ErrorKind::NotBound,
                None,
                format!("{op}: proxy not attached to service"),
            ));
        };
        if self.config.verbose {
            debug!("{}: {op}", S::PROFILE);
        }
        f(&service).map_err(Error::from)
    }

    /// Like [ProfileProxy::try_call], after checking that `device` has a valid address.
    pub fn try_call_with_device<T>(
        &self,
        op: &str,
        device: &BluetoothDevice,
        f: impl FnOnce(&S, &BluetoothDevice) -> RemoteResult<T>,
    ) -> Result<T> {
        if !device.is_valid() {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                None,
                format!("{op}: invalid device address {:?}", device.address()),
            ));
        }
        self.try_call(op, |service| f(service, device))
    }

    /// Forwards `f`, returning `default` on any failure.
    pub fn call_or<T>(&self, op: &str, default: T, f: impl FnOnce(&S) -> RemoteResult<T>) -> T {
        self.try_call(op, f)
            .unwrap_or_else(|e| self.absorb(op, e, default))
    }

    /// Forwards `f` for a device, returning `default` on any failure.
    pub fn call_with_device_or<T>(
        &self,
        op: &str,
        device: &BluetoothDevice,
        default: T,
        f: impl FnOnce(&S, &BluetoothDevice) -> RemoteResult<T>,
    ) -> T {
        self.try_call_with_device(op, device, f)
            .unwrap_or_else(|e| self.absorb(op, e, default))
    }

    fn absorb<T>(&self, op: &str, err: Error, default: T) -> T {
        let profile = S::PROFILE;
        match err.kind() {
            ErrorKind::NotBound => warn!("{profile}: {}", err.message()),
            ErrorKind::InvalidParameter => debug!("{profile}: {}", err.message()),
            ErrorKind::RemoteCommunication => error!("{profile}: {op} failed: {err}"),
            _ => warn!("{profile}: {op} failed: {err}"),
        }
        default
    }

    /// Initiates a connection to `device`. Returns `false` if it could not be initiated.
    pub fn connect(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("connect", device, false, |s, d| s.connect(d))
    }

    /// Initiates disconnection from `device`. Returns `false` if it could not be initiated.
    pub fn disconnect(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("disconnect", device, false, |s, d| s.disconnect(d))
    }

    /// Connected devices; empty when unavailable.
    pub fn connected_devices(&self) -> Vec<BluetoothDevice> {
        self.call_or("connected_devices", Vec::new(), |s| s.connected_devices())
    }

    /// Devices in any of `states`; empty when unavailable.
    pub fn devices_matching_connection_states(
        &self,
        states: &[ConnectionState],
    ) -> Vec<BluetoothDevice> {
        self.call_or("devices_matching_connection_states", Vec::new(), |s| {
            s.devices_matching_connection_states(states)
        })
    }

    /// Connection state of `device`; [ConnectionState::Disconnected] when unavailable.
    pub fn connection_state(&self, device: &BluetoothDevice) -> ConnectionState {
        self.call_with_device_or(
            "connection_state",
            device,
            ConnectionState::Disconnected,
            |s, d| s.connection_state(d),
        )
    }

    /// Sets the priority of `device`. Only [Priority::ON] and [Priority::OFF] are accepted;
    /// returns `false` otherwise or when unavailable.
    pub fn set_priority(&self, device: &BluetoothDevice, priority: Priority) -> bool {
        if !priority.is_settable() {
            debug!("{}: refusing priority {priority:?}", S::PROFILE);
            return false;
        }
        self.call_with_device_or("set_priority", device, false, |s, d| {
            s.set_priority(d, priority)
        })
    }

    /// Priority of `device`; [Priority::OFF] when unavailable.
    pub fn priority(&self, device: &BluetoothDevice) -> Priority {
        self.call_with_device_or("priority", device, Priority::OFF, |s, d| s.priority(d))
    }
}

impl<S: ?Sized + RemoteProfile> BluetoothProfile for ProfileProxy<S> {
    fn profile(&self) -> ProfileId {
        S::PROFILE
    }

    fn connected_devices(&self) -> Vec<BluetoothDevice> {
        ProfileProxy::connected_devices(self)
    }

    fn devices_matching_connection_states(
        &self,
        states: &[ConnectionState],
    ) -> Vec<BluetoothDevice> {
        ProfileProxy::devices_matching_connection_states(self, states)
    }

    fn connection_state(&self, device: &BluetoothDevice) -> ConnectionState {
        ProfileProxy::connection_state(self, device)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<S: ?Sized + RemoteProfile> Drop for ProfileProxy<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: ?Sized + RemoteProfile> std::fmt::Debug for ProfileProxy<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileProxy")
            .field("profile", &S::PROFILE)
            .field("state", &self.bind_state())
            .field("closed", &self.is_closed())
            .finish()
    }
}
