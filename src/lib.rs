//! Client-side proxies for Android's Bluetooth Classic profile services.
//!
//! A [ProfileProxy] binds to a remote profile service through a [ServiceBinder], follows
//! the adapter power state reported by an [AdapterStateNotifier], and forwards calls
//! while bound. Calls never fail outward: an unbound proxy, a malformed device address
//! or a failed remote call yield the documented default value. Binding transitions are
//! reported to an optional [ServiceListener] and as a stream of [ServiceEvent]s.
//!
//! Ready-made proxy types for the common profiles live in [profiles]; the [btuuid] and
//! [class] modules hold the UUID codec and Class of Device helpers shared by them.

pub use adapter_state::{
    AdapterStateBroadcaster, AdapterStateNotifier, AdapterStateObserver, ObserverId,
};
pub use btuuid::BluetoothUuidExt;
pub use class::{ClassProfile, DeviceClass};
pub use error::Error;
pub use profiles::{
    A2dp, A2dpSink, AvrcpController, Headset, InputDevice, Map, Pan, Pbap, Sap,
};
pub use proxy::{
    BluetoothProfile, ProfileProxy, ProfileService, RemoteProfile, RemoteResult, ServiceEvent,
    ServiceListener,
};
pub use supervisor::{
    BindState, ConnectionSupervisor, ServiceBinder, ServiceConnection, SupervisorEvent,
};

/// Convenience alias for a result with [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

pub use uuid::Uuid;
pub mod btuuid;
pub mod class;
pub mod error;
pub mod profiles;
mod types;
pub use types::*;

mod adapter_state;
mod async_util;
mod proxy;
mod supervisor;
mod util;
