//! Per-profile remote interfaces and proxy types.
//!
//! Each profile defines a remote trait extending [ProfileService] and a type alias for
//! `ProfileProxy<dyn ThatTrait>`. Profile-specific operations follow the same rules as
//! the common ones: unbound proxies, invalid devices and failed remote calls produce
//! the documented default.

use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ConnectionState};

mod a2dp;
mod a2dp_sink;
mod avrcp_controller;
mod headset;
mod input_device;
mod map;
mod pan;
mod pbap;
mod sap;

pub use a2dp::{A2dp, A2dpService};
pub use a2dp_sink::{A2dpSink, A2dpSinkService, AudioConfig};
pub use avrcp_controller::{AvrcpController, AvrcpControllerService, KeyState, PassThroughKey};
pub use headset::{AudioState, Headset, HeadsetService};
pub use input_device::{InputDevice, InputDeviceService, ProtocolMode};
pub use map::{Map, MapService};
pub use pan::{Pan, PanService};
pub use pbap::{Pbap, PbapService};
pub use sap::{Sap, SapService};

/// Remote operations of server-role profiles that serve at most one client at a time
/// (MAP, PBAP and SAP).
pub trait ServerSessionService: ProfileService {
    /// State of the current client session.
    fn state(&self) -> RemoteResult<ConnectionState>;

    /// The client currently connected, if any.
    fn client(&self) -> RemoteResult<Option<BluetoothDevice>>;

    fn is_connected(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
}

impl<S: ?Sized + RemoteProfile + ServerSessionService> ProfileProxy<S> {
    /// State of the current client session; `None` when unavailable.
    pub fn state(&self) -> Option<ConnectionState> {
        self.call_or("state", None, |s| s.state().map(Some))
    }

    /// The connected client; `None` when there is none or it is unavailable.
    pub fn client(&self) -> Option<BluetoothDevice> {
        self.call_or("client", None, |s| s.client())
    }

    /// Whether `device` is the connected client; `false` when unavailable.
    pub fn is_connected(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("is_connected", device, false, |s, d| s.is_connected(d))
    }
}
