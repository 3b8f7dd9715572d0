use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ProfileId};

/// HID protocol mode.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolMode {
    Report = 0,
    Boot = 1,
    Unsupported = 255,
}

/// Remote interface of the HID host service.
///
/// `protocol_mode` only issues the query; the result arrives through a platform
/// broadcast, so the return value reports whether the request was accepted.
pub trait InputDeviceService: ProfileService {
    fn virtual_unplug(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
    fn protocol_mode(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
    fn set_protocol_mode(&self, device: &BluetoothDevice, mode: ProtocolMode) -> RemoteResult<bool>;
}

impl RemoteProfile for dyn InputDeviceService {
    const PROFILE: ProfileId = ProfileId::InputDevice;
}

/// Proxy of the HID host profile.
pub type InputDevice = ProfileProxy<dyn InputDeviceService>;

impl ProfileProxy<dyn InputDeviceService> {
    pub fn virtual_unplug(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("virtual_unplug", device, false, |s, d| s.virtual_unplug(d))
    }

    pub fn protocol_mode(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("protocol_mode", device, false, |s, d| s.protocol_mode(d))
    }

    pub fn set_protocol_mode(&self, device: &BluetoothDevice, mode: ProtocolMode) -> bool {
        self.call_with_device_or("set_protocol_mode", device, false, |s, d| {
            s.set_protocol_mode(d, mode)
        })
    }
}
