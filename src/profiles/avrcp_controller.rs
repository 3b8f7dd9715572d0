use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ProfileId};

/// AVRCP pass-through operation id.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassThroughKey(pub u8);

impl PassThroughKey {
    pub const VOL_UP: Self = Self(0x41);
    pub const VOL_DOWN: Self = Self(0x42);
    pub const PLAY: Self = Self(0x44);
    pub const STOP: Self = Self(0x45);
    pub const PAUSE: Self = Self(0x46);
    pub const REWIND: Self = Self(0x48);
    pub const FAST_FORWARD: Self = Self(0x49);
    pub const FORWARD: Self = Self(0x4B);
    pub const BACKWARD: Self = Self(0x4C);
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed = 0,
    Released = 1,
}

/// Remote interface of the AVRCP controller service.
pub trait AvrcpControllerService: ProfileService {
    fn send_pass_through_cmd(
        &self,
        device: &BluetoothDevice,
        key: PassThroughKey,
        state: KeyState,
    ) -> RemoteResult<()>;
}

impl RemoteProfile for dyn AvrcpControllerService {
    const PROFILE: ProfileId = ProfileId::AvrcpController;
}

/// Proxy of the AVRCP controller profile.
pub type AvrcpController = ProfileProxy<dyn AvrcpControllerService>;

impl ProfileProxy<dyn AvrcpControllerService> {
    /// Sends a key event to `device`. Dropped when the proxy is unavailable.
    pub fn send_pass_through_cmd(&self, device: &BluetoothDevice, key: PassThroughKey, state: KeyState) {
        self.call_with_device_or("send_pass_through_cmd", device, (), |s, d| {
            s.send_pass_through_cmd(d, key, state)
        })
    }
}
