use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ProfileId};

/// SCO audio state of a headset, using the platform's `STATE_AUDIO_*` values.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AudioState {
    #[default]
    Disconnected = 10,
    Connecting = 11,
    Connected = 12,
}

impl AudioState {
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            10 => Some(Self::Disconnected),
            11 => Some(Self::Connecting),
            12 => Some(Self::Connected),
            _ => None,
        }
    }
}

/// Remote interface of the headset (HSP/HFP audio gateway) service.
pub trait HeadsetService: ProfileService {
    fn is_audio_connected(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
    fn audio_state(&self, device: &BluetoothDevice) -> RemoteResult<AudioState>;
    fn start_voice_recognition(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
    fn stop_voice_recognition(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
}

impl RemoteProfile for dyn HeadsetService {
    const PROFILE: ProfileId = ProfileId::Headset;
}

/// Proxy of the headset profile.
pub type Headset = ProfileProxy<dyn HeadsetService>;

impl ProfileProxy<dyn HeadsetService> {
    /// Whether a SCO audio link to `device` is up; `false` when unavailable.
    pub fn is_audio_connected(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("is_audio_connected", device, false, |s, d| {
            s.is_audio_connected(d)
        })
    }

    /// [AudioState::Disconnected] when unavailable.
    pub fn audio_state(&self, device: &BluetoothDevice) -> AudioState {
        self.call_with_device_or("audio_state", device, AudioState::Disconnected, |s, d| {
            s.audio_state(d)
        })
    }

    pub fn start_voice_recognition(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("start_voice_recognition", device, false, |s, d| {
            s.start_voice_recognition(d)
        })
    }

    pub fn stop_voice_recognition(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("stop_voice_recognition", device, false, |s, d| {
            s.stop_voice_recognition(d)
        })
    }
}
