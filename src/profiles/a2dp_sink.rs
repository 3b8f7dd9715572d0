use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ProfileId};

/// Audio stream configuration negotiated with a remote A2DP source.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Platform channel mask, e.g. `AudioFormat.CHANNEL_IN_STEREO`.
    pub channel_config: i32,
    /// Platform encoding, e.g. `AudioFormat.ENCODING_PCM_16BIT`.
    pub audio_format: i32,
}

/// Remote interface of the A2DP sink service.
pub trait A2dpSinkService: ProfileService {
    fn is_a2dp_playing(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
    fn audio_config(&self, device: &BluetoothDevice) -> RemoteResult<Option<AudioConfig>>;
}

impl RemoteProfile for dyn A2dpSinkService {
    const PROFILE: ProfileId = ProfileId::A2dpSink;
}

/// Proxy of the A2DP sink profile.
pub type A2dpSink = ProfileProxy<dyn A2dpSinkService>;

impl ProfileProxy<dyn A2dpSinkService> {
    /// Whether audio from `device` is streaming; `false` when unavailable.
    pub fn is_a2dp_playing(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("is_a2dp_playing", device, false, |s, d| {
            s.is_a2dp_playing(d)
        })
    }

    /// Current stream configuration for `device`; `None` when unavailable.
    pub fn audio_config(&self, device: &BluetoothDevice) -> Option<AudioConfig> {
        self.call_with_device_or("audio_config", device, None, |s, d| s.audio_config(d))
    }
}
