use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::{BluetoothDevice, ProfileId};

/// Remote interface of the A2DP source service.
pub trait A2dpService: ProfileService {
    fn is_a2dp_playing(&self, device: &BluetoothDevice) -> RemoteResult<bool>;
}

impl RemoteProfile for dyn A2dpService {
    const PROFILE: ProfileId = ProfileId::A2dp;
}

/// Proxy of the A2DP source profile.
pub type A2dp = ProfileProxy<dyn A2dpService>;

impl ProfileProxy<dyn A2dpService> {
    /// Whether audio is streaming to `device`; `false` when unavailable.
    pub fn is_a2dp_playing(&self, device: &BluetoothDevice) -> bool {
        self.call_with_device_or("is_a2dp_playing", device, false, |s, d| {
            s.is_a2dp_playing(d)
        })
    }
}
