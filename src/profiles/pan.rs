use crate::proxy::{ProfileProxy, ProfileService, RemoteProfile, RemoteResult};
use crate::ProfileId;

/// Remote interface of the PAN service.
pub trait PanService: ProfileService {
    fn set_bluetooth_tethering(&self, enabled: bool) -> RemoteResult<()>;
    fn is_tethering_on(&self) -> RemoteResult<bool>;
}

impl RemoteProfile for dyn PanService {
    const PROFILE: ProfileId = ProfileId::Pan;
}

/// Proxy of the personal area networking profile.
pub type Pan = ProfileProxy<dyn PanService>;

impl ProfileProxy<dyn PanService> {
    /// Turns NAP tethering on or off. Does nothing when the proxy is unavailable.
    pub fn set_bluetooth_tethering(&self, enabled: bool) {
        self.call_or("set_bluetooth_tethering", (), |s| s.set_bluetooth_tethering(enabled))
    }

    pub fn is_tethering_on(&self) -> bool {
        self.call_or("is_tethering_on", false, |s| s.is_tethering_on())
    }
}
