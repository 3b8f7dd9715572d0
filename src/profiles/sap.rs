use super::ServerSessionService;
use crate::proxy::{ProfileProxy, RemoteProfile};
use crate::ProfileId;

/// Remote interface of the SIM access server service.
pub trait SapService: ServerSessionService {}

impl RemoteProfile for dyn SapService {
    const PROFILE: ProfileId = ProfileId::Sap;
}

/// Proxy of the SIM access profile.
pub type Sap = ProfileProxy<dyn SapService>;
