use super::ServerSessionService;
use crate::proxy::{ProfileProxy, RemoteProfile};
use crate::ProfileId;

/// Remote interface of the PBAP server service.
pub trait PbapService: ServerSessionService {}

impl RemoteProfile for dyn PbapService {
    const PROFILE: ProfileId = ProfileId::Pbap;
}

/// Proxy of the phone book access profile (server role).
pub type Pbap = ProfileProxy<dyn PbapService>;
