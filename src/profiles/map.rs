use super::ServerSessionService;
use crate::proxy::{ProfileProxy, RemoteProfile};
use crate::ProfileId;

/// Remote interface of the MAP server service.
pub trait MapService: ServerSessionService {}

impl RemoteProfile for dyn MapService {
    const PROFILE: ProfileId = ProfileId::Map;
}

/// Proxy of the message access profile (server role).
pub type Map = ProfileProxy<dyn MapService>;
