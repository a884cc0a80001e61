use crate::config::ServiceInfo;
use crate::db::UserRepository;

/// Shared by every handler through an `Extension` layer.
#[derive(Debug, Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub service: ServiceInfo,
}

impl AppState {
    pub fn new(users: UserRepository, service: ServiceInfo) -> Self {
        Self { users, service }
    }
}
