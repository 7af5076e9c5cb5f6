use std::sync::Arc;

use crate::{auth::TokenAuthenticator, domain::ports::inbound::AvatarService};

#[derive(Clone)]
pub struct AppState {
    pub avatar_service: Arc<dyn AvatarService>,
    pub authenticator: Arc<dyn TokenAuthenticator>,
}

impl AppState {
    pub fn new(
        avatar_service: Arc<dyn AvatarService>,
        authenticator: Arc<dyn TokenAuthenticator>,
    ) -> Self {
        Self {
            avatar_service,
            authenticator,
        }
    }
}
