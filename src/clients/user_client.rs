use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{User, UserCreate, UserId, UserPatch};
use crate::lifecycle::Actor;
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserId, UserError, user);

impl UserClient {
    #[instrument(skip(self), fields(user_name = %params.name, role = %params.role))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?.item)
    }

    /// Resolves a registered user into the identity the lifecycle engine checks.
    #[instrument(skip(self))]
    pub async fn actor_for(&self, id: UserId) -> Result<Actor, UserError> {
        match self.get_user(id.clone()).await? {
            Some(user) => Ok(Actor::new(user.id, user.role)),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}
