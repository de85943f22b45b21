use crate::error::Outcome;
use crate::gateway::Gateway;
use crate::models::{Ack, AuthSession, Credentials, NewUser, PasswordChange, User, UserUpdate};

/// Authentication and the caller's own profile.
///
/// None of these touch the session store; callers install or clear the
/// session themselves once an operation succeeds.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, credentials: &Credentials) -> Outcome<AuthSession> {
        self.gateway.post("/users/login/", credentials).await
    }

    pub async fn register(&self, user: &NewUser) -> Outcome<AuthSession> {
        self.gateway.post("/users/register/", user).await
    }

    pub async fn logout(&self) -> Outcome<Ack> {
        self.gateway.post_empty("/users/logout/").await
    }

    pub async fn profile(&self) -> Outcome<User> {
        self.gateway.get("/users/profile/").await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Outcome<User> {
        self.gateway.put("/users/profile/update/", update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Outcome<Ack> {
        self.gateway.post("/users/change-password/", change).await
    }
}
