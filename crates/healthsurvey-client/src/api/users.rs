use crate::error::Outcome;
use crate::gateway::Gateway;
use crate::models::{Listing, NewUser, User, UserFilters, UserStats, UserUpdate};

/// User administration.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, filters: &UserFilters) -> Outcome<Listing<User>> {
        self.gateway.get_query("/users/", filters).await
    }

    pub async fn get(&self, id: i64) -> Outcome<User> {
        self.gateway.get(&format!("/users/{id}/")).await
    }

    pub async fn create(&self, user: &NewUser) -> Outcome<User> {
        self.gateway.post("/users/", user).await
    }

    pub async fn update(&self, id: i64, update: &UserUpdate) -> Outcome<User> {
        self.gateway.put(&format!("/users/{id}/"), update).await
    }

    pub async fn delete(&self, id: i64) -> Outcome<()> {
        self.gateway.delete(&format!("/users/{id}/")).await
    }

    pub async fn stats(&self) -> Outcome<UserStats> {
        self.gateway.get("/users/stats/").await
    }
}
