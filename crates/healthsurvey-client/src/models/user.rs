use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Account role. Drives route gating and what the backend lets a user see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    HealthcareProvider,
    Patient,
    Researcher,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::HealthcareProvider,
        Role::Patient,
        Role::Researcher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HealthcareProvider => "healthcare_provider",
            Role::Patient => "patient",
            Role::Researcher => "researcher",
        }
    }

    /// Human label used in menus and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::HealthcareProvider => "Healthcare Provider",
            Role::Patient => "Patient",
            Role::Researcher => "Researcher",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                format!("unknown role \"{s}\" (expected admin, healthcare_provider, patient or researcher)")
            })
    }
}

/// A platform account as returned by the profile and user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`, as the backend sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl User {
    /// First name when known, username otherwise.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }

    /// Takes over a refreshed profile wholesale. Only the account identity
    /// (`id`, `username`) is kept; fields the server reports as null are
    /// cleared.
    pub fn apply_profile(&mut self, profile: User) {
        let id = self.id;
        let username = std::mem::take(&mut self.username);
        *self = User {
            id,
            username,
            ..profile
        };
    }
}

/// Body of `POST /users/login/`. The backend accepts a username or an
/// email address in `username`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /users/register/` and `POST /users/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_id: Option<String>,
}

/// Partial update body for `PUT /users/{id}/` and `PUT /users/profile/update/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `POST /users/change-password/`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Reply of login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Query filters for `GET /users/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parses_backend_names() {
        assert_eq!("healthcare_provider".parse::<Role>(), Ok(Role::HealthcareProvider));
        assert!("doctor".parse::<Role>().is_err());
        let r: Role = serde_json::from_value(json!("researcher")).unwrap();
        assert_eq!(r, Role::Researcher);
    }

    #[test]
    fn user_decodes_profile_shape() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "username": "dr_lee",
            "email": "lee@clinic.test",
            "first_name": "Ana",
            "last_name": "Lee",
            "full_name": "Ana Lee",
            "role": "healthcare_provider",
            "phone": null,
            "department": "Cardiology",
            "specialization": "",
            "created_at": "2024-03-01T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(user.role, Role::HealthcareProvider);
        assert_eq!(user.display_name(), "Ana");
        assert_eq!(user.department.as_deref(), Some("Cardiology"));
        assert!(user.created_at.is_some());
        assert!(user.is_active.is_none());
    }

    #[test]
    fn apply_profile_replaces_fields_and_keeps_identity() {
        let mut user: User = serde_json::from_value(json!({
            "id": 1, "username": "pat", "role": "patient",
            "phone": "555-0100", "date_of_birth": "1990-04-02"
        }))
        .unwrap();
        let refreshed: User = serde_json::from_value(json!({
            "id": 1, "username": "renamed", "role": "patient", "first_name": "Pat",
            "phone": null, "department": "Oncology"
        }))
        .unwrap();
        user.apply_profile(refreshed);
        assert_eq!(user.username, "pat");
        assert_eq!(user.first_name, "Pat");
        assert_eq!(user.phone, None);
        assert_eq!(user.date_of_birth, None);
        assert_eq!(user.department.as_deref(), Some("Oncology"));
    }

    #[test]
    fn filters_skip_absent_fields() {
        let q = serde_json::to_value(UserFilters {
            role: Some(Role::Patient),
            search: None,
        })
        .unwrap();
        assert_eq!(q, json!({"role": "patient"}));
    }
}
