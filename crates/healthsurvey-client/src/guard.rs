//! Route admission and the role-filtered navigation menu.
//!
//! Every navigation is checked against a [`RouteTable`]. The decision only
//! depends on the current [`SessionSnapshot`]: whether hydration finished,
//! whether someone is logged in, and their role.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::Role;
use crate::session::{SessionSnapshot, SessionStore};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";

/// Roles allowed to author surveys and read analytics.
pub const AUTHOR_ROLES: [Role; 3] = [Role::Admin, Role::HealthcareProvider, Role::Researcher];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Only for anonymous visitors (login, registration).
    Public,
    /// Any authenticated user.
    Protected,
    /// Authenticated users whose role is in the set.
    RoleGated(BTreeSet<Role>),
}

impl Access {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RoleGated(roles.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// Slash-separated pattern; `:name` segments match any single segment.
    pub pattern: String,
    pub access: Access,
}

impl RouteRule {
    pub fn new(pattern: impl Into<String>, access: Access) -> Self {
        Self {
            pattern: pattern.into(),
            access,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut want = segments(&self.pattern);
        let mut got = segments(path);
        loop {
            match (want.next(), got.next()) {
                (None, None) => return true,
                (Some(w), Some(g)) if w.starts_with(':') || w == g => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session has not been hydrated yet; render nothing.
    Pending,
    Render,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    login_path: String,
    landing_path: String,
}

impl RouteTable {
    pub fn new(
        rules: Vec<RouteRule>,
        login_path: impl Into<String>,
        landing_path: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            login_path: login_path.into(),
            landing_path: landing_path.into(),
        }
    }

    /// The dashboard's route table. `/` and unknown paths fall through to the
    /// landing view.
    pub fn default_table() -> Self {
        let rules = vec![
            RouteRule::new("/login", Access::Public),
            RouteRule::new("/register", Access::Public),
            RouteRule::new("/dashboard", Access::Protected),
            RouteRule::new("/surveys", Access::Protected),
            RouteRule::new("/surveys/create", Access::roles(AUTHOR_ROLES)),
            RouteRule::new("/surveys/:id/edit", Access::roles(AUTHOR_ROLES)),
            RouteRule::new("/responses", Access::Protected),
            RouteRule::new("/analytics", Access::roles(AUTHOR_ROLES)),
            RouteRule::new("/users", Access::roles([Role::Admin])),
            RouteRule::new("/settings", Access::Protected),
        ];
        Self::new(rules, LOGIN_PATH, LANDING_PATH)
    }

    pub fn rule_for(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|r| r.matches(path))
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    pub fn evaluate(&self, snapshot: &SessionSnapshot, path: &str) -> GuardDecision {
        if !snapshot.hydrated {
            return GuardDecision::Pending;
        }
        let Some(rule) = self.rule_for(path) else {
            return GuardDecision::Redirect(self.landing_path.clone());
        };
        let session = &snapshot.session;
        match &rule.access {
            Access::Public if session.is_authenticated() => {
                GuardDecision::Redirect(self.landing_path.clone())
            }
            Access::Public => GuardDecision::Render,
            Access::Protected | Access::RoleGated(_) if !session.is_authenticated() => {
                GuardDecision::Redirect(self.login_path.clone())
            }
            Access::Protected => GuardDecision::Render,
            Access::RoleGated(allowed) => match session.role() {
                Some(role) if allowed.contains(&role) => GuardDecision::Render,
                // Wrong role lands on the dashboard, never on an error page.
                _ => GuardDecision::Redirect(self.landing_path.clone()),
            },
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::default_table()
    }
}

/// Route table bound to a live session store.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(store: Arc<SessionStore>, table: RouteTable) -> Self {
        Self { store, table }
    }

    /// Decision for the current state, `Pending` before hydration.
    pub fn check(&self, path: &str) -> GuardDecision {
        self.table.evaluate(&self.store.snapshot(), path)
    }

    /// Waits for hydration, then decides.
    pub async fn admit(&self, path: &str) -> GuardDecision {
        self.store.wait_hydrated().await;
        let decision = self.check(path);
        tracing::debug!(path, ?decision, "route guard");
        decision
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub roles: &'static [Role],
}

impl MenuItem {
    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Highlighted when `current` is this entry, or any survey page for the
    /// surveys entry.
    pub fn is_active(&self, current: &str) -> bool {
        current == self.path || (self.path == "/surveys" && current.starts_with("/surveys"))
    }
}

const EVERYONE: &[Role] = &Role::ALL;

pub const MENU: [MenuItem; 7] = [
    MenuItem {
        label: "Dashboard",
        path: "/dashboard",
        roles: EVERYONE,
    },
    MenuItem {
        label: "Surveys",
        path: "/surveys",
        roles: EVERYONE,
    },
    MenuItem {
        label: "Create Survey",
        path: "/surveys/create",
        roles: &AUTHOR_ROLES,
    },
    MenuItem {
        label: "Responses",
        path: "/responses",
        roles: EVERYONE,
    },
    MenuItem {
        label: "Analytics",
        path: "/analytics",
        roles: &AUTHOR_ROLES,
    },
    MenuItem {
        label: "User Management",
        path: "/users",
        roles: &[Role::Admin],
    },
    MenuItem {
        label: "Settings",
        path: "/settings",
        roles: EVERYONE,
    },
];

/// Menu entries visible to `role`, in display order. Anonymous sessions see
/// none.
pub fn menu_for(role: Option<Role>) -> Vec<MenuItem> {
    let Some(role) = role else {
        return Vec::new();
    };
    MENU.iter().filter(|item| item.allows(role)).copied().collect()
}
