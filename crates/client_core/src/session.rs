//! Session status indicator for the navigation bar.

use std::fmt;

use shared::protocol::SessionStatus;
use tracing::{debug, warn};

use crate::GovanshApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const LOGIN_LINK: NavLink = NavLink {
    label: "Login",
    href: "/login",
};
pub const SIGNUP_LINK: NavLink = NavLink {
    label: "Sign up",
    href: "/signup",
};
pub const LOGOUT_LINK: NavLink = NavLink {
    label: "Logout",
    href: "/logout",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavView {
    Anonymous { login: NavLink, signup: NavLink },
    Authenticated { username: String, logout: NavLink },
}

impl NavView {
    pub fn from_status(status: &SessionStatus) -> Self {
        if status.authenticated {
            Self::Authenticated {
                username: status.username.clone().unwrap_or_default(),
                logout: LOGOUT_LINK,
            }
        } else {
            Self::Anonymous {
                login: LOGIN_LINK,
                signup: SIGNUP_LINK,
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

impl fmt::Display for NavView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous { login, signup } => write!(f, "{} | {}", login.label, signup.label),
            Self::Authenticated { username, logout } => {
                write!(f, "Hi, {username} | {}", logout.label)
            }
        }
    }
}

/// Queries the identity boundary; any failure reads as logged out.
pub async fn sync_session(api: &dyn GovanshApi) -> NavView {
    let status = match api.session_status().await {
        Ok(status) => status,
        Err(err) => {
            warn!(error = %err, "session check failed; treating as anonymous");
            SessionStatus::anonymous()
        }
    };
    debug!(authenticated = status.authenticated, "session synchronized");
    NavView::from_status(&status)
}
