//! Access decision for pages that need a signed-in user.

use api::models::Role;

use crate::session::Session;

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still resolving: render a spinner, decide later.
    Pending,
    Allow,
    RedirectToLogin,
}

impl RouteDecision {
    pub fn for_session(session: &Session) -> Self {
        if session.is_loading() {
            Self::Pending
        } else if session.is_authenticated() {
            Self::Allow
        } else {
            Self::RedirectToLogin
        }
    }

    /// Where to navigate, if anywhere.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(LOGIN_ROUTE),
            _ => None,
        }
    }
}

/// Landing page for a signed-in user, or the login page.
pub fn home_route(session: &Session) -> &'static str {
    session
        .user()
        .map(|user| user.role.home_route())
        .unwrap_or(LOGIN_ROUTE)
}

/// Whether the session may open admin-only pages.
pub fn is_admin(session: &Session) -> bool {
    session.user().is_some_and(|user| user.role == Role::Admin)
}
