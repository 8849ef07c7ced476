//! Route protection and navigation.
//!
//! [`RouteGuard`] decides whether a view may be shown for a given auth state.
//! [`Navigator`] owns the current view and reacts to unauthorized events
//! from the API client by forcing the login view.

use std::fmt;
use std::str::FromStr;

use tokio::sync::{broadcast, watch};

use crate::api::SessionEvent;
use crate::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    /// Home view.
    Calendar,
    Transactions,
    Stats,
    Accounts,
    Categories,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Calendar,
        Route::Transactions,
        Route::Stats,
        Route::Accounts,
        Route::Categories,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Calendar => "/",
            Route::Transactions => "/transactions",
            Route::Stats => "/stats",
            Route::Accounts => "/accounts",
            Route::Categories => "/categories",
        }
    }

    /// Views reachable without a session.
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = if trimmed == "/" {
            trimmed
        } else {
            trimmed.trim_end_matches('/')
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized || route.path() == format!("/{normalized}"))
            .ok_or_else(|| format!("Unknown view: {trimmed}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
    /// Session not hydrated yet; render nothing.
    Defer,
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn check(route: Route, state: &AuthState) -> GuardDecision {
        if route.is_public() {
            return GuardDecision::Allow;
        }
        match state {
            AuthState::Loading => GuardDecision::Defer,
            AuthState::Unauthenticated => GuardDecision::Redirect(Route::Login),
            AuthState::Authenticated(_) => GuardDecision::Allow,
        }
    }

    /// Waits for hydration to finish, then decides. Never returns `Defer`
    /// unless the session owner went away while still loading.
    pub async fn resolve(route: Route, rx: &mut watch::Receiver<AuthState>) -> GuardDecision {
        if route.is_public() {
            return GuardDecision::Allow;
        }
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => Self::check(route, &state),
            Err(_) => GuardDecision::Defer,
        }
    }
}

/// Tracks the active view and enforces the guard on every transition.
pub struct Navigator {
    current: Option<Route>,
    auth: watch::Receiver<AuthState>,
    events: broadcast::Receiver<SessionEvent>,
}

impl Navigator {
    pub fn new(
        auth: watch::Receiver<AuthState>,
        events: broadcast::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            current: None,
            auth,
            events,
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    /// Moves to `route`, or to wherever the guard redirects.
    pub async fn navigate(&mut self, route: Route) -> Route {
        let target = match RouteGuard::resolve(route, &mut self.auth).await {
            GuardDecision::Allow => route,
            GuardDecision::Redirect(to) => {
                tracing::debug!(from = %route, to = %to, "redirecting");
                to
            }
            GuardDecision::Defer => Route::Login,
        };
        self.current = Some(target);
        target
    }

    /// Applies pending session events. Returns `true` if any forced a
    /// redirect to the login view.
    pub fn drain_events(&mut self) -> bool {
        let mut redirected = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => redirected |= self.handle_event(&event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "session events lagged");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => break,
            }
        }
        redirected
    }

    fn handle_event(&mut self, event: &SessionEvent) -> bool {
        match event {
            SessionEvent::Unauthorized { path } => {
                // Already on a public view: stay there.
                if self.current.is_some_and(Route::is_public) {
                    return false;
                }
                tracing::info!(path = %path, "session rejected; returning to login");
                self.current = Some(Route::Login);
                true
            }
        }
    }
}
