//! Path-based screen routing with an optional state payload.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Profile,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Profile => "/profile",
        }
    }
}

/// Payload carried to the next screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub registered_email: Option<String>,
}

impl NavigationState {
    pub fn registered(email: impl Into<String>) -> Self {
        Self {
            registered_email: Some(email.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    Push,
    Replace,
}

/// Oldest entries are dropped once the history grows past this.
pub const HISTORY_LIMIT: usize = 32;

#[derive(Debug)]
pub struct Navigator {
    history: Vec<Route>,
    state: Option<NavigationState>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
            state: None,
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Login)
    }

    #[cfg(test)]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn navigate(&mut self, route: Route, state: Option<NavigationState>, mode: NavigationMode) {
        if mode == NavigationMode::Replace {
            self.history.pop();
        }
        self.history.push(route);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.state = state;
        tracing::debug!(path = route.path(), ?mode, "navigated");
    }

    /// Hands the payload of the latest navigation to the screen being
    /// mounted. Subsequent calls return `None`.
    pub fn take_state(&mut self) -> Option<NavigationState> {
        self.state.take()
    }
}
