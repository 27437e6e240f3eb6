//! Top-level screen controller: owns navigation, the mounted screen, and the
//! blocking notice, and turns user actions and backend events into commands.

use crossbeam_channel::Sender;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{Notice, UiError, UiErrorContext, UiEvent},
    login::{LoginOutcome, LoginScreen},
    navigation::{NavigationMode, NavigationState, Navigator, Route},
    orchestration::dispatch_backend_command,
    profile::ProfileScreen,
    register::{RegisterOutcome, RegisterScreen},
    SubmitAction,
};

#[derive(Debug)]
pub enum Screen {
    Login(LoginScreen),
    Register(RegisterScreen),
    Profile(ProfileScreen),
}

impl Screen {
    fn mount(route: Route, state: Option<NavigationState>) -> Self {
        match route {
            Route::Login => Self::Login(LoginScreen::mount(state)),
            Route::Register => Self::Register(RegisterScreen::default()),
            Route::Profile => Self::Profile(ProfileScreen::mount()),
        }
    }
}

pub struct ScreenController {
    navigator: Navigator,
    screen: Screen,
    notice: Option<Notice>,
    status: String,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenController {
    pub fn new() -> Self {
        let mut navigator = Navigator::new(Route::Login);
        let screen = Screen::mount(Route::Login, navigator.take_state());
        Self {
            navigator,
            screen,
            notice: None,
            status: "Not signed in".to_string(),
        }
    }

    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    #[cfg(test)]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Mounts a fresh screen for `route`. Entering the profile screen asks
    /// the profile source to load.
    pub fn navigate(
        &mut self,
        route: Route,
        state: Option<NavigationState>,
        mode: NavigationMode,
    ) -> Option<BackendCommand> {
        self.navigator.navigate(route, state, mode);
        self.screen = Screen::mount(route, self.navigator.take_state());
        (route == Route::Profile).then_some(BackendCommand::LoadProfile)
    }

    pub fn submit_login(&mut self) -> Option<BackendCommand> {
        let Screen::Login(screen) = &mut self.screen else {
            return None;
        };
        match screen.submit() {
            SubmitAction::Dispatch(credentials) => {
                self.status = "Signing in...".to_string();
                Some(BackendCommand::Login(credentials))
            }
            SubmitAction::Blocked(notice) => {
                self.notice = Some(notice);
                None
            }
            SubmitAction::InFlight => None,
        }
    }

    pub fn submit_register(&mut self) -> Option<BackendCommand> {
        let Screen::Register(screen) = &mut self.screen else {
            return None;
        };
        match screen.submit() {
            SubmitAction::Dispatch(data) => {
                self.status = "Creating account...".to_string();
                Some(BackendCommand::Register(data))
            }
            SubmitAction::Blocked(notice) => {
                self.notice = Some(notice);
                None
            }
            SubmitAction::InFlight => None,
        }
    }

    pub fn request_logout(&mut self) -> Option<BackendCommand> {
        let Screen::Profile(screen) = &mut self.screen else {
            return None;
        };
        screen.request_logout().then_some(BackendCommand::Logout)
    }

    /// Queues `cmd` for the worker. When it cannot be queued the pending
    /// screen is released so the user can retry.
    pub fn send(&mut self, cmd_tx: &Sender<BackendCommand>, cmd: Option<BackendCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        if !dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
            self.abort_pending();
        }
    }

    /// Clears the in-flight guard of the mounted screen. A pending logout
    /// still ends on the login screen.
    pub fn abort_pending(&mut self) {
        let logout_dropped = match &mut self.screen {
            Screen::Login(screen) => {
                screen.abort_submit();
                false
            }
            Screen::Register(screen) => {
                screen.abort_submit();
                false
            }
            Screen::Profile(screen) => screen.abort_logout(),
        };
        if logout_dropped {
            self.navigate(Route::Login, None, NavigationMode::Push);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Option<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                None
            }
            UiEvent::Error(err) => {
                self.status = err.status_line();
                if err.context() == UiErrorContext::BackendStartup {
                    self.notice = Some(Notice::error(err.message().to_string()));
                }
                None
            }
            UiEvent::LoginFinished(result) => {
                if let Err(failure) = &result {
                    self.status = UiError::from_failure(UiErrorContext::Login, failure).status_line();
                }
                let Screen::Login(screen) = &mut self.screen else {
                    tracing::debug!("login result arrived after leaving the login screen");
                    return None;
                };
                match screen.finish(result) {
                    LoginOutcome::SignedIn(route) => {
                        self.status = "Signed in".to_string();
                        self.navigate(route, None, NavigationMode::Push)
                    }
                    LoginOutcome::Failed(notice) => {
                        self.notice = Some(notice);
                        None
                    }
                    LoginOutcome::Ignored => None,
                }
            }
            UiEvent::RegisterFinished { email, result } => {
                if let Err(failure) = &result {
                    self.status =
                        UiError::from_failure(UiErrorContext::Register, failure).status_line();
                }
                let Screen::Register(screen) = &mut self.screen else {
                    tracing::debug!("registration result arrived after leaving the register screen");
                    return None;
                };
                match screen.finish(email, result) {
                    RegisterOutcome::Registered {
                        notice,
                        route,
                        state,
                    } => {
                        self.status = "Account created".to_string();
                        self.notice = Some(notice);
                        self.navigate(route, Some(state), NavigationMode::Replace)
                    }
                    RegisterOutcome::Failed(notice) => {
                        self.notice = Some(notice);
                        None
                    }
                    RegisterOutcome::Ignored => None,
                }
            }
            UiEvent::LogoutFinished(result) => {
                let Screen::Profile(screen) = &mut self.screen else {
                    return None;
                };
                self.status = match &result {
                    Ok(()) => "Signed out".to_string(),
                    Err(failure) => format!(
                        "Signed out locally; {}",
                        UiError::from_failure(UiErrorContext::Logout, failure).status_line()
                    ),
                };
                screen.finish_logout(result);
                self.navigate(Route::Login, None, NavigationMode::Push)
            }
            UiEvent::ProfileFinished(result) => match result {
                Ok(profile) => {
                    let Screen::Profile(screen) = &mut self.screen else {
                        return None;
                    };
                    screen
                        .on_profile_loaded(&profile)
                        .map(|url| BackendCommand::FetchAvatar { url })
                }
                Err(failure) => {
                    let err = UiError::from_failure(UiErrorContext::Profile, &failure);
                    self.status = if err.requires_reauth() {
                        "Session missing or expired; sign in again".to_string()
                    } else {
                        err.status_line()
                    };
                    None
                }
            },
            UiEvent::AvatarLoaded { url, .. } => {
                if let Screen::Profile(screen) = &mut self.screen {
                    screen.on_avatar_result(&url, true);
                }
                None
            }
            UiEvent::AvatarFailed { url, reason } => {
                tracing::warn!(%url, %reason, "profile image unavailable; using initials");
                if let Screen::Profile(screen) = &mut self.screen {
                    screen.on_avatar_result(&url, false);
                }
                None
            }
        }
    }
}
