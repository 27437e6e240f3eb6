use std::collections::HashMap;

use client_core::{ProfileState, SessionStatus};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{NoticeKind, UiEvent},
    login::LoginField,
    navigation::{NavigationMode, Route},
    profile::{select_view, AvatarState, ProfileCard, ProfileView},
    register::RegisterField,
    shell::{Screen, ScreenController},
    validation::FormField,
};
use crate::media::PreviewImage;
use crate::ui::widgets::{
    card_frame, detail_row, form_text_field, initials_avatar, lighten_color, primary_button,
    ACCENT,
};

const AVATAR_SIZE: f32 = 96.0;

/// What the user asked for during this frame. Applied after rendering so the
/// screen borrow has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenAction {
    SubmitLogin,
    SubmitRegister,
    Logout,
    Open(Route),
}

pub struct AccountApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session_status: watch::Receiver<SessionStatus>,
    profile_state: watch::Receiver<ProfileState>,

    controller: ScreenController,
    avatar_textures: HashMap<String, TextureHandle>,

    // Route whose first field already got keyboard focus.
    focused_route: Option<Route>,
    visuals_applied: bool,
}

impl AccountApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        session_status: watch::Receiver<SessionStatus>,
        profile_state: watch::Receiver<ProfileState>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session_status,
            profile_state,
            controller: ScreenController::new(),
            avatar_textures: HashMap::new(),
            focused_route: None,
            visuals_applied: false,
        }
    }

    fn dispatch(&mut self, cmd: Option<BackendCommand>) {
        self.controller.send(&self.cmd_tx, cmd);
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match &event {
                UiEvent::AvatarLoaded { url, image } => {
                    let texture = load_avatar_texture(ctx, url, image);
                    self.avatar_textures.insert(url.clone(), texture);
                }
                UiEvent::LogoutFinished(_) => self.avatar_textures.clear(),
                _ => {}
            }
            let follow_up = self.controller.handle_event(event);
            self.dispatch(follow_up);
        }
    }

    fn apply_action(&mut self, action: ScreenAction) {
        let cmd = match action {
            ScreenAction::SubmitLogin => self.controller.submit_login(),
            ScreenAction::SubmitRegister => self.controller.submit_register(),
            ScreenAction::Logout => self.controller.request_logout(),
            ScreenAction::Open(route) => self.controller.navigate(route, None, NavigationMode::Push),
        };
        self.dispatch(cmd);
    }

    fn apply_visuals_if_needed(&mut self, ctx: &egui::Context) {
        if self.visuals_applied {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.hyperlink_color = ACCENT;
        visuals.selection.bg_fill = ACCENT;
        visuals.widgets.active.bg_fill = ACCENT;
        visuals.widgets.hovered.bg_fill = ACCENT.gamma_multiply(0.85);
        visuals.window_corner_radius = egui::CornerRadius::same(12);
        ctx.set_visuals(visuals);
        self.visuals_applied = true;
    }

    /// Focus the first field once per visit to a form.
    fn take_focus_request(&mut self) -> bool {
        let route = self.controller.route();
        if self.focused_route == Some(route) {
            return false;
        }
        self.focused_route = Some(route);
        true
    }

    fn show_login_screen(&mut self, ui: &mut egui::Ui, status: &SessionStatus) -> Option<ScreenAction> {
        let focus = self.take_focus_request();
        let Screen::Login(screen) = self.controller.screen_mut() else {
            return None;
        };
        let busy = status.loading || screen.is_in_flight();
        let prefilled = !screen.credentials().email.is_empty();
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("👤").size(24.0));
            ui.vertical(|ui| {
                ui.heading("Sign in");
                ui.weak("Use the email and password of your account.");
            });
        });
        ui.add_space(8.0);

        let email = form_text_field(
            ui,
            "login_email",
            LoginField::Email.label(),
            "user@company.com",
            screen.field_mut(LoginField::Email),
            false,
            focus && !prefilled,
        );
        ui.add_space(6.0);
        let password = form_text_field(
            ui,
            "login_password",
            LoginField::Password.label(),
            "••••••••",
            screen.field_mut(LoginField::Password),
            true,
            focus && prefilled,
        );

        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if enter_pressed && !busy && (email.lost_focus() || password.lost_focus()) {
            action = Some(ScreenAction::SubmitLogin);
        }

        ui.add_space(10.0);
        if primary_button(ui, "Sign in", busy, "Signing in...") {
            action = Some(ScreenAction::SubmitLogin);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Don't have an account?");
            if ui.link("Create one").clicked() {
                action = Some(ScreenAction::Open(Route::Register));
            }
        });
        action
    }

    fn show_register_screen(
        &mut self,
        ui: &mut egui::Ui,
        status: &SessionStatus,
    ) -> Option<ScreenAction> {
        let focus = self.take_focus_request();
        let Screen::Register(screen) = self.controller.screen_mut() else {
            return None;
        };
        let busy = status.loading || screen.is_in_flight();
        let mut action = None;

        ui.heading("Create account");
        ui.weak("All fields are required.");
        ui.add_space(8.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 120.0)
            .show(ui, |ui| {
                for (index, field) in RegisterField::ALL.into_iter().enumerate() {
                    form_text_field(
                        ui,
                        register_field_id(field),
                        field.label(),
                        field.hint(),
                        screen.field_mut(field),
                        field.is_secret(),
                        focus && index == 0,
                    );
                    ui.add_space(4.0);
                }
            });

        ui.add_space(10.0);
        if primary_button(ui, "Create account", busy, "Creating account...") {
            action = Some(ScreenAction::SubmitRegister);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Already registered?");
            if ui.link("Sign in").clicked() {
                action = Some(ScreenAction::Open(Route::Login));
            }
        });
        action
    }

    fn show_profile_screen(&mut self, ui: &mut egui::Ui) -> Option<ScreenAction> {
        let state = self.profile_state.borrow().clone();
        let Screen::Profile(screen) = self.controller.screen() else {
            return None;
        };
        let logging_out = screen.is_logging_out();
        let mut action = None;

        match select_view(&state) {
            ProfileView::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label("Loading profile...");
                });
            }
            ProfileView::Error(message) => {
                ui.heading("Profile unavailable");
                ui.colored_label(ui.visuals().error_fg_color, message);
                ui.add_space(10.0);
                if ui.button("Back to sign in").clicked() {
                    action = Some(ScreenAction::Logout);
                }
            }
            ProfileView::Ready(card) => {
                self.show_profile_card(ui, &card, screen.avatar());
                ui.add_space(12.0);
                if primary_button(ui, "Sign out", logging_out, "Signing out...") {
                    action = Some(ScreenAction::Logout);
                }
            }
        }
        action
    }

    fn show_profile_card(&self, ui: &mut egui::Ui, card: &ProfileCard<'_>, avatar: &AvatarState) {
        let profile = card.profile();
        ui.horizontal(|ui| {
            match avatar {
                AvatarState::Ready(url) => match self.avatar_textures.get(url) {
                    Some(texture) => {
                        ui.add(
                            egui::Image::from_texture(texture)
                                .fit_to_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE))
                                .corner_radius(AVATAR_SIZE / 2.0),
                        );
                    }
                    None => initials_avatar(ui, &card.initials(), AVATAR_SIZE),
                },
                _ => initials_avatar(ui, &card.initials(), AVATAR_SIZE),
            }
            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.heading(card.display_name());
                ui.weak(format!("@{}", profile.user_name));
                egui::Frame::NONE
                    .fill(lighten_color(ACCENT, 0.2).gamma_multiply(0.35))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(8, 2))
                    .show(ui, |ui| {
                        ui.small(card.role_label());
                    });
            });
        });

        ui.add_space(12.0);
        ui.separator();
        egui::Grid::new("profile_details")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                detail_row(ui, "Email", &profile.email);
                detail_row(ui, "Phone", card.phone_label());
                detail_row(ui, "Country", card.country_label());
                detail_row(ui, "User ID", &card.id_label());
            });
    }

    fn show_notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice() else {
            return;
        };
        let (title, color) = match notice.kind {
            NoticeKind::Validation => ("Attention", egui::Color32::from_rgb(250, 166, 26)),
            NoticeKind::Error => ("Error", ctx.style().visuals.error_fg_color),
            NoticeKind::Success => ("Success", egui::Color32::from_rgb(67, 181, 129)),
        };
        let message = notice.message.clone();

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(280.0);
                ui.colored_label(color, message);
                ui.add_space(8.0);
                let ok = ui.button("OK").clicked();
                let keyed = ui.input(|i| i.key_pressed(egui::Key::Escape));
                dismissed = ok || keyed;
            });
        if dismissed {
            self.controller.dismiss_notice();
        }
    }

    fn show_status_footer(&self, ctx: &egui::Context, status: &SessionStatus) {
        egui::TopBottomPanel::bottom("status_footer").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(self.controller.status()).weak());
                if let Some(error) = &status.error {
                    ui.separator();
                    ui.small(egui::RichText::new(error).color(ui.visuals().error_fg_color));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(self.controller.route().path()).weak());
                });
            });
        });
    }
}

fn register_field_id(field: RegisterField) -> &'static str {
    match field {
        RegisterField::Name => "register_name",
        RegisterField::PaternalLastname => "register_paternal_lastname",
        RegisterField::MaternalLastname => "register_maternal_lastname",
        RegisterField::DocumentNumber => "register_document_number",
        RegisterField::Email => "register_email",
        RegisterField::UserName => "register_user_name",
        RegisterField::Phone => "register_phone",
        RegisterField::Password => "register_password",
    }
}

fn load_avatar_texture(ctx: &egui::Context, url: &str, image: &PreviewImage) -> TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(format!("avatar:{url}"), color_image, egui::TextureOptions::LINEAR)
}

impl eframe::App for AccountApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.apply_visuals_if_needed(ctx);

        let status = self.session_status.borrow().clone();
        self.show_status_footer(ctx, &status);

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(360.0, 520.0);
            ui.add_space((avail.y * 0.08).clamp(12.0, 60.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                card_frame(ui).show(ui, |ui| {
                    ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 8.0);
                    // Forms are inert while a blocking notice is open.
                    ui.add_enabled_ui(self.controller.notice().is_none(), |ui| {
                        action = match self.controller.route() {
                            Route::Login => self.show_login_screen(ui, &status),
                            Route::Register => self.show_register_screen(ui, &status),
                            Route::Profile => self.show_profile_screen(ui),
                        };
                    });
                });
            });
        });

        self.show_notice_window(ctx);
        if let Some(action) = action {
            self.apply_action(action);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
