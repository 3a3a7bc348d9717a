use client_core::validation::fields;
use eframe::egui;

use super::app::{field_error, AuthMode, DesktopGuiApp};
use crate::backend_bridge::commands::BackendCommand;

impl DesktopGuiApp {
    fn auth_text_field(
        ui: &mut egui::Ui,
        id: &'static str,
        label: &str,
        hint: &str,
        value: &mut String,
        password: bool,
    ) -> egui::Response {
        ui.label(egui::RichText::new(label).strong());
        let edit = egui::TextEdit::singleline(value)
            .id_salt(id)
            .hint_text(hint)
            .password(password)
            .desired_width(f32::INFINITY);
        ui.add_sized([ui.available_width(), 32.0], edit)
    }

    pub(crate) fn show_auth_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(380.0, 480.0);
            ui.add_space((avail.y * 0.12).clamp(18.0, 90.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::NONE
                    .fill(ui.visuals().faint_bg_color)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 8.0);
                        ui.heading("SEO Content Studio");
                        ui.weak(match self.auth.mode {
                            AuthMode::SignIn => "Sign in to your account.",
                            AuthMode::Register => "Create a free account.",
                            AuthMode::ResetPassword => "We'll email you a reset link.",
                        });
                        ui.add_space(6.0);
                        self.show_status_banner(ui);

                        if !self.session_checked {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Restoring session...");
                            });
                            return;
                        }

                        self.show_auth_fields(ctx, ui);
                    });
            });
        });
    }

    fn show_auth_fields(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let mode = self.auth.mode;
        let errors = self.auth.errors.clone();

        if mode == AuthMode::Register {
            Self::auth_text_field(ui, "auth_name", "Name", "Jane Doe", &mut self.auth.name, false);
            field_error(ui, &errors, fields::NAME);
        }
        let email_resp = Self::auth_text_field(
            ui,
            "auth_email",
            "Email",
            "you@example.com",
            &mut self.auth.email,
            false,
        );
        field_error(ui, &errors, fields::EMAIL);
        let mut submit_on_enter = email_resp.lost_focus();
        if mode != AuthMode::ResetPassword {
            let password_resp = Self::auth_text_field(
                ui,
                "auth_password",
                "Password",
                "",
                &mut self.auth.password,
                true,
            );
            field_error(ui, &errors, fields::PASSWORD);
            submit_on_enter |= password_resp.lost_focus();
        }
        let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(8.0);
        let label = match mode {
            AuthMode::SignIn => "Sign in",
            AuthMode::Register => "Create account",
            AuthMode::ResetPassword => "Send reset link",
        };
        let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
            .min_size(egui::vec2(ui.available_width(), 38.0));
        let clicked = ui.add_enabled(!self.auth.busy, button).clicked();
        if self.auth.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Working...");
            });
        }
        if clicked || (submit_on_enter && enter_pressed && !self.auth.busy) {
            self.submit_auth_form();
        }

        ui.separator();
        ui.horizontal(|ui| {
            for (target, text) in [
                (AuthMode::SignIn, "Sign in"),
                (AuthMode::Register, "Register"),
                (AuthMode::ResetPassword, "Forgot password?"),
            ] {
                if target != mode && ui.link(text).clicked() {
                    self.auth.mode = target;
                    self.auth.errors = Default::default();
                }
            }
        });
    }

    fn submit_auth_form(&mut self) {
        let email = self.auth.email.trim().to_string();
        let password = self.auth.password.clone();
        let cmd = match self.auth.mode {
            AuthMode::SignIn => BackendCommand::Login { email, password },
            AuthMode::Register => BackendCommand::Register {
                email,
                password,
                name: self.auth.name.trim().to_string(),
            },
            AuthMode::ResetPassword => BackendCommand::ResetPassword { email },
        };
        self.auth.errors = Default::default();
        self.auth.busy = self.send(cmd);
    }
}
