use client_core::{catalog, validation::fields};
use eframe::egui;

use super::app::{field_error, DesktopGuiApp};
use crate::backend_bridge::commands::BackendCommand;

fn profile_text_field(ui: &mut egui::Ui, id: &'static str, label: &str, value: &mut String) {
    ui.label(egui::RichText::new(label).strong());
    ui.add(
        egui::TextEdit::singleline(value)
            .id_salt(id)
            .desired_width(f32::INFINITY),
    );
}

fn choice_combo(
    ui: &mut egui::Ui,
    id: &'static str,
    placeholder: &str,
    choices: &[(&'static str, &'static str)],
    value: &mut String,
) {
    let selected = if value.is_empty() {
        placeholder.to_string()
    } else {
        catalog::choice_label(choices, value).to_string()
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (code, label) in choices {
                ui.selectable_value(value, code.to_string(), *label);
            }
        });
}

impl DesktopGuiApp {
    pub(crate) fn show_profile_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Profile");
        ui.weak("Update your personal information and preferences.");
        ui.add_space(6.0);

        let errors = self.profile.errors.clone();
        let saving = self.profile.saving;
        let draft = &mut self.profile.draft;
        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.columns(2, |columns| {
                    profile_text_field(&mut columns[0], "profile_first_name", "First name *", &mut draft.first_name);
                    field_error(&mut columns[0], &errors, fields::FIRST_NAME);
                    profile_text_field(&mut columns[1], "profile_last_name", "Last name *", &mut draft.last_name);
                    field_error(&mut columns[1], &errors, fields::LAST_NAME);
                });
                profile_text_field(ui, "profile_email", "Email *", &mut draft.email);
                field_error(ui, &errors, fields::EMAIL);
                ui.columns(2, |columns| {
                    profile_text_field(&mut columns[0], "profile_company", "Company", &mut draft.company);
                    profile_text_field(&mut columns[1], "profile_job_title", "Job title", &mut draft.job_title);
                });
                ui.label(egui::RichText::new("Bio").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut draft.bio)
                        .id_salt("profile_bio")
                        .hint_text("Tell us about yourself")
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("Timezone *").strong());
                        choice_combo(ui, "profile_timezone", "Select timezone", &catalog::TIMEZONES, &mut draft.timezone);
                        field_error(ui, &errors, fields::TIMEZONE);
                    });
                    ui.add_space(16.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("Language *").strong());
                        choice_combo(ui, "profile_language", "Select language", &catalog::LANGUAGES, &mut draft.language);
                        field_error(ui, &errors, fields::LANGUAGE);
                    });
                });
            });

        ui.add_space(8.0);
        let label = if saving { "Saving..." } else { "Save changes" };
        if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
            self.save_profile();
        }
        ui.add_space(10.0);
    }

    /// Field messages show immediately; only a clean draft reaches the backend.
    fn save_profile(&mut self) {
        let errors = self.profile.draft.validate();
        if !errors.is_empty() {
            self.profile.errors = errors;
            return;
        }
        self.profile.errors = Default::default();
        let draft = self.profile.draft.clone();
        if self.send(BackendCommand::UpdateProfile { draft }) {
            self.profile.saving = true;
        }
    }
}
