use client_core::{catalog, validation::fields, WizardError, WizardState, WizardStep};
use eframe::egui;
use shared::{
    domain::{ContentType, Tone},
    protocol::{
        FormValues, GenerationResult, GenerationStage, StageStatus, MAX_WORD_COUNT,
        MIN_WORD_COUNT,
    },
};

use super::app::{field_error, DesktopGuiApp};
use crate::backend_bridge::commands::BackendCommand;

impl DesktopGuiApp {
    pub(crate) fn show_generate_view(&mut self, ui: &mut egui::Ui) {
        let finished = self
            .generation
            .as_ref()
            .and_then(|generation| generation.result.clone());
        if let Some(result) = finished {
            self.show_result(ui, &result);
            return;
        }
        if self.generation.is_some() {
            self.show_progress(ui);
            return;
        }
        self.show_wizard(ui);
    }

    fn show_wizard(&mut self, ui: &mut egui::Ui) {
        let step = self.wizard.current_step();
        let submitting = self.wizard.state() == WizardState::Submitting;

        ui.horizontal(|ui| {
            ui.heading(step.title());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!(
                    "Step {} of {}",
                    self.wizard.step_number(),
                    self.wizard.total_steps()
                ));
            });
        });
        ui.weak(step.description());
        ui.add(egui::ProgressBar::new(self.wizard.completion()));
        ui.add_space(8.0);

        if let Some(notification) = self.wizard.notification().map(|n| n.message.clone()) {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(240, 71, 71), notification);
                if ui.small_button("Dismiss").clicked() {
                    self.wizard.dismiss_notification();
                }
            });
        }

        let errors = self.wizard.errors().clone();
        let mut competitor_input = std::mem::take(&mut self.competitor_input);
        let mut link_input = std::mem::take(&mut self.link_input);
        if let Some(values) = self.wizard.values_mut() {
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(12.0)
                .inner_margin(egui::Margin::symmetric(14, 12))
                .show(ui, |ui| match step {
                    WizardStep::Target => target_fields(ui, values, &errors),
                    WizardStep::StyleAndAudience => style_fields(ui, values, &errors),
                    WizardStep::AdvancedOptions => advanced_fields(
                        ui,
                        values,
                        &errors,
                        &mut competitor_input,
                        &mut link_input,
                    ),
                });
        }
        self.competitor_input = competitor_input;
        self.link_input = link_input;

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let can_go_back = step != WizardStep::FIRST && !submitting;
            if ui.add_enabled(can_go_back, egui::Button::new("Back")).clicked() {
                self.wizard.back();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if step == WizardStep::LAST {
                    let label = if submitting { "Submitting..." } else { "Generate content" };
                    if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
                        self.submit_wizard();
                    }
                } else if ui.button("Next").clicked() {
                    if let Err(err) = self.wizard.advance() {
                        self.status = wizard_status(&err);
                    }
                }
            });
        });
    }

    fn submit_wizard(&mut self) {
        match self.wizard.begin_submit() {
            Ok(brief) => {
                self.pending_brief = Some(brief.clone());
                if !self.send(BackendCommand::Submit { brief }) {
                    if let Some(brief) = self.pending_brief.take() {
                        let _ = self.wizard.finish_submit(brief, Err(self.status.clone()));
                    }
                }
            }
            Err(err) => self.status = wizard_status(&err),
        }
    }

    fn show_progress(&mut self, ui: &mut egui::Ui) {
        let Some(generation) = self.generation.as_ref() else {
            return;
        };
        let progress = generation.progress;
        let cancel_requested = generation.cancel_requested;

        ui.heading("Generating your content");
        if let Some(brief) = self.wizard.brief() {
            ui.weak(format!(
                "{} for \"{}\" in {}",
                brief.content_type.label(),
                brief.keyword,
                brief.location
            ));
        }
        ui.add_space(8.0);
        ui.add(
            egui::ProgressBar::new((progress.percent / 100.0) as f32)
                .text(format!("{}%", progress.rounded_percent())),
        );
        ui.add_space(8.0);

        for stage in GenerationStage::ALL {
            let (marker, color) = match progress.stage_status(stage) {
                StageStatus::Completed => ("✔", egui::Color32::from_rgb(67, 181, 129)),
                StageStatus::Active => ("●", ui.visuals().hyperlink_color),
                StageStatus::Pending => ("○", ui.visuals().weak_text_color()),
            };
            ui.horizontal(|ui| {
                ui.colored_label(color, marker);
                ui.vertical(|ui| {
                    ui.strong(stage.title());
                    ui.weak(format!(
                        "{} (~{}s)",
                        stage.description(),
                        stage.estimated_secs()
                    ));
                });
            });
        }

        ui.add_space(10.0);
        let label = if cancel_requested { "Cancelling..." } else { "Cancel" };
        if ui
            .add_enabled(!cancel_requested, egui::Button::new(label))
            .clicked()
            && self.send(BackendCommand::CancelGeneration)
        {
            if let Some(generation) = self.generation.as_mut() {
                generation.cancel_requested = true;
            }
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui, result: &GenerationResult) {
        ui.heading(result.title.as_str());
        ui.horizontal(|ui| {
            ui.label(format!("SEO score: {}", result.seo_score));
            ui.separator();
            ui.label(format!("{} words", result.word_count));
        });
        ui.add_space(8.0);
        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.label(result.content.as_str());
            });
        ui.add_space(8.0);
        ui.strong("Suggestions");
        for suggestion in &result.suggestions {
            ui.label(format!("• {suggestion}"));
        }
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Edit brief").clicked() {
                self.send(BackendCommand::DiscardGeneration);
                self.return_to_wizard();
            }
            if ui.button("Start over").clicked() {
                self.start_over();
            }
        });
    }
}

fn wizard_status(err: &WizardError) -> String {
    match err.validation_errors() {
        Some(errors) => format!("Please fix {} field(s) before continuing", errors.len()),
        None => err.to_string(),
    }
}

fn target_fields(ui: &mut egui::Ui, values: &mut FormValues, errors: &shared::error::ValidationErrors) {
    ui.label(egui::RichText::new("Target keyword").strong());
    ui.add(
        egui::TextEdit::singleline(&mut values.keyword)
            .id_salt("wizard_keyword")
            .hint_text("e.g. content marketing strategy")
            .desired_width(f32::INFINITY),
    );
    field_error(ui, errors, fields::KEYWORD);
    let suggestions = catalog::suggest_keywords(&values.keyword);
    if !suggestions.is_empty() {
        ui.horizontal_wrapped(|ui| {
            ui.weak("Suggestions:");
            for suggestion in suggestions {
                let text = format!(
                    "{} · {} · {}",
                    suggestion.keyword,
                    suggestion.volume,
                    suggestion.difficulty_band().label()
                );
                if ui.small_button(text).clicked() {
                    values.keyword = suggestion.keyword.to_string();
                }
            }
        });
    }

    ui.label(egui::RichText::new("Location").strong());
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut values.location)
                .id_salt("wizard_location")
                .hint_text("e.g. United States"),
        );
        egui::ComboBox::from_id_salt("wizard_location_pick")
            .selected_text("Pick")
            .show_ui(ui, |ui| {
                for country in &catalog::COUNTRIES {
                    ui.selectable_value(
                        &mut values.location,
                        country.name.to_string(),
                        country.name,
                    );
                }
            });
    });
    field_error(ui, errors, fields::LOCATION);

    ui.label(egui::RichText::new("Content type").strong());
    egui::ComboBox::from_id_salt("wizard_content_type")
        .selected_text(values.content_type.map_or("Select content type", ContentType::label))
        .show_ui(ui, |ui| {
            for content_type in ContentType::ALL {
                ui.selectable_value(&mut values.content_type, Some(*content_type), content_type.label());
            }
        });
    field_error(ui, errors, fields::CONTENT_TYPE);

    ui.label(egui::RichText::new("Word count").strong());
    ui.add(egui::Slider::new(&mut values.word_count, MIN_WORD_COUNT..=MAX_WORD_COUNT).step_by(100.0));
    field_error(ui, errors, fields::WORD_COUNT);
}

fn style_fields(ui: &mut egui::Ui, values: &mut FormValues, errors: &shared::error::ValidationErrors) {
    ui.label(egui::RichText::new("Tone").strong());
    ui.horizontal_wrapped(|ui| {
        for tone in Tone::ALL {
            ui.selectable_value(&mut values.tone, Some(*tone), tone.label());
        }
    });
    field_error(ui, errors, fields::TONE);

    ui.label(egui::RichText::new("Target audience").strong());
    ui.add(
        egui::TextEdit::multiline(&mut values.target_audience)
            .id_salt("wizard_audience")
            .hint_text("Who is this content for?")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    field_error(ui, errors, fields::TARGET_AUDIENCE);
}

fn advanced_fields(
    ui: &mut egui::Ui,
    values: &mut FormValues,
    errors: &shared::error::ValidationErrors,
    competitor_input: &mut String,
    link_input: &mut String,
) {
    ui.checkbox(&mut values.include_images, "Include image suggestions");
    ui.add_space(6.0);

    ui.label(egui::RichText::new("Competitor URLs").strong());
    url_list(ui, "competitor", &mut values.competitor_urls, competitor_input);
    for (index, _) in values.competitor_urls.iter().enumerate() {
        field_error(ui, errors, &format!("{}.{index}", fields::COMPETITOR_URLS));
    }

    ui.add_space(6.0);
    ui.label(egui::RichText::new("Internal links").strong());
    url_list(ui, "internal_link", &mut values.internal_links, link_input);
}

fn url_list(ui: &mut egui::Ui, id: &str, urls: &mut Vec<String>, input: &mut String) {
    let mut remove = None;
    for (index, url) in urls.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(url).id_salt((id, index)).desired_width(360.0));
            if ui.small_button("Remove").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        urls.remove(index);
    }
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(input)
                .id_salt((id, "new"))
                .hint_text("https://")
                .desired_width(360.0),
        );
        if ui.small_button("Add").clicked() && !input.trim().is_empty() {
            urls.push(std::mem::take(input).trim().to_string());
        }
    });
}
