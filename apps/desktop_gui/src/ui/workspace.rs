use client_core::{
    analytics::{calculate_roi, sort_rankings, RankingSort, RankingTrend},
    catalog,
    projects::{completion_percent, fields, ProjectSort},
};
use eframe::egui;
use shared::domain::{ApiKeyStatus, ProjectStatus};

use super::app::{field_error, DesktopGuiApp};
use crate::backend_bridge::commands::BackendCommand;

const TIMELINES: [&str; 4] = ["1 month", "3 months", "6 months", "12 months"];

fn project_status_color(status: ProjectStatus) -> egui::Color32 {
    match status {
        ProjectStatus::Active => egui::Color32::from_rgb(67, 181, 129),
        ProjectStatus::Paused => egui::Color32::from_rgb(250, 166, 26),
        ProjectStatus::Completed => egui::Color32::from_rgb(114, 137, 218),
    }
}

fn api_key_status_color(status: ApiKeyStatus) -> egui::Color32 {
    match status {
        ApiKeyStatus::Connected => egui::Color32::from_rgb(67, 181, 129),
        ApiKeyStatus::Disconnected => egui::Color32::GRAY,
        ApiKeyStatus::Error => egui::Color32::from_rgb(240, 71, 71),
    }
}

impl DesktopGuiApp {
    pub(crate) fn show_projects_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Projects");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.projects.form_open { "Close" } else { "New project" };
                if ui.button(label).clicked() {
                    self.projects.form_open = !self.projects.form_open;
                }
            });
        });

        if self.projects.form_open {
            self.show_project_form(ui);
            ui.separator();
        }

        let mut changed = false;
        ui.horizontal(|ui| {
            changed |= ui
                .add(
                    egui::TextEdit::singleline(&mut self.projects.filter.query)
                        .id_salt("project_search")
                        .hint_text("Search projects"),
                )
                .changed();
            egui::ComboBox::from_id_salt("project_status_filter")
                .selected_text(self.projects.filter.status.map_or("All statuses", ProjectStatus::label))
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.projects.filter.status, None, "All statuses")
                        .changed();
                    for status in ProjectStatus::ALL {
                        changed |= ui
                            .selectable_value(&mut self.projects.filter.status, Some(*status), status.label())
                            .changed();
                    }
                });
            changed |= ui
                .selectable_value(&mut self.projects.sort, ProjectSort::RecentlyUpdated, "Recent")
                .changed();
            changed |= ui
                .selectable_value(&mut self.projects.sort, ProjectSort::Name, "Name")
                .changed();
        });
        if changed {
            self.refresh_projects();
        }
        ui.add_space(6.0);

        if self.projects.records.is_empty() {
            ui.weak("No projects match.");
            return;
        }

        let mut commands = Vec::new();
        for project in &self.projects.records {
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.strong(project.name.as_str());
                        ui.colored_label(project_status_color(project.status), project.status.label());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let active = self.projects.active == Some(project.id);
                            if ui
                                .add(egui::Button::new("Credit generations").selected(active))
                                .clicked()
                            {
                                commands.push(ProjectAction::ToggleActive(project.id));
                            }
                            for status in ProjectStatus::ALL {
                                if *status != project.status && ui.small_button(status.label()).clicked() {
                                    commands.push(ProjectAction::SetStatus(project.id, *status));
                                }
                            }
                        });
                    });
                    ui.weak(project.description.as_str());
                    ui.horizontal_wrapped(|ui| {
                        for keyword in &project.keywords {
                            ui.small(format!("#{keyword}"));
                        }
                    });
                    let percent = completion_percent(project);
                    ui.add(
                        egui::ProgressBar::new(percent as f32 / 100.0).text(format!(
                            "{} / {} pieces ({percent}%)",
                            project.content_count, project.content_goal
                        )),
                    );
                });
            ui.add_space(4.0);
        }

        for action in commands {
            match action {
                ProjectAction::ToggleActive(project_id) => {
                    self.projects.active = if self.projects.active == Some(project_id) {
                        None
                    } else {
                        Some(project_id)
                    };
                }
                ProjectAction::SetStatus(project_id, status) => {
                    self.send(BackendCommand::SetProjectStatus { project_id, status });
                }
            }
        }
    }

    fn show_project_form(&mut self, ui: &mut egui::Ui) {
        let errors = self.projects.errors.clone();
        let draft = &mut self.projects.draft;

        egui::Grid::new("project_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Name");
                ui.vertical(|ui| {
                    ui.text_edit_singleline(&mut draft.name);
                    field_error(ui, &errors, fields::NAME);
                });
                ui.end_row();

                ui.label("Description");
                ui.vertical(|ui| {
                    ui.text_edit_multiline(&mut draft.description);
                    field_error(ui, &errors, fields::DESCRIPTION);
                });
                ui.end_row();

                ui.label("Category");
                ui.vertical(|ui| {
                    ui.text_edit_singleline(&mut draft.category);
                    field_error(ui, &errors, fields::CATEGORY);
                });
                ui.end_row();

                ui.label("Keywords");
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut self.projects.keyword_input);
                        if ui.small_button("Add").clicked() {
                            let raw = std::mem::take(&mut self.projects.keyword_input);
                            draft.add_keyword(&raw);
                        }
                    });
                    let mut removed = None;
                    ui.horizontal_wrapped(|ui| {
                        for keyword in &draft.keywords {
                            if ui.small_button(format!("{keyword} ✕")).clicked() {
                                removed = Some(keyword.clone());
                            }
                        }
                    });
                    if let Some(keyword) = removed {
                        draft.remove_keyword(&keyword);
                    }
                    field_error(ui, &errors, fields::KEYWORDS);
                });
                ui.end_row();

                ui.label("Target country");
                ui.vertical(|ui| {
                    let selected = catalog::country_by_code(&draft.target_country)
                        .map_or("Select country", |country| country.name);
                    egui::ComboBox::from_id_salt("project_country")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for country in &catalog::COUNTRIES {
                                ui.selectable_value(
                                    &mut draft.target_country,
                                    country.code.to_string(),
                                    country.name,
                                );
                            }
                        });
                    field_error(ui, &errors, fields::TARGET_COUNTRY);
                });
                ui.end_row();

                ui.label("Content goal");
                ui.vertical(|ui| {
                    ui.add(egui::DragValue::new(&mut draft.content_goal).range(0..=1000));
                    field_error(ui, &errors, fields::CONTENT_GOAL);
                });
                ui.end_row();

                ui.label("Timeline");
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        for timeline in TIMELINES {
                            ui.selectable_value(&mut draft.timeline, timeline.to_string(), timeline);
                        }
                    });
                    field_error(ui, &errors, fields::TIMELINE);
                });
                ui.end_row();

                ui.label("Template");
                ui.vertical(|ui| {
                    ui.checkbox(&mut draft.use_template, "Start from a template");
                    if draft.use_template {
                        for template in &catalog::PROJECT_TEMPLATES {
                            ui.radio_value(
                                &mut draft.template,
                                Some(template.id.to_string()),
                                format!("{}: {}", template.name, template.description),
                            );
                        }
                    }
                    field_error(ui, &errors, fields::TEMPLATE);
                });
                ui.end_row();
            });

        if ui.button("Create project").clicked() {
            let errors = self.projects.draft.validate();
            if errors.is_empty() {
                let draft = self.projects.draft.clone();
                self.send(BackendCommand::CreateProject { draft });
            } else {
                self.projects.errors = errors;
            }
        }
    }

    pub(crate) fn show_analytics_view(&mut self, ui: &mut egui::Ui) {
        ui.heading("ROI calculator");
        let roi = &mut self.analytics.roi;
        egui::Grid::new("roi_inputs")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for (label, value, speed) in [
                    ("Tool subscription ($/month)", &mut roi.tool_subscription, 1.0),
                    ("Time investment (hours/month)", &mut roi.time_investment_hours, 1.0),
                    ("Hourly rate ($)", &mut roi.hourly_rate, 1.0),
                    ("Content pieces / month", &mut roi.content_generated, 1.0),
                    ("Traffic increase (%)", &mut roi.traffic_increase, 1.0),
                    ("Conversion rate (%)", &mut roi.conversion_rate, 0.1),
                    ("Average order value ($)", &mut roi.avg_order_value, 1.0),
                ] {
                    ui.label(label);
                    ui.add(egui::DragValue::new(value).speed(speed).range(0.0..=1_000_000.0));
                    ui.end_row();
                }
            });

        let report = calculate_roi(&self.analytics.roi);
        ui.add_space(6.0);
        egui::Grid::new("roi_report").num_columns(2).striped(true).show(ui, |ui| {
            ui.label("Total costs");
            ui.label(format!("${:.2}", report.total_costs));
            ui.end_row();
            ui.label("Projected revenue");
            ui.label(format!("${:.2}", report.revenue));
            ui.end_row();
            ui.label("Profit");
            let color = if report.is_profitable() {
                egui::Color32::from_rgb(67, 181, 129)
            } else {
                egui::Color32::from_rgb(240, 71, 71)
            };
            ui.colored_label(color, format!("${:.2}", report.profit));
            ui.end_row();
            ui.label("ROI");
            ui.label(report.roi_percent.map_or("n/a".to_string(), |roi| format!("{roi:.1}%")));
            ui.end_row();
            ui.label("Additional visitors");
            ui.label(format!("{:.0}", report.additional_visitors));
            ui.end_row();
            ui.label("Expected conversions");
            ui.label(format!("{:.1}", report.expected_conversions));
            ui.end_row();
            ui.label("Hours saved");
            ui.label(format!("{:.1}", report.hours_saved));
            ui.end_row();
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.heading("Keyword rankings");
            let before = self.analytics.ranking_sort;
            ui.selectable_value(&mut self.analytics.ranking_sort, RankingSort::CurrentRank, "By rank");
            ui.selectable_value(&mut self.analytics.ranking_sort, RankingSort::SearchVolume, "By volume");
            if before != self.analytics.ranking_sort {
                sort_rankings(&mut self.analytics.rankings, self.analytics.ranking_sort);
            }
        });
        egui::Grid::new("rankings").num_columns(5).striped(true).show(ui, |ui| {
            for header in ["Keyword", "Rank", "Change", "Volume", "Difficulty"] {
                ui.strong(header);
            }
            ui.end_row();
            for ranking in &self.analytics.rankings {
                ui.label(ranking.keyword.as_str());
                ui.label(format!("#{}", ranking.current_rank));
                let trend = ranking.trend();
                let color = match trend {
                    RankingTrend::Improved(_) => egui::Color32::from_rgb(67, 181, 129),
                    RankingTrend::Declined(_) => egui::Color32::from_rgb(240, 71, 71),
                    RankingTrend::Unchanged => ui.visuals().weak_text_color(),
                };
                ui.colored_label(color, trend.to_string());
                ui.label(ranking.search_volume.to_string());
                ui.label(ranking.difficulty.label());
                ui.end_row();
            }
        });
    }

    pub(crate) fn show_api_keys_view(&mut self, ui: &mut egui::Ui) {
        ui.heading("API keys");
        let missing: Vec<String> = self
            .api_keys
            .iter()
            .filter(|entry| entry.required && !entry.is_configured())
            .map(|entry| entry.name.clone())
            .collect();
        if !missing.is_empty() {
            ui.colored_label(
                egui::Color32::from_rgb(250, 166, 26),
                format!("Required keys missing: {}", missing.join(", ")),
            );
        }

        let mut commands = Vec::new();
        for entry in &self.api_keys {
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.strong(entry.name.as_str());
                        if entry.required {
                            ui.small("required");
                        }
                        ui.colored_label(api_key_status_color(entry.status), entry.status.label());
                    });
                    ui.weak(entry.description.as_str());
                    ui.hyperlink_to("Documentation", entry.documentation_url.as_str());
                    if entry.is_configured() {
                        ui.monospace(entry.masked_key());
                    }
                    let draft = self.api_key_drafts.entry(entry.name.clone()).or_default();
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(draft)
                                .id_salt(("api_key", entry.name.as_str()))
                                .password(true)
                                .hint_text("Paste key"),
                        );
                        if ui.button("Save").clicked() {
                            commands.push(BackendCommand::UpdateApiKey {
                                name: entry.name.clone(),
                                key: std::mem::take(draft),
                            });
                        }
                        if ui.button("Test").clicked() {
                            commands.push(BackendCommand::TestApiKey {
                                name: entry.name.clone(),
                            });
                        }
                    });
                });
            ui.add_space(4.0);
        }
        for cmd in commands {
            self.send(cmd);
        }
    }
}

enum ProjectAction {
    ToggleActive(shared::domain::ProjectId),
    SetStatus(shared::domain::ProjectId, ProjectStatus),
}
