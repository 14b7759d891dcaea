//! Balance dialog: confirm, progress, and results.

use crate::app::BalancerApp;
use crate::state::BalanceDialogStep;
use crate::ui::panels::outcome_color;
use dataset_balancer::core::analysis::{BalanceOutcome, BalanceSummary, ClassReport};
use egui_phosphor::regular as Icon;

/// Render whichever step of the balance dialog is active
pub fn render_balance_dialog(app: &mut BalancerApp, ctx: &egui::Context) {
    match app.ui.dialog_step {
        BalanceDialogStep::Hidden => {}
        BalanceDialogStep::Confirm => render_confirm_dialog(app, ctx),
        BalanceDialogStep::Running => render_progress_dialog(app, ctx),
        BalanceDialogStep::Finished => render_result_dialog(app, ctx),
    }
}

/// Preview what the run will do before anything is touched
fn render_confirm_dialog(app: &mut BalancerApp, ctx: &egui::Context) {
    let Some(target) = app.ui.target_count() else {
        app.close_balance_dialog();
        return;
    };
    let Some(stats) = app.analysis.stats.as_ref() else {
        app.close_balance_dialog();
        return;
    };

    let outcomes = stats.projected_outcomes(target);
    let creates: usize = outcomes
        .iter()
        .filter_map(|(_, o)| match o {
            BalanceOutcome::Oversample(n) => Some(*n),
            _ => None,
        })
        .sum();
    let deletes: usize = outcomes
        .iter()
        .filter_map(|(_, o)| match o {
            BalanceOutcome::Undersample(n) => Some(*n),
            _ => None,
        })
        .sum();
    let empty_classes: Vec<String> = stats
        .empty_classes()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut should_start = false;
    let mut should_close = false;

    egui::Window::new(format!("{} Balance Preview", Icon::SCALES))
        .collapsible(false)
        .resizable(true)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading(format!("Balance every class to {} images", target));
            ui.add_space(10.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("CHANGES").strong().size(14.0));
                ui.add_space(5.0);
                egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for (name, outcome) in &outcomes {
                        ui.horizontal(|ui| {
                            ui.label(name.as_str());
                            ui.colored_label(outcome_color(outcome), outcome.describe());
                        });
                    }
                });
                ui.add_space(5.0);
                ui.label(format!(
                    "{} augmented copies will be written, {} files deleted",
                    creates, deletes
                ));
            });

            if !empty_classes.is_empty() {
                ui.add_space(5.0);
                ui.colored_label(
                    egui::Color32::from_rgb(255, 200, 0),
                    format!(
                        "{} Empty classes cannot be oversampled: {}. The run will stop before changing anything.",
                        Icon::WARNING,
                        empty_classes.join(", ")
                    ),
                );
            }

            if deletes > 0 {
                ui.add_space(5.0);
                ui.colored_label(
                    egui::Color32::from_rgb(255, 120, 120),
                    format!(
                        "{} Deleted files are removed permanently and cannot be restored.",
                        Icon::TRASH
                    ),
                );
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let button = egui::Button::new(format!("{} Balance", Icon::CHECK))
                    .fill(egui::Color32::from_rgb(100, 150, 100));
                if ui.add(button).clicked() {
                    should_start = true;
                }
                if ui.button(format!("{} Cancel", Icon::X)).clicked() {
                    should_close = true;
                }
            });
        });

    if should_start {
        app.start_balance();
    } else if should_close {
        app.close_balance_dialog();
    }
}

/// Progress bar while the worker thread runs
fn render_progress_dialog(app: &mut BalancerApp, ctx: &egui::Context) {
    egui::Window::new(format!("{} Balancing", Icon::SCALES))
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if app.run.total > 0 {
                ui.add(egui::ProgressBar::new(app.run.fraction()).text(format!(
                    "{} / {} files",
                    app.run.current, app.run.total
                )));
                ui.label(format!("Class: {}", app.run.current_class));
                ui.label(format!("{} {}", Icon::FILE, app.run.last_file));
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Planning...");
                });
            }

            if !app.run.completed.is_empty() {
                ui.add_space(5.0);
                ui.label(format!("{} classes done", app.run.completed.len()));
            }
        });
}

/// Results after the run ends
fn render_result_dialog(app: &mut BalancerApp, ctx: &egui::Context) {
    let mut should_close = false;

    egui::Window::new(format!("{} Balance Results", Icon::SCALES))
        .collapsible(false)
        .resizable(true)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            match (&app.run.summary, &app.run.error) {
                (Some(summary), _) => render_summary(ui, summary),
                (None, Some(error)) => {
                    ui.colored_label(
                        egui::Color32::from_rgb(255, 120, 120),
                        format!("{} Balancing failed: {}", Icon::WARNING, error),
                    );
                    if !app.run.completed.is_empty() {
                        ui.add_space(5.0);
                        ui.label("These classes were already changed:");
                        render_reports(ui, &app.run.completed);
                    }
                }
                (None, None) => {
                    ui.label("Balancing finished.");
                }
            }

            ui.add_space(10.0);
            if ui.button("Close").clicked() {
                should_close = true;
            }
        });

    if should_close {
        app.close_balance_dialog();
    }
}

fn render_summary(ui: &mut egui::Ui, summary: &BalanceSummary) {
    ui.label(
        egui::RichText::new(format!(
            "{} Every class now has {} images",
            Icon::CHECK,
            summary.target_count
        ))
        .color(egui::Color32::from_rgb(100, 200, 100))
        .strong(),
    );
    ui.label(format!(
        "{} created, {} deleted, {} of {} classes changed",
        summary.total_created(),
        summary.total_deleted(),
        summary.classes_changed(),
        summary.reports.len()
    ));
    ui.add_space(5.0);
    render_reports(ui, &summary.reports);
}

fn render_reports(ui: &mut egui::Ui, reports: &[ClassReport]) {
    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        egui::Grid::new("balance_reports")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for report in reports {
                    ui.label(report.class_name.as_str());
                    ui.label(format!("{} → {}", report.before, report.after));
                    ui.colored_label(outcome_color(&report.outcome), report.outcome.describe());
                    ui.end_row();
                }
            });
    });
}
