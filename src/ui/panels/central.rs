use crate::app::BalancerApp;
use dataset_balancer::core::analysis::{
    decide_outcome, BalanceOutcome, BalanceStats,
};
use egui_phosphor::regular as Icon;

/// Text color for a projected outcome
pub fn outcome_color(outcome: &BalanceOutcome) -> egui::Color32 {
    match outcome {
        BalanceOutcome::Oversample(_) => egui::Color32::from_rgb(100, 200, 100),
        BalanceOutcome::Undersample(_) => egui::Color32::from_rgb(230, 120, 90),
        BalanceOutcome::Unchanged => egui::Color32::GRAY,
    }
}

/// Render the central panel with the class table
pub fn render_central_panel(app: &mut BalancerApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &app.analysis.error {
            ui.colored_label(
                egui::Color32::from_rgb(255, 120, 120),
                format!("{} {}", Icon::WARNING, error),
            );
            return;
        }

        let Some(stats) = &app.analysis.stats else {
            ui.centered_and_justified(|ui| {
                ui.heading("No dataset loaded. Click 'Open Dataset Folder' to begin.");
            });
            return;
        };

        if stats.classes.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.heading("No class folders found in this folder.");
            });
            return;
        }

        let target = app.ui.target_count();

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::CollapsingHeader::new(
                egui::RichText::new(format!("{} Class Distribution", Icon::CHART_BAR))
                    .strong()
                    .size(15.0),
            )
            .default_open(true)
            .show(ui, |ui| {
                render_distribution_section(ui, stats, target);
            });
        });
    });
}

fn render_distribution_section(ui: &mut egui::Ui, stats: &BalanceStats, target: Option<usize>) {
    ui.label(format!(
        "📂 {} images in {} classes (min {}, max {}, mean {:.1})",
        stats.total_images,
        stats.class_count(),
        stats.min_count(),
        stats.max_count(),
        stats.mean_count()
    ));
    ui.add_space(5.0);

    egui::Grid::new("class_distribution")
        .num_columns(5)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Class");
            ui.strong("Images");
            ui.strong("Share");
            ui.strong("Change");
            ui.strong("After");
            ui.end_row();

            for class in &stats.classes {
                ui.label(class.name.as_str());
                ui.label(class.count.to_string());
                ui.label(format!("{:.1}%", stats.get_percentage(&class.name)));

                match target {
                    Some(target) => {
                        let outcome = decide_outcome(class.count, target);
                        ui.colored_label(outcome_color(&outcome), outcome.describe());
                        ui.label(target.to_string());
                    }
                    None => {
                        ui.label("-");
                        ui.label("-");
                    }
                }
                ui.end_row();
            }
        });
}
