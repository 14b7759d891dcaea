use crate::app::BalancerApp;
use dataset_balancer::core::analysis::{suggested_target, TargetStrategy};
use egui_phosphor::regular as Icon;

/// Render the bottom panel with target and run controls
pub fn render_bottom_panel(app: &mut BalancerApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.add_space(10.0);

            ui.label(format!("{} Target per class:", Icon::TARGET));
            ui.add(egui::TextEdit::singleline(&mut app.ui.target_input).desired_width(70.0));
            if app.ui.target_count().is_none() {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 0), "must be at least 1");
            }

            // Shortcuts from the current class sizes
            let mut chosen = None;
            if let Some(stats) = &app.analysis.stats {
                for strategy in TargetStrategy::all() {
                    let value = suggested_target(stats, strategy);
                    if ui
                        .small_button(format!("{} ({})", strategy.as_str(), value))
                        .clicked()
                    {
                        chosen = Some(strategy);
                    }
                }
            }
            if let Some(strategy) = chosen {
                app.apply_target_strategy(strategy);
            }

            ui.add_space(20.0);

            ui.label(format!("{} Seed:", Icon::DICE_FIVE));
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.seed_input)
                    .hint_text("random")
                    .desired_width(90.0),
            );
            if app.ui.seed().is_err() {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 0), "invalid seed");
            }

            ui.add_space(20.0);

            let button_text = if app.run.running {
                format!("{} Balancing... {:.0}%", Icon::SCALES, app.run.fraction() * 100.0)
            } else {
                format!("{} Preview & Balance", Icon::SCALES)
            };
            let button =
                egui::Button::new(button_text).fill(egui::Color32::from_rgb(100, 150, 100));
            if ui.add_enabled(app.can_balance(), button).clicked() {
                app.open_balance_dialog();
            }
        });
        ui.add_space(10.0);
    });
}
