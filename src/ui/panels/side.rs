use crate::app::BalancerApp;
use dataset_balancer::core::analysis::get_recommendations;

/// Render the right-hand panel with recommendations for the current target
pub fn render_side_panel(app: &mut BalancerApp, ctx: &egui::Context) {
    let Some(stats) = &app.analysis.stats else {
        return;
    };

    egui::SidePanel::right("recommendations_panel")
        .default_width(app.config.side_panel_width)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("💡 Recommendations")
                    .strong()
                    .size(15.0)
                    .color(egui::Color32::from_rgb(100, 150, 255)),
            );
            ui.separator();

            let Some(target) = app.ui.target_count() else {
                ui.label("Enter a target count to see what balancing will do.");
                return;
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                for recommendation in get_recommendations(stats, target) {
                    ui.label(recommendation);
                    ui.add_space(2.0);
                }
            });
        });
}
