use crate::app::BalancerApp;
use egui_phosphor::regular as Icon;

/// Render the top panel with dataset controls
pub fn render_top_panel(app: &mut BalancerApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Dataset Balancer", Icon::SCALES));

            ui.add_space(20.0);

            let idle = !app.run.running;
            if ui
                .add_enabled(
                    idle,
                    egui::Button::new(format!("{} Open Dataset Folder", Icon::FOLDER_OPEN)),
                )
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    app.load_dataset(path);
                }
            }

            if let Some(path) = app.analysis.dataset_path.clone() {
                if ui
                    .add_enabled(
                        idle,
                        egui::Button::new(format!("{} Reload", Icon::ARROWS_CLOCKWISE)),
                    )
                    .clicked()
                {
                    app.refresh_analysis();
                }

                ui.add_space(20.0);
                ui.label(format!("{} {}", Icon::FOLDERS, path.display()));
            }
        });
    });
}
