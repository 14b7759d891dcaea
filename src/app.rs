use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::mpsc::{channel, TryRecvError};
use std::thread;
use tracing::{error, info, warn};

use dataset_balancer::config::AppConfig;
use dataset_balancer::core::analysis::{
    analyze_dataset, balance_with_config, suggested_target, BalanceConfig, BalanceProgressMessage,
    TargetStrategy,
};

use crate::state::{AnalysisState, BalanceDialogStep, BalanceRunState, Settings, UIState};
use crate::ui;

pub struct BalancerApp {
    pub config: AppConfig,
    pub settings: Settings,

    pub analysis: AnalysisState,
    pub ui: UIState,
    pub run: BalanceRunState,
}

impl BalancerApp {
    pub fn new(config: AppConfig, settings: Settings) -> Self {
        let target = settings
            .last_target_count
            .unwrap_or(config.default_target_count);
        let ui = UIState::new(target, settings.seed);

        // Prefer last dataset path from settings, fallback to config default
        let dataset_path = settings
            .last_dataset_path
            .clone()
            .unwrap_or_else(|| config.default_dataset_path.clone());

        let mut app = Self {
            config,
            settings,
            analysis: AnalysisState::new(),
            ui,
            run: BalanceRunState::new(),
        };

        if dataset_path.is_dir() {
            app.load_dataset(dataset_path);
        } else {
            warn!("Dataset path does not exist: {:?}", dataset_path);
        }

        app
    }

    /// Open a parent folder and count its classes
    pub fn load_dataset(&mut self, path: PathBuf) {
        info!("Loading dataset from: {:?}", path);
        self.analysis.dataset_path = Some(path.clone());
        self.refresh_analysis();

        self.settings.last_dataset_path = Some(path);
        self.settings.save();
    }

    /// Re-scan the current folder
    pub fn refresh_analysis(&mut self) {
        let Some(path) = self.analysis.dataset_path.clone() else {
            return;
        };

        match analyze_dataset(&path, &self.config.image_extensions) {
            Ok(stats) => {
                self.analysis.stats = Some(stats);
                self.analysis.error = None;
            }
            Err(e) => {
                error!("Failed to analyze {:?}: {}", path, e);
                self.analysis.stats = None;
                self.analysis.error = Some(e.to_string());
            }
        }
    }

    /// Fill the target field from the current class sizes
    pub fn apply_target_strategy(&mut self, strategy: TargetStrategy) {
        if let Some(stats) = &self.analysis.stats {
            let target = suggested_target(stats, strategy);
            info!("Target set to {} ({})", target, strategy.as_str());
            self.ui.target_input = target.to_string();
        }
    }

    pub fn can_balance(&self) -> bool {
        !self.run.running
            && self.ui.target_count().is_some()
            && self.ui.seed().is_ok()
            && self
                .analysis
                .stats
                .as_ref()
                .map(|s| s.class_count() > 0)
                .unwrap_or(false)
    }

    pub fn open_balance_dialog(&mut self) {
        if self.can_balance() {
            self.ui.dialog_step = BalanceDialogStep::Confirm;
        }
    }

    pub fn close_balance_dialog(&mut self) {
        if !self.run.running {
            self.ui.dialog_step = BalanceDialogStep::Hidden;
        }
    }

    /// Start balancing on a worker thread
    pub fn start_balance(&mut self) {
        let (Some(path), Some(target)) = (self.analysis.dataset_path.clone(), self.ui.target_count())
        else {
            warn!("No dataset or target set, cannot balance");
            return;
        };
        let seed = match self.ui.seed() {
            Ok(seed) => seed,
            Err(e) => {
                warn!("Invalid seed {:?}: {}", self.ui.seed_input, e);
                return;
            }
        };

        self.settings.last_target_count = Some(target);
        self.settings.seed = seed;
        self.settings.save();

        let mut config = BalanceConfig::new(target);
        config.extensions = self.config.image_extensions.clone();
        config.augmentation = self.config.augmentation.clone();

        let (tx, rx) = channel();
        self.run = BalanceRunState::new();
        self.run.running = true;
        self.run.progress_receiver = Some(rx);
        self.ui.dialog_step = BalanceDialogStep::Running;

        info!(
            "Starting balance of {:?} to {} per class (seed {:?})",
            path, target, seed
        );

        thread::spawn(move || {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            // Errors are reported on the channel
            let _ = balance_with_config(&path, &config, &mut rng, Some(tx));
            info!("Background thread completed balancing");
        });
    }

    fn poll_balance_progress(&mut self) {
        let mut messages = Vec::new();
        let mut disconnected = false;
        if let Some(receiver) = &self.run.progress_receiver {
            loop {
                match receiver.try_recv() {
                    Ok(message) => messages.push(message),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        let mut finished = false;
        for message in messages {
            finished |= self.run.apply(message);
        }

        // Worker died without a final message
        if disconnected && !finished {
            error!("Balance worker exited unexpectedly");
            finished = self.run.apply(BalanceProgressMessage::Error(
                "Balancing stopped unexpectedly".to_string(),
            ));
        }

        if finished {
            self.ui.dialog_step = BalanceDialogStep::Finished;
            // Partial runs change the folder too
            self.refresh_analysis();
        }
    }
}

impl eframe::App for BalancerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_balance_progress();

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_width = rect.width();
            self.settings.window_height = rect.height();
        }

        ui::render_top_panel(self, ctx);
        ui::render_bottom_panel(self, ctx);
        ui::render_side_panel(self, ctx);
        ui::render_central_panel(self, ctx);
        ui::render_balance_dialog(self, ctx);

        if self.run.running {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}
