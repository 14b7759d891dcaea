mod app_state;
mod settings;

pub use app_state::{AnalysisState, BalanceDialogStep, BalanceRunState, UIState};
pub use settings::Settings;
