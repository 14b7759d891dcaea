pub mod balance_dialog;
pub mod panels;

pub use balance_dialog::render_balance_dialog;
pub use panels::{
    render_bottom_panel, render_central_panel, render_side_panel, render_top_panel,
};
