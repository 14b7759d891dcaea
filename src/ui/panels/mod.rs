mod bottom;
mod central;
mod side;
mod top;

pub use bottom::render_bottom_panel;
pub use central::{outcome_color, render_central_panel};
pub use side::render_side_panel;
pub use top::render_top_panel;
