pub mod features;
pub mod ids;
pub mod ui;

pub use features::*;
pub use ids::*;
pub use ui::*;
