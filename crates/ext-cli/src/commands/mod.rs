//! Command implementations for ext-cli

pub mod confirm;
pub mod list;
pub mod plan;
pub mod show;

pub use confirm::run_confirm;
pub use list::run_list;
pub use plan::run_plan;
pub use show::run_show;
