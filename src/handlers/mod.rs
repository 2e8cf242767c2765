pub mod health;
pub mod mt700;
pub mod root;

pub use health::{health_handler, ready_handler};
pub use mt700::generate_mt700_handler;
pub use root::root_handler;
