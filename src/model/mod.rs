pub mod config;
pub mod display_log;
pub mod mode;
pub mod view;
