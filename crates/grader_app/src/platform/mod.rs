mod app;
mod cli;
mod config;
mod effects;
mod form_input;
mod logging;
mod ui;

pub use app::run_app;
