// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod bank;
pub mod celebration;
pub mod config;
pub mod error;
pub mod history;
pub mod quiz;
pub mod render;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
