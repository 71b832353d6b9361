// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod grader;
pub mod host;
pub mod logging;
pub mod questions;
pub mod route;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;

pub use app::App;
pub use controller::SessionController;
