// Library surface for headless/integration tests and reuse.
// The binary only adds terminal setup, key bindings and rendering.
pub mod app_dirs;
pub mod best;
pub mod config;
pub mod dataset;
pub mod i18n;
pub mod judge;
pub mod keyboard;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod task;
pub mod typing_policy;
