pub mod app;
pub mod components;
pub mod context;
pub mod host;
pub mod routes;
pub mod scripts;
pub mod views;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
pub use host::EvalAnchorHost;
