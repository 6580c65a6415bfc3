//! Process wiring: logging, runtime and the listing-then-harvest run.
mod app;

pub use app::run_app;
