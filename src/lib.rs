// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod engine;
pub mod runtime;
pub mod theme;
pub mod ui;
