pub mod app;
pub mod hotkey;
pub mod secrets;
pub mod settings;
pub mod task;
pub mod workspace;
