pub mod app;
pub mod error;
pub mod player;
pub mod session;
pub mod ui;
