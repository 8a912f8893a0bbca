pub mod app;
pub mod cli;
pub mod config;
pub mod loader;
pub mod map;
pub mod position;
pub mod render;
pub mod search;
pub mod state;
pub mod worker;
