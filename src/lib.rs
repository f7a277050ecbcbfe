pub mod acquire;
pub mod app;
pub mod builder;
pub mod cache;
pub mod config;
pub mod display;
pub mod duration;
pub mod error;
pub mod page;
pub mod record;
pub mod sort;
