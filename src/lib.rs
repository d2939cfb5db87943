pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod seed;
pub mod state;
pub mod store;
pub mod study_plan;
pub mod views;
