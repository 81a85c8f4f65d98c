//! Skill-sheet form builder: a headless edit form with validation and
//! JSON mapping, an HTML preview renderer, JSON export, and the axum
//! service plus client the pages talk to.

pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod form;
pub mod models;
pub mod preview;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
