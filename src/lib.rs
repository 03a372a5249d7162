//! Personal styling API: closet management, outfit suggestions, color
//! analysis and shopping gaps over a per-user wardrobe.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
