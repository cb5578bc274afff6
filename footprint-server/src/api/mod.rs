//! HTTP API handlers for footprint-server

pub mod couple;
pub mod health;
pub mod restaurants;

pub use couple::{create_couple, get_couple, join_couple};
pub use health::health_routes;
pub use restaurants::{create_restaurant, delete_restaurant, list_restaurants};
