pub mod assignments;
pub mod auth;
pub mod geo;
pub mod mechanics;
pub mod requests;
pub mod stations;
