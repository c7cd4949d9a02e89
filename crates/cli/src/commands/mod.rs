pub mod capture;
pub mod config;
pub mod ls;
pub mod rm;
pub mod show;
