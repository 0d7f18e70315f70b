pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod lang;
pub mod location;
pub mod log_io;
pub mod model;
pub mod ownership;
pub mod tracker;
