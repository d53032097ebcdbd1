pub mod api;
pub mod auth;
pub mod codec;
pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod gpx;
pub mod server;
