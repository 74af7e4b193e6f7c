pub mod cli;
pub mod database;
pub mod error;
pub mod form;
pub mod gpx;
pub mod session;
pub mod types;
pub mod utils;
pub mod view;
