pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod service;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod testing;
