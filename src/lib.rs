pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod parser;
pub mod schedule;
pub mod selftest;
pub mod services;
pub mod stream;
