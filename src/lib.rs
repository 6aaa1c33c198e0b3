pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod usecase;
