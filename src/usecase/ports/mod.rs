pub mod repo;
pub mod sheet;
