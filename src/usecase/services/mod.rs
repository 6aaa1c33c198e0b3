pub mod aggregation_service;
pub mod batch_loader;
pub mod import_service;
pub mod listing_service;
pub mod normalizer;
pub mod query_builder;
pub mod verify_service;
