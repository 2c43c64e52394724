pub mod ingestion_controller;

pub use ingestion_controller::DocumentIngestionController;
