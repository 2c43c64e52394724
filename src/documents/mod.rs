pub mod controllers;
pub mod models;

pub use controllers::DocumentIngestionController;
