pub mod title;

pub use title::synthesize_title;
