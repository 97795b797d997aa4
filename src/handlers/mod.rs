pub mod analyze;
pub mod body;
pub mod static_files;

pub use analyze::{analyze_image, success_response};
pub use static_files::{not_found_response, serve_file};
