//! Common utility functions.

pub mod charset;
pub mod field;
pub mod fs;
pub mod props;

// Re-export commonly used items
pub use charset::detect_charset;
pub use field::{read_field, read_static, register_static, unregister_static, write_field, write_static};
pub use fs::{create_dir, get_relative};
pub use props::{read_props, read_props_resource, write_props};
