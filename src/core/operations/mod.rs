mod file_ops;

pub use file_ops::{delete_file, encodable_for, read_image, write_image};
