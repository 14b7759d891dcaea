mod class_dir;

pub use class_dir::{list_class_files, matches_extension, scan_class_directories, ClassDirectory};
