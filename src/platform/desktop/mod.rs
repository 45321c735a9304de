pub mod blocking;
pub mod data_dir;
