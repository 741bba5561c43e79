pub mod app_paths;
pub mod download;
