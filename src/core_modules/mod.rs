pub mod cloud;
pub mod cloud_detector;
pub mod error;
pub mod sky;
pub mod sky_loader;
