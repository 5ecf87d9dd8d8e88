pub mod batch;
pub mod config;
pub mod devices;
pub mod options;
pub mod upscale;
