pub mod image_io;
pub mod naming;

pub use image_io::{load_rgb, save_rgb_png};
pub use naming::{batch_file, default_output, worker_indices};
