pub mod batch;
pub mod compute;
pub mod consts;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod io;
pub mod kernel;
pub mod pipeline;
pub mod plan;
