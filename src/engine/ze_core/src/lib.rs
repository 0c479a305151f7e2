pub mod color;
pub mod logger;
pub mod maths;
pub mod thread;
