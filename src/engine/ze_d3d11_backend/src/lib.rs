#![cfg(windows)]

pub mod backend;
pub mod device;
mod utils;

pub use backend::{D3D11Backend, DriverType};
