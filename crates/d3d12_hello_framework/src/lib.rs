//! Shared plumbing for the D3D12 hello samples.
//!
//! Everything outside [`d3d12`] and [`win32`] is plain Rust and builds on any
//! platform; those two modules only exist on Windows.

pub mod alignment;
pub mod assets;
pub mod config;
pub mod frame_sync;
pub mod game_timer;
pub mod geometry;
pub mod hello_error;
pub mod input;
pub mod logging;
pub mod orbit_camera;
pub mod texture;
pub mod window_state;

#[cfg(windows)]
pub mod d3d12;
#[cfg(windows)]
pub mod win32;
