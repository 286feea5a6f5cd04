use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::config::SampleConfig;
use crate::game_timer::GameTimer;
use crate::hello_error::HelloResult;
use crate::input::MouseButtons;

/// Trait for DirectX samples that provides a common interface
/// for initialization, rendering, and window management.
pub trait DXSample {
    /// Creates the device and everything that does not need a window.
    fn new(config: &SampleConfig) -> HelloResult<Self>
    where
        Self: Sized;

    /// Creates the swap chain and the rest of the pipeline for `hwnd`.
    fn on_init(&mut self, hwnd: HWND) -> HelloResult<()>;

    fn on_update(&mut self, _timer: &GameTimer) {}

    fn on_render(&mut self) -> HelloResult<()> {
        Ok(())
    }

    /// The client area changed to a non-zero size.
    fn on_resize(&mut self, _width: u32, _height: u32) -> HelloResult<()> {
        Ok(())
    }

    /// Waits for the GPU and releases resources. Called exactly once, also
    /// when `on_init` failed part way.
    fn on_destroy(&mut self);

    fn on_key_down(&mut self, _key: u8) {}

    fn on_key_up(&mut self, _key: u8) {}

    fn on_mouse_down(&mut self, _buttons: MouseButtons, _x: i32, _y: i32) {}

    fn on_mouse_up(&mut self, _buttons: MouseButtons, _x: i32, _y: i32) {}

    fn on_mouse_move(&mut self, _buttons: MouseButtons, _x: i32, _y: i32) {}

    fn title(&self) -> String {
        "DXSample".into()
    }

    /// Client area size in pixels.
    fn window_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    /// Debug message queue drained into the log when something fails.
    fn info_queue(&self) -> Option<IDXGIInfoQueue> {
        None
    }
}
