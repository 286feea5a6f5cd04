use bytemuck::Pod;
use bytemuck::Zeroable;
use d3d12_hello_framework::config::SampleConfig;
use d3d12_hello_framework::d3d12::device::DeviceContext;
use d3d12_hello_framework::game_timer::GameTimer;
use d3d12_hello_framework::hello_error::HelloResult;
use d3d12_hello_framework::input::MouseButtons;
use d3d12_hello_framework::orbit_camera::OrbitCamera;
use d3d12_hello_framework::win32::dx_sample::DXSample;
use tracing::error;
use tracing::info;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::populate_command_list::populate_command_list;
use crate::resources::create_resources;
use crate::resources::Resources;

/// Per-object constant buffer contents (`cbuffer cbPerObject : register(b0)`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world_view_proj: [f32; 16],
}

pub struct Sample {
    pub config: SampleConfig,
    pub device: DeviceContext,
    pub camera: OrbitCamera,
    pub resources: Option<Resources>,
}

impl DXSample for Sample {
    fn new(config: &SampleConfig) -> HelloResult<Self> {
        let device = DeviceContext::create(config.use_warp_device)?;
        Ok(Sample {
            config: config.clone(),
            device,
            camera: OrbitCamera::new(config.aspect_ratio()),
            resources: None,
        })
    }

    fn on_init(&mut self, hwnd: HWND) -> HelloResult<()> {
        self.resources = Some(create_resources(&self.device, &self.config, hwnd)?);
        Ok(())
    }

    fn on_update(&mut self, _timer: &GameTimer) {
        self.camera.update_view();
    }

    fn on_render(&mut self) -> HelloResult<()> {
        let Some(resources) = &mut self.resources else {
            return Ok(());
        };
        let constants = ObjectConstants {
            world_view_proj: self.camera.world_view_proj_columns(),
        };
        resources.object_constants.copy_data(0, &constants)?;

        populate_command_list(resources, &self.config.clear_color)?;
        resources.render.end_frame()
    }

    fn on_resize(&mut self, width: u32, height: u32) -> HelloResult<()> {
        if let Some(resources) = &mut self.resources {
            resources.render.resize(width, height)?;
        }
        self.camera.set_aspect_ratio(width as f32 / height as f32);
        Ok(())
    }

    fn on_destroy(&mut self) {
        if let Some(resources) = &mut self.resources {
            if let Err(e) = resources.render.wait_for_gpu() {
                error!("Error waiting for GPU idle on destroy: {e}");
            }
        }
        info!("Sample destroyed.");
    }

    fn on_mouse_down(&mut self, _buttons: MouseButtons, x: i32, y: i32) {
        self.camera.on_mouse_down(x, y);
    }

    fn on_mouse_move(&mut self, buttons: MouseButtons, x: i32, y: i32) {
        self.camera.on_mouse_move(buttons, x, y);
    }

    fn title(&self) -> String {
        self.config.title.clone()
    }

    fn window_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn info_queue(&self) -> Option<IDXGIInfoQueue> {
        self.device.info_queue.clone()
    }
}
