use tracing::error;
use tracing::info;
use tracing::warn;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::System::LibraryLoader::*;
use windows::Win32::System::Threading::Sleep;
use windows::Win32::UI::Input::KeyboardAndMouse::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use super::dx_sample::DXSample;
use crate::config::SampleConfig;
use crate::d3d12::debug_messages::log_dxgi_debug_messages;
use crate::game_timer::FrameStats;
use crate::game_timer::GameTimer;
use crate::hello_error::HelloReport;
use crate::hello_error::HelloResult;
use crate::input::client_size;
use crate::input::mouse_position;
use crate::input::MouseButtons;
use crate::window_state::SizeKind;
use crate::window_state::WindowAction;
use crate::window_state::WindowState;
use crate::window_state::MIN_TRACK_SIZE;

const WINDOW_CLASS_NAME: PCSTR = s!("D3D12HelloWindowClass");

/// Sleep between message pumps while paused (minimized, inactive or dragging).
const PAUSED_SLEEP_MS: u32 = 100;

/// Everything the window procedure needs, reachable through `GWLP_USERDATA`.
struct SampleHost<S: DXSample> {
    sample: S,
    title: String,
    state: WindowState,
    timer: GameTimer,
    stats: FrameStats,
    initialized: bool,
    window_alive: bool,
    error: Option<HelloReport>,
}

impl<S: DXSample> SampleHost<S> {
    fn handle_message(&mut self, window: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
        match message {
            WM_ACTIVATE => {
                let active = (wparam.0 & 0xffff) as u32 != WA_INACTIVE;
                self.state.on_activate(active);
                if active {
                    self.timer.start();
                } else {
                    self.timer.stop();
                }
            }
            WM_SIZE => {
                let (width, height) = client_size(lparam.0);
                let kind = match wparam.0 as u32 {
                    SIZE_MINIMIZED => SizeKind::Minimized,
                    SIZE_MAXIMIZED => SizeKind::Maximized,
                    _ => SizeKind::Restored,
                };
                let action = self.state.on_size(kind, width, height, self.initialized);
                self.apply(action);
            }
            WM_ENTERSIZEMOVE => {
                self.state.on_enter_size_move();
                self.timer.stop();
            }
            WM_EXITSIZEMOVE => {
                let action = self.state.on_exit_size_move();
                self.timer.start();
                self.apply(action);
            }
            WM_GETMINMAXINFO => {
                let info = unsafe { &mut *(lparam.0 as *mut MINMAXINFO) };
                info.ptMinTrackSize.x = MIN_TRACK_SIZE;
                info.ptMinTrackSize.y = MIN_TRACK_SIZE;
            }
            // Alt-enter would otherwise beep for the unhandled mnemonic.
            WM_MENUCHAR => return Some(LRESULT((MNC_CLOSE as isize) << 16)),
            WM_LBUTTONDOWN | WM_MBUTTONDOWN | WM_RBUTTONDOWN => {
                unsafe { SetCapture(window) };
                let (x, y) = mouse_position(lparam.0);
                self.sample.on_mouse_down(MouseButtons::from_wparam(wparam.0), x, y);
            }
            WM_LBUTTONUP | WM_MBUTTONUP | WM_RBUTTONUP => {
                if let Err(e) = unsafe { ReleaseCapture() } {
                    warn!("failed to release mouse capture: {e}");
                }
                let (x, y) = mouse_position(lparam.0);
                self.sample.on_mouse_up(MouseButtons::from_wparam(wparam.0), x, y);
            }
            WM_MOUSEMOVE => {
                let (x, y) = mouse_position(lparam.0);
                self.sample.on_mouse_move(MouseButtons::from_wparam(wparam.0), x, y);
            }
            WM_KEYDOWN => self.sample.on_key_down(wparam.0 as u8),
            WM_KEYUP => {
                if wparam.0 as u16 == VK_ESCAPE.0 {
                    unsafe { PostQuitMessage(0) };
                }
                self.sample.on_key_up(wparam.0 as u8);
            }
            WM_DESTROY => {
                self.window_alive = false;
                unsafe {
                    SetWindowLongPtrA(window, GWLP_USERDATA, 0);
                    PostQuitMessage(0);
                }
            }
            _ => return None,
        }
        Some(LRESULT(0))
    }

    fn apply(&mut self, action: WindowAction) {
        if let WindowAction::Resize { width, height } = action {
            if let Err(e) = self.sample.on_resize(width, height) {
                error!(width, height, "resize failed: {e}");
                self.error.get_or_insert(e);
            }
        }
    }

    fn update_frame_stats(&mut self, window: HWND) {
        let Some(report) = self.stats.frame(self.timer.total_time()) else {
            return;
        };
        let text = format!("{}: {}\0", self.title, report.window_text());
        if let Err(e) = unsafe { SetWindowTextA(window, PCSTR(text.as_ptr())) } {
            warn!("failed to set window text: {e}");
        }
    }
}

/// Runs a DirectX sample that implements the DXSample trait
pub fn run_sample<S>(config: &SampleConfig) -> HelloResult<()>
where
    S: DXSample,
{
    let instance = unsafe { GetModuleHandleA(None)? };

    let wc = WNDCLASSEXA {
        cbSize: std::mem::size_of::<WNDCLASSEXA>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<S>),
        hInstance: instance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
        lpszClassName: WINDOW_CLASS_NAME,
        hbrBackground: HBRUSH::default(),
        ..Default::default()
    };
    if unsafe { RegisterClassExA(&wc) } == 0 {
        return Err(Error::from_win32().into());
    }

    let sample = S::new(config)?;
    let (width, height) = sample.window_size();
    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    };
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false)? };

    let title = sample.title();
    let mut window_title = title.clone();
    window_title.push('\0');

    let mut host = SampleHost {
        sample,
        title,
        state: WindowState::new(width, height),
        timer: GameTimer::default(),
        stats: FrameStats::default(),
        initialized: false,
        window_alive: true,
        error: None,
    };
    // All access goes through this pointer while the window is alive; the
    // window procedure reaches the same host through GWLP_USERDATA.
    let host_ptr: *mut SampleHost<S> = &mut host;

    let hwnd = unsafe {
        CreateWindowExA(
            WINDOW_EX_STYLE::default(),
            WINDOW_CLASS_NAME,
            PCSTR(window_title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None,
            None,
            Some(instance.into()),
            Some(host_ptr as _),
        )
    }?;

    if let Err(e) = unsafe { (*host_ptr).sample.on_init(hwnd) } {
        error!("sample initialization failed: {e}");
        log_dxgi_debug_messages(unsafe { (*host_ptr).sample.info_queue() }.as_ref());
        unsafe { (*host_ptr).sample.on_destroy() };
        detach_and_destroy(hwnd, host_ptr);
        return Err(e);
    }
    unsafe {
        (*host_ptr).initialized = true;
        (*host_ptr).timer.reset();
        _ = ShowWindow(hwnd, SW_SHOW);
    }
    info!(width, height, "sample running");

    let result = message_loop(hwnd, host_ptr);
    if let Err(e) = &result {
        error!("sample stopped: {e}");
        log_dxgi_debug_messages(unsafe { (*host_ptr).sample.info_queue() }.as_ref());
    }

    // The GPU may still reference resources owned by the sample.
    unsafe { (*host_ptr).sample.on_destroy() };
    log_dxgi_debug_messages(unsafe { (*host_ptr).sample.info_queue() }.as_ref());
    detach_and_destroy(hwnd, host_ptr);
    result
}

fn message_loop<S: DXSample>(hwnd: HWND, host_ptr: *mut SampleHost<S>) -> HelloResult<()> {
    let mut message = MSG::default();
    loop {
        if unsafe { PeekMessageA(&mut message, None, 0, 0, PM_REMOVE) }.into() {
            if message.message == WM_QUIT {
                return Ok(());
            }
            unsafe {
                _ = TranslateMessage(&message);
                DispatchMessageA(&message);
            }
            continue;
        }

        let host = unsafe { &mut *host_ptr };
        if let Some(e) = host.error.take() {
            return Err(e);
        }

        host.timer.tick();
        if host.state.paused {
            unsafe { Sleep(PAUSED_SLEEP_MS) };
            continue;
        }
        host.update_frame_stats(hwnd);
        host.sample.on_update(&host.timer);
        host.sample.on_render()?;
    }
}

/// Unhooks the host before it goes out of scope and destroys the window if
/// it is still around (escape quits without destroying it).
fn detach_and_destroy<S: DXSample>(hwnd: HWND, host_ptr: *mut SampleHost<S>) {
    if !unsafe { (*host_ptr).window_alive } {
        return;
    }
    unsafe { SetWindowLongPtrA(hwnd, GWLP_USERDATA, 0) };
    if let Err(e) = unsafe { DestroyWindow(hwnd) } {
        warn!("failed to destroy window: {e}");
    }
}

extern "system" fn wndproc<S: DXSample>(window: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTA = &*(lparam.0 as *const CREATESTRUCTA);
            SetWindowLongPtrA(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    let user_data = unsafe { GetWindowLongPtrA(window, GWLP_USERDATA) };
    if user_data == 0 {
        // We can get messages before WM_CREATE or after WM_DESTROY.
        return unsafe { DefWindowProcA(window, message, wparam, lparam) };
    }

    let host = unsafe { &mut *(user_data as *mut SampleHost<S>) };
    match host.handle_message(window, message, wparam, lparam) {
        Some(result) => result,
        None => unsafe { DefWindowProcA(window, message, wparam, lparam) },
    }
}
