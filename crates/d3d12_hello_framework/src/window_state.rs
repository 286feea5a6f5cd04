//! Pause/resize bookkeeping driven by window messages.
//!
//! The message handler feeds `WM_ACTIVATE`, `WM_SIZE`, `WM_ENTERSIZEMOVE`
//! and `WM_EXITSIZEMOVE` into [`WindowState`] and gets back whether the
//! swap chain has to be resized.

/// Smallest client area the window can be dragged to.
pub const MIN_TRACK_SIZE: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    Minimized,
    Maximized,
    Restored,
}

/// What the runner must do after a message was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    None,
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    pub paused: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub resizing: bool,
    pub width: u32,
    pub height: u32,
}

impl WindowState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn on_activate(&mut self, active: bool) {
        self.paused = !active;
    }

    pub fn on_size(&mut self, kind: SizeKind, width: u32, height: u32, device_ready: bool) -> WindowAction {
        let size_changed = (width, height) != (self.width, self.height);
        self.width = width;
        self.height = height;
        if !device_ready {
            return WindowAction::None;
        }

        match kind {
            SizeKind::Minimized => {
                self.paused = true;
                self.minimized = true;
                self.maximized = false;
                WindowAction::None
            }
            SizeKind::Maximized => {
                self.paused = false;
                self.minimized = false;
                self.maximized = true;
                self.resize_action()
            }
            SizeKind::Restored if self.minimized => {
                self.paused = false;
                self.minimized = false;
                self.resize_action()
            }
            SizeKind::Restored if self.maximized => {
                self.paused = false;
                self.maximized = false;
                self.resize_action()
            }
            // Dragging the resize bars sends a stream of WM_SIZE; resize once
            // on WM_EXITSIZEMOVE instead.
            SizeKind::Restored if self.resizing => WindowAction::None,
            SizeKind::Restored if size_changed => self.resize_action(),
            SizeKind::Restored => WindowAction::None,
        }
    }

    pub fn on_enter_size_move(&mut self) {
        self.paused = true;
        self.resizing = true;
    }

    pub fn on_exit_size_move(&mut self) -> WindowAction {
        self.paused = false;
        self.resizing = false;
        self.resize_action()
    }

    fn resize_action(&self) -> WindowAction {
        if self.width == 0 || self.height == 0 {
            return WindowAction::None;
        }
        WindowAction::Resize {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_before_device_only_records_dimensions() {
        let mut state = WindowState::new(1280, 720);
        let action = state.on_size(SizeKind::Restored, 800, 600, false);
        assert_eq!(action, WindowAction::None);
        assert_eq!((state.width, state.height), (800, 600));
    }

    #[test]
    fn minimize_pauses_and_restore_resizes() {
        let mut state = WindowState::new(1280, 720);
        assert_eq!(state.on_size(SizeKind::Minimized, 0, 0, true), WindowAction::None);
        assert!(state.paused && state.minimized);

        let action = state.on_size(SizeKind::Restored, 1280, 720, true);
        assert_eq!(action, WindowAction::Resize { width: 1280, height: 720 });
        assert!(!state.paused && !state.minimized);
    }

    #[test]
    fn maximize_and_restore_both_resize() {
        let mut state = WindowState::new(1280, 720);
        assert_eq!(
            state.on_size(SizeKind::Maximized, 1920, 1080, true),
            WindowAction::Resize { width: 1920, height: 1080 }
        );
        assert!(state.maximized);
        assert_eq!(
            state.on_size(SizeKind::Restored, 1280, 720, true),
            WindowAction::Resize { width: 1280, height: 720 }
        );
        assert!(!state.maximized);
    }

    #[test]
    fn dragging_defers_resize_until_exit() {
        let mut state = WindowState::new(640, 480);
        state.on_enter_size_move();
        assert!(state.paused && state.resizing);
        for width in [650, 660, 700] {
            assert_eq!(state.on_size(SizeKind::Restored, width, 480, true), WindowAction::None);
        }
        assert_eq!(state.on_exit_size_move(), WindowAction::Resize { width: 700, height: 480 });
        assert!(!state.paused && !state.resizing);
    }

    #[test]
    fn programmatic_resize_is_applied_immediately() {
        let mut state = WindowState::new(640, 480);
        assert_eq!(
            state.on_size(SizeKind::Restored, 800, 600, true),
            WindowAction::Resize { width: 800, height: 600 }
        );
        assert_eq!(state.on_size(SizeKind::Restored, 800, 600, true), WindowAction::None);
    }

    #[test]
    fn zero_sized_client_area_never_resizes() {
        let mut state = WindowState::new(640, 480);
        state.on_enter_size_move();
        state.on_size(SizeKind::Restored, 0, 0, true);
        assert_eq!(state.on_exit_size_move(), WindowAction::None);
    }

    #[test]
    fn deactivation_pauses() {
        let mut state = WindowState::new(640, 480);
        state.on_activate(false);
        assert!(state.paused);
        state.on_activate(true);
        assert!(!state.paused);
        assert!((state.aspect_ratio() - 640.0 / 480.0).abs() < f32::EPSILON);
    }
}
