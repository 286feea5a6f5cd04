//! Mouse message decoding that does not need the Win32 headers.

const MK_LBUTTON: usize = 0x0001;
const MK_RBUTTON: usize = 0x0002;
const MK_MBUTTON: usize = 0x0010;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    /// Decode the `MK_*` flags carried in a mouse message's `WPARAM`.
    pub fn from_wparam(wparam: usize) -> Self {
        Self {
            left: wparam & MK_LBUTTON != 0,
            right: wparam & MK_RBUTTON != 0,
            middle: wparam & MK_MBUTTON != 0,
        }
    }
}

/// Client-area coordinates from a mouse message's `LPARAM`
/// (`GET_X_LPARAM`/`GET_Y_LPARAM`: signed low and high words).
pub fn mouse_position(lparam: isize) -> (i32, i32) {
    let x = (lparam & 0xffff) as u16 as i16 as i32;
    let y = ((lparam >> 16) & 0xffff) as u16 as i16 as i32;
    (x, y)
}

/// Width and height from a `WM_SIZE` `LPARAM` (`LOWORD`/`HIWORD`).
pub fn client_size(lparam: isize) -> (u32, u32) {
    let width = (lparam & 0xffff) as u32;
    let height = ((lparam >> 16) & 0xffff) as u32;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_button_flags() {
        assert_eq!(
            MouseButtons::from_wparam(0x0001),
            MouseButtons { left: true, right: false, middle: false }
        );
        assert_eq!(
            MouseButtons::from_wparam(0x0012),
            MouseButtons { left: false, right: true, middle: true }
        );
        assert_eq!(MouseButtons::from_wparam(0x0004), MouseButtons::default());
    }

    #[test]
    fn decodes_signed_coordinates() {
        assert_eq!(mouse_position((20 << 16) | 10), (10, 20));
        // Captured mouse left of and above the client area.
        let packed = ((0xfffe_isize) << 16) | 0xfffb;
        assert_eq!(mouse_position(packed), (-5, -2));
    }

    #[test]
    fn decodes_client_size() {
        assert_eq!(client_size((720 << 16) | 1280), (1280, 720));
    }
}
