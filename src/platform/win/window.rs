//! Window queries and mutation
//!
//! Win32 primitives behind the trait methods: frame get/set, maximize
//! state, the bounded WM_NCHITTEST probe, owning-process lookup, and the
//! foreground bridge.

use std::time::Duration;

use windows::Win32::Foundation::*;
use windows::Win32::System::Threading::{
    GetCurrentThreadId, OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::Input::KeyboardAndMouse::AttachThreadInput;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::PWSTR;

use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::NativeHit;
use crate::platform::PlatformError;

/// Current frame in virtual-screen coordinates
pub fn frame(hwnd: HWND) -> Result<Rect, PlatformError> {
    unsafe {
        let mut rect = RECT::default();
        if GetWindowRect(hwnd, &mut rect).is_err() {
            return Err(PlatformError::FrameUnavailable);
        }
        Ok(Rect::new(rect.left, rect.top, rect.right - rect.left, rect.bottom - rect.top))
    }
}

pub fn is_maximized(hwnd: HWND) -> bool {
    unsafe { IsZoomed(hwnd).as_bool() }
}

pub fn is_focused(hwnd: HWND) -> bool {
    unsafe { GetForegroundWindow() == hwnd }
}

pub fn restore(hwnd: HWND) -> Result<(), PlatformError> {
    unsafe {
        ShowWindow(hwnd, SW_RESTORE);
    }
    Ok(())
}

pub fn maximize(hwnd: HWND) -> Result<(), PlatformError> {
    unsafe {
        ShowWindow(hwnd, SW_MAXIMIZE);
    }
    Ok(())
}

/// Applies origin and size in one call.
///
/// SWP_NOCOPYBITS discards the stale client image, SWP_FRAMECHANGED makes
/// the window recalculate its non-client area on the new monitor.
pub fn set_frame(hwnd: HWND, target: Rect) -> Result<(), PlatformError> {
    unsafe {
        SetWindowPos(
            hwnd,
            HWND(0),
            target.x,
            target.y,
            target.w,
            target.h,
            SWP_SHOWWINDOW | SWP_NOCOPYBITS | SWP_FRAMECHANGED,
        )
        .map_err(|_| PlatformError::PlacementFailed)
    }
}

/// Resizes in place; only used for the repaint nudge.
pub fn resize(hwnd: HWND, w: i32, h: i32) -> Result<(), PlatformError> {
    unsafe {
        SetWindowPos(hwnd, HWND(0), 0, 0, w, h, SWP_NOZORDER | SWP_NOMOVE | SWP_NOCOPYBITS)
            .map_err(|_| PlatformError::PlacementFailed)
    }
}

/// Brings the window to the top of the Z-order without activating it.
pub fn raise(hwnd: HWND) -> Result<(), PlatformError> {
    unsafe {
        SetWindowPos(
            hwnd,
            HWND_TOP,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )
        .map_err(|_| PlatformError::FocusFailed)
    }
}

/// Forces the window into the foreground.
///
/// A background process may not steal foreground focus, so when the current
/// foreground window lives on another thread the input-processing contexts
/// are associated for the duration of the raise/focus calls and dissociated
/// immediately after. This bridge exists only here.
pub fn force_foreground(hwnd: HWND) -> Result<(), PlatformError> {
    unsafe {
        if IsIconic(hwnd).as_bool() {
            ShowWindow(hwnd, SW_RESTORE);
        }

        let foreground_thread = GetWindowThreadProcessId(GetForegroundWindow(), None);
        let own_thread = GetCurrentThreadId();
        let target_thread = GetWindowThreadProcessId(hwnd, None);

        if foreground_thread != target_thread {
            AttachThreadInput(foreground_thread, own_thread, TRUE);
            AttachThreadInput(target_thread, own_thread, TRUE);
            let _ = BringWindowToTop(hwnd);
            ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
            AttachThreadInput(target_thread, own_thread, FALSE);
            AttachThreadInput(foreground_thread, own_thread, FALSE);
        } else {
            let _ = BringWindowToTop(hwnd);
            ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
        }
    }
    Ok(())
}

/// Asks the window what lives at `point`, waiting at most `timeout`.
///
/// SMTO_ABORTIFHUNG plus the timeout keep a hung target from stalling the
/// hook thread; either way the answer degrades to "no answer", never an
/// error.
pub fn caption_hit_test(hwnd: HWND, point: Point, timeout: Duration) -> NativeHit {
    unsafe {
        let coords = LPARAM(((point.y as isize) << 16) | ((point.x as isize) & 0xFFFF));
        let mut hit_value: usize = 0;
        let sent = SendMessageTimeoutW(
            hwnd,
            WM_NCHITTEST,
            WPARAM(0),
            coords,
            SMTO_ABORTIFHUNG,
            timeout.as_millis() as u32,
            Some(&mut hit_value),
        );

        if sent == LRESULT(0) {
            return NativeHit::NoAnswer;
        }
        if hit_value == HTCAPTION as usize {
            NativeHit::Caption
        } else {
            NativeHit::NonCaption
        }
    }
}

/// Lowercase base name of the process owning `hwnd`, without extension.
pub fn process_name(hwnd: HWND) -> Option<String> {
    unsafe {
        let mut pid: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        if pid == 0 {
            return None;
        }

        let process = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, FALSE, pid).ok()?;

        let mut buffer = [0u16; 512];
        let mut length = buffer.len() as u32;
        let result = QueryFullProcessImageNameW(
            process,
            PROCESS_NAME_WIN32,
            PWSTR::from_raw(buffer.as_mut_ptr()),
            &mut length,
        );
        let _ = CloseHandle(process);
        result.ok()?;

        let path = String::from_utf16_lossy(&buffer[..length as usize]);
        let name = path.rsplit(['\\', '/']).next()?;
        let stem = name.strip_suffix(".exe").unwrap_or(name);
        Some(stem.to_lowercase())
    }
}
