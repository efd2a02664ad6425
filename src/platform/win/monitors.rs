//! Monitor enumeration
//!
//! Produces the display topology in canonical coordinates. Windows
//! virtual-screen coordinates already have their origin at the top-left of
//! the primary monitor with Y growing downward, so no conversion is needed;
//! secondary monitors may legitimately have negative coordinates.

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::Rect;
use crate::platform::PlatformError;

const MONITORINFOF_PRIMARY: u32 = 1;

/// Context for the monitor enumeration callback
struct EnumContext {
    displays: Vec<(DisplayInfo, bool)>,
}

/// Callback invoked once per monitor.
///
/// Enumeration continues even if an individual monitor fails to report its
/// info; partial topology beats aborting the whole pass.
unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let context = &mut *(lparam.0 as *mut EnumContext);

        let mut monitor_info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };

        if GetMonitorInfoW(hmonitor, &mut monitor_info) == FALSE {
            return TRUE;
        }

        let bounds = rect_from_win32(&monitor_info.rcMonitor);
        let work_area = rect_from_win32(&monitor_info.rcWork);
        let is_primary = (monitor_info.dwFlags & MONITORINFOF_PRIMARY) != 0;

        context
            .displays
            .push((DisplayInfo::new(hmonitor.0 as u64, bounds, work_area), is_primary));

        TRUE
    }
}

fn rect_from_win32(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right - rect.left, rect.bottom - rect.top)
}

/// Enumerates all monitors, primary first, fresh on every call.
pub fn enumerate_displays() -> Result<Vec<DisplayInfo>, PlatformError> {
    let mut context = EnumContext { displays: Vec::new() };

    unsafe {
        if EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_proc),
            LPARAM(&mut context as *mut _ as isize),
        ) == FALSE
        {
            return Err(PlatformError::DisplayEnumeration);
        }
    }

    if context.displays.is_empty() {
        return Err(PlatformError::NoDisplays);
    }

    // Primary first so "next display" is stable across gestures.
    context.displays.sort_by_key(|(_, is_primary)| !*is_primary);

    Ok(context.displays.into_iter().map(|(display, _)| display).collect())
}
