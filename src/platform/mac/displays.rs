//! Display enumeration
//!
//! Full bounds come from Quartz, which already uses the canonical
//! convention (origin at the top-left of the main display, Y down). Work
//! areas come from AppKit's `visibleFrame`, which uses Cocoa coordinates
//! (origin at the bottom-left of the primary screen, Y up) and is flipped
//! here at the boundary. Nothing above this module ever sees a Cocoa
//! rectangle.

use cocoa::base::{id, nil};
use cocoa::foundation::NSArray;
use core_graphics::display::{CGDirectDisplayID, CGDisplayBounds, CGGetActiveDisplayList, CGMainDisplayID};
use objc::{class, msg_send, sel, sel_impl};

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::Rect;
use crate::platform::PlatformError;

/// `NSRect` layout matching AppKit's definition
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct NSRect {
    origin: NSPoint,
    size: NSSize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct NSPoint {
    x: f64,
    y: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct NSSize {
    width: f64,
    height: f64,
}

/// Work-area info from `NSScreen`, keyed by display ID
struct ScreenInfo {
    display_id: CGDirectDisplayID,
    visible_frame: NSRect,
}

/// Enumerates all active displays, main display first, fresh on every call.
pub fn enumerate_displays() -> Result<Vec<DisplayInfo>, PlatformError> {
    let display_ids = active_display_ids()?;
    if display_ids.is_empty() {
        return Err(PlatformError::NoDisplays);
    }

    let main_display_id = unsafe { CGMainDisplayID() };
    let screen_infos = ns_screen_infos();
    let primary_height = primary_screen_height(main_display_id);

    let mut displays = Vec::with_capacity(display_ids.len());
    for display_id in display_ids {
        let bounds = unsafe { CGDisplayBounds(display_id) };
        let bounds = Rect::new(
            bounds.origin.x as i32,
            bounds.origin.y as i32,
            bounds.size.width as i32,
            bounds.size.height as i32,
        );

        let is_main = display_id == main_display_id;
        let work_area = work_area_for(display_id, &screen_infos, bounds, primary_height, is_main);

        displays.push((DisplayInfo::new(u64::from(display_id), bounds, work_area), is_main));
    }

    // Main display first so "next display" is stable across gestures.
    displays.sort_by_key(|(_, is_main)| !*is_main);

    Ok(displays.into_iter().map(|(display, _)| display).collect())
}

fn active_display_ids() -> Result<Vec<CGDirectDisplayID>, PlatformError> {
    let mut display_count: u32 = 0;
    let result = unsafe { CGGetActiveDisplayList(0, std::ptr::null_mut(), &raw mut display_count) };
    if result != 0 {
        return Err(PlatformError::DisplayEnumeration);
    }
    if display_count == 0 {
        return Ok(Vec::new());
    }

    let mut display_ids = vec![0u32; display_count as usize];
    let result = unsafe {
        CGGetActiveDisplayList(display_count, display_ids.as_mut_ptr(), &raw mut display_count)
    };
    if result != 0 {
        return Err(PlatformError::DisplayEnumeration);
    }
    display_ids.truncate(display_count as usize);
    Ok(display_ids)
}

/// Reads `NSScreen.screens` once, extracting display IDs and visible
/// frames.
fn ns_screen_infos() -> Vec<ScreenInfo> {
    let mut infos = Vec::new();

    unsafe {
        let screens: id = msg_send![class!(NSScreen), screens];
        if screens == nil {
            return infos;
        }

        let count = NSArray::count(screens);
        for index in 0..count {
            let screen: id = msg_send![screens, objectAtIndex: index];
            if screen == nil {
                continue;
            }

            let device_description: id = msg_send![screen, deviceDescription];
            if device_description == nil {
                continue;
            }

            let key: id =
                msg_send![class!(NSString), stringWithUTF8String: c"NSScreenNumber".as_ptr()];
            let screen_number: id = msg_send![device_description, objectForKey: key];
            if screen_number == nil {
                continue;
            }

            let display_id: CGDirectDisplayID = msg_send![screen_number, unsignedIntValue];
            let visible_frame: NSRect = msg_send![screen, visibleFrame];
            infos.push(ScreenInfo { display_id, visible_frame });
        }
    }

    infos
}

/// Height of the primary screen's full frame, needed for the Y flip.
///
/// The primary screen is the one whose Cocoa origin is (0, 0); it is always
/// `NSScreen.screens[0]`. Falls back to the main display's Quartz bounds if
/// AppKit reports no screens.
fn primary_screen_height(main_display_id: CGDirectDisplayID) -> f64 {
    unsafe {
        let screens: id = msg_send![class!(NSScreen), screens];
        if screens != nil && NSArray::count(screens) > 0 {
            let primary: id = msg_send![screens, objectAtIndex: 0];
            if primary != nil {
                let frame: NSRect = msg_send![primary, frame];
                return frame.size.height;
            }
        }
    }
    unsafe { CGDisplayBounds(main_display_id) }.size.height
}

/// Converts one screen's Cocoa visible frame into a canonical work area.
fn work_area_for(
    display_id: CGDirectDisplayID,
    screen_infos: &[ScreenInfo],
    bounds: Rect,
    primary_height: f64,
    is_main: bool,
) -> Rect {
    for info in screen_infos {
        if info.display_id != display_id {
            continue;
        }
        let visible = &info.visible_frame;
        // Cocoa origin.y measures up from the bottom of the primary screen;
        // canonical y measures down from its top.
        let flipped_y = primary_height - visible.origin.y - visible.size.height;
        return Rect::new(
            visible.origin.x as i32,
            flipped_y as i32,
            visible.size.width as i32,
            visible.size.height as i32,
        );
    }

    // No matching NSScreen: approximate. Only the main display carries the
    // menu bar.
    let menu_bar_height = if is_main { 25 } else { 0 };
    Rect::new(
        bounds.x,
        bounds.y + menu_bar_height,
        bounds.w,
        bounds.h - menu_bar_height,
    )
}
