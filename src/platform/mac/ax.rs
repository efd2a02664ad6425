//! macOS Accessibility API bindings
//!
//! Safe wrappers around the handful of AX calls the backend needs. An
//! [`AxElement`] owns one retained `AXUIElementRef` and releases it on
//! drop. Every cross-process round trip is bounded by the messaging
//! timeout installed on the system-wide element, so an unresponsive
//! application cannot stall the tap thread.

use std::ffi::c_void;
use std::time::Duration;

use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::display::CGPoint;
use core_graphics::geometry::CGSize;

use crate::domain::geometry::{Point, Rect};

// Opaque types
pub type AXUIElementRef = *mut c_void;
type CFTypeRef = *mut c_void;

// AXValue payload types
const AX_VALUE_TYPE_CGPOINT: u32 = 1;
const AX_VALUE_TYPE_CGSIZE: u32 = 2;

const AX_ERROR_SUCCESS: i32 = 0;

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXUIElementCreateSystemWide() -> AXUIElementRef;
    fn AXUIElementCopyElementAtPosition(
        application: AXUIElementRef,
        x: f32,
        y: f32,
        element: *mut AXUIElementRef,
    ) -> i32;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *mut CFTypeRef,
    ) -> i32;
    fn AXUIElementSetAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: CFTypeRef,
    ) -> i32;
    fn AXUIElementPerformAction(element: AXUIElementRef, action: CFStringRef) -> i32;
    fn AXUIElementGetPid(element: AXUIElementRef, pid: *mut i32) -> i32;
    fn AXUIElementSetMessagingTimeout(element: AXUIElementRef, timeout_seconds: f32) -> i32;
    fn AXIsProcessTrusted() -> bool;
    fn AXValueCreate(value_type: u32, value: *const c_void) -> CFTypeRef;
    fn AXValueGetValue(value: CFTypeRef, value_type: u32, value_out: *mut c_void) -> bool;
    fn CFRetain(cf: CFTypeRef) -> CFTypeRef;
    fn CFRelease(cf: CFTypeRef);
    fn CFArrayGetCount(array: CFTypeRef) -> isize;
    fn CFArrayGetValueAtIndex(array: CFTypeRef, index: isize) -> CFTypeRef;
}

/// Attribute and action names
mod names {
    pub const ROLE: &str = "AXRole";
    pub const SUBROLE: &str = "AXSubrole";
    pub const PARENT: &str = "AXParent";
    pub const CHILDREN: &str = "AXChildren";
    pub const POSITION: &str = "AXPosition";
    pub const SIZE: &str = "AXSize";
    pub const MAIN: &str = "AXMain";
    pub const FOCUSED: &str = "AXFocused";
    pub const MINIMIZED: &str = "AXMinimized";
    pub const RAISE_ACTION: &str = "AXRaise";
}

pub const WINDOW_ROLE: &str = "AXWindow";
pub const TAB_GROUP_ROLE: &str = "AXTabGroup";
pub const TAB_BUTTON_SUBROLE: &str = "AXTabButton";

/// True if the process is trusted for accessibility control.
pub fn is_trusted() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// A retained accessibility element
#[derive(Debug)]
pub struct AxElement(AXUIElementRef);

impl AxElement {
    /// Takes ownership of a reference obtained under the create rule.
    unsafe fn from_create(raw: AXUIElementRef) -> Option<Self> {
        if raw.is_null() { None } else { Some(Self(raw)) }
    }

    /// Retains a reference the caller does not own.
    unsafe fn from_borrowed(raw: AXUIElementRef) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            unsafe { CFRetain(raw) };
            Some(Self(raw))
        }
    }

    /// The system-wide element, with every messaging round trip bounded by
    /// `timeout`.
    pub fn system_wide(timeout: Duration) -> Option<Self> {
        unsafe {
            let element = Self::from_create(AXUIElementCreateSystemWide())?;
            AXUIElementSetMessagingTimeout(element.0, timeout.as_secs_f32());
            Some(element)
        }
    }

    /// The deepest element under `point`, in Quartz global coordinates.
    pub fn element_at(&self, point: Point) -> Option<AxElement> {
        unsafe {
            let mut element: AXUIElementRef = std::ptr::null_mut();
            let result =
                AXUIElementCopyElementAtPosition(self.0, point.x as f32, point.y as f32, &mut element);
            if result != AX_ERROR_SUCCESS {
                return None;
            }
            Self::from_create(element)
        }
    }

    fn copy_attribute(&self, name: &str) -> Option<CFTypeRef> {
        let attribute = CFString::new(name);
        unsafe {
            let mut value: CFTypeRef = std::ptr::null_mut();
            let result =
                AXUIElementCopyAttributeValue(self.0, attribute.as_concrete_TypeRef(), &mut value);
            if result != AX_ERROR_SUCCESS || value.is_null() {
                return None;
            }
            Some(value)
        }
    }

    fn string_attribute(&self, name: &str) -> Option<String> {
        unsafe {
            let value = self.copy_attribute(name)?;
            let string = CFString::wrap_under_create_rule(value as CFStringRef);
            Some(string.to_string())
        }
    }

    fn bool_attribute(&self, name: &str) -> Option<bool> {
        unsafe {
            let value = self.copy_attribute(name)?;
            let boolean =
                CFBoolean::wrap_under_create_rule(value as core_foundation::boolean::CFBooleanRef);
            Some(boolean.into())
        }
    }

    fn element_attribute(&self, name: &str) -> Option<AxElement> {
        unsafe {
            let value = self.copy_attribute(name)?;
            // The copied value is itself an AXUIElement we now own.
            Self::from_create(value as AXUIElementRef)
        }
    }

    pub fn role(&self) -> Option<String> {
        self.string_attribute(names::ROLE)
    }

    pub fn subrole(&self) -> Option<String> {
        self.string_attribute(names::SUBROLE)
    }

    pub fn parent(&self) -> Option<AxElement> {
        self.element_attribute(names::PARENT)
    }

    pub fn children(&self) -> Vec<AxElement> {
        unsafe {
            let Some(array) = self.copy_attribute(names::CHILDREN) else {
                return Vec::new();
            };
            let count = CFArrayGetCount(array);
            let mut children = Vec::with_capacity(count as usize);
            for index in 0..count {
                let item = CFArrayGetValueAtIndex(array, index) as AXUIElementRef;
                if let Some(child) = Self::from_borrowed(item) {
                    children.push(child);
                }
            }
            CFRelease(array);
            children
        }
    }

    pub fn pid(&self) -> Option<i32> {
        unsafe {
            let mut pid: i32 = 0;
            if AXUIElementGetPid(self.0, &mut pid) != AX_ERROR_SUCCESS {
                return None;
            }
            Some(pid)
        }
    }

    /// Frame in Quartz global coordinates, rounded to integers.
    pub fn frame(&self) -> Option<Rect> {
        unsafe {
            let position_value = self.copy_attribute(names::POSITION)?;
            let mut position = CGPoint::new(0.0, 0.0);
            let got_position = AXValueGetValue(
                position_value,
                AX_VALUE_TYPE_CGPOINT,
                (&raw mut position).cast(),
            );
            CFRelease(position_value);

            let size_value = self.copy_attribute(names::SIZE)?;
            let mut size = CGSize::new(0.0, 0.0);
            let got_size =
                AXValueGetValue(size_value, AX_VALUE_TYPE_CGSIZE, (&raw mut size).cast());
            CFRelease(size_value);

            if !got_position || !got_size {
                return None;
            }
            Some(Rect::new(
                position.x.round() as i32,
                position.y.round() as i32,
                size.width.round() as i32,
                size.height.round() as i32,
            ))
        }
    }

    pub fn set_position(&self, point: Point) -> bool {
        let position = CGPoint::new(f64::from(point.x), f64::from(point.y));
        unsafe {
            let value = AXValueCreate(AX_VALUE_TYPE_CGPOINT, (&raw const position).cast());
            if value.is_null() {
                return false;
            }
            let attribute = CFString::new(names::POSITION);
            let result =
                AXUIElementSetAttributeValue(self.0, attribute.as_concrete_TypeRef(), value);
            CFRelease(value);
            result == AX_ERROR_SUCCESS
        }
    }

    pub fn set_size(&self, w: i32, h: i32) -> bool {
        let size = CGSize::new(f64::from(w), f64::from(h));
        unsafe {
            let value = AXValueCreate(AX_VALUE_TYPE_CGSIZE, (&raw const size).cast());
            if value.is_null() {
                return false;
            }
            let attribute = CFString::new(names::SIZE);
            let result =
                AXUIElementSetAttributeValue(self.0, attribute.as_concrete_TypeRef(), value);
            CFRelease(value);
            result == AX_ERROR_SUCCESS
        }
    }

    fn set_bool_attribute(&self, name: &str, value: bool) -> bool {
        let attribute = CFString::new(name);
        let boolean = if value { CFBoolean::true_value() } else { CFBoolean::false_value() };
        unsafe {
            AXUIElementSetAttributeValue(
                self.0,
                attribute.as_concrete_TypeRef(),
                boolean.as_CFTypeRef() as CFTypeRef,
            ) == AX_ERROR_SUCCESS
        }
    }

    pub fn is_main(&self) -> bool {
        self.bool_attribute(names::MAIN).unwrap_or(false)
    }

    pub fn is_focused(&self) -> bool {
        self.bool_attribute(names::FOCUSED).unwrap_or(false)
    }

    pub fn set_main(&self) -> bool {
        self.set_bool_attribute(names::MAIN, true)
    }

    pub fn set_focused(&self) -> bool {
        self.set_bool_attribute(names::FOCUSED, true)
    }

    pub fn unminimize(&self) -> bool {
        self.set_bool_attribute(names::MINIMIZED, false)
    }

    pub fn raise(&self) -> bool {
        let action = CFString::new(names::RAISE_ACTION);
        unsafe { AXUIElementPerformAction(self.0, action.as_concrete_TypeRef()) == AX_ERROR_SUCCESS }
    }
}

impl Clone for AxElement {
    fn clone(&self) -> Self {
        unsafe { CFRetain(self.0) };
        Self(self.0)
    }
}

impl Drop for AxElement {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0) };
    }
}
