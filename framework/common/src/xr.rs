//! Data handed over by an XR backend while a headset session is presenting.
//!
//! The values mirror what WebXR and OpenXR expose per frame: the head pose and, for every tracked
//! controller, its analog axes and button states.

use glam::{Quat, Vec3};

#[derive(Clone, Debug)]
pub enum XrEvent {
    /// The headset started presenting; movement input comes from controllers from now on.
    SessionStarted,
    /// The headset stopped presenting; movement input comes from the keyboard again.
    SessionEnded,
    /// Snapshot of the inputs of the current XR frame.
    Frame(XrFrame),
}

#[derive(Clone, Debug, Default)]
pub struct XrFrame {
    /// Orientation of the viewer's head; identity looks along -z.
    pub head_orientation: Quat,
    pub input_sources: Vec<XrInputSource>,
}

impl XrFrame {
    #[must_use]
    pub fn look_direction(&self) -> Vec3 {
        self.head_orientation * Vec3::NEG_Z
    }
}

/// A tracked input device, e.g. a hand controller.
#[derive(Clone, Debug, Default)]
pub struct XrInputSource {
    /// `None` for sources without buttons or axes (e.g. gaze or hand tracking).
    pub gamepad: Option<XrGamepad>,
}

/// Analog axes and buttons of a controller.
///
/// Following the `xr-standard` mapping, axes 0/1 are the touchpad and axes 2/3 the thumbstick.
/// Button 0 is the primary trigger.
#[derive(Clone, Debug, Default)]
pub struct XrGamepad {
    pub axes: Vec<f32>,
    /// `true` for every button currently pressed.
    pub buttons: Vec<bool>,
}

impl XrGamepad {
    /// Value of the axis at `index` or `0.0` if the controller has no such axis.
    #[must_use]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or_default()
    }

    /// Whether the button at `index` exists and is pressed.
    #[must_use]
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or_default()
    }
}
