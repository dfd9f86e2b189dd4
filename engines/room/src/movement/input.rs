use glam::Vec2;
use walkthrough_framework_common::xr::XrInputSource;
use winit::{
    event::ElementState,
    keyboard::{KeyCode, PhysicalKey},
};

use super::MovementConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveDirection {
    /// Maps WASD (by position, so it works with any keyboard layout) and the arrow keys.
    #[must_use]
    pub fn from_key_code(key_code: KeyCode) -> Option<Self> {
        match key_code {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Self::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Self::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Self::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Self::Right),
            _ => None,
        }
    }
}

/// Which movement keys are currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "these are four independent key states"
)]
pub struct MoveState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveState {
    pub fn set(&mut self, direction: MoveDirection, pressed: bool) {
        let flag = match direction {
            MoveDirection::Forward => &mut self.forward,
            MoveDirection::Back => &mut self.back,
            MoveDirection::Left => &mut self.left,
            MoveDirection::Right => &mut self.right,
        };
        *flag = pressed;
    }

    /// Updates the state from a key press or release.
    ///
    /// Returns `false` if the key has nothing to do with movement.
    pub fn apply_key(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        let PhysicalKey::Code(key_code) = key else {
            return false;
        };
        let Some(direction) = MoveDirection::from_key_code(key_code) else {
            return false;
        };
        self.set(direction, state.is_pressed());
        true
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Raw sum of all held keys; forward is -y, right is +x.
    #[must_use]
    pub fn input_vector(&self) -> Vec2 {
        let axis = |negative: bool, positive: bool| {
            f32::from(u8::from(positive)) - f32::from(u8::from(negative))
        };
        Vec2::new(
            axis(self.left, self.right),
            axis(self.forward, self.back),
        )
    }
}

/// Input of a single frame, coming either from the keyboard or from XR controllers.
#[derive(Clone, Copy, Debug)]
pub enum FrameInput<'frame> {
    Desktop(MoveState),
    Xr(&'frame [XrInputSource]),
}

impl FrameInput<'_> {
    /// Local movement input: x is lateral (right positive), y is forward/back (forward negative).
    ///
    /// The result is not normalized.
    #[must_use]
    pub fn input_vector(&self, config: &MovementConfig) -> Vec2 {
        match *self {
            FrameInput::Desktop(move_state) => move_state.input_vector(),
            FrameInput::Xr(input_sources) => xr_input_vector(input_sources, config),
        }
    }
}

/// Sums up the sticks of all controllers.
///
/// Per axis, each controller contributes its thumbstick (axes 2/3) if deflected beyond the
/// deadzone and its touchpad (axes 0/1) otherwise. Holding the primary button walks forward on
/// top of that.
fn xr_input_vector(input_sources: &[XrInputSource], config: &MovementConfig) -> Vec2 {
    let pick = |thumbstick: f32, touchpad: f32| {
        if thumbstick.abs() > config.stick_deadzone {
            thumbstick
        } else {
            touchpad
        }
    };

    input_sources
        .iter()
        .filter_map(|input_source| input_source.gamepad.as_ref())
        .map(|gamepad| {
            let mut input = Vec2::new(
                pick(gamepad.axis(2), gamepad.axis(0)),
                pick(gamepad.axis(3), gamepad.axis(1)),
            );
            if gamepad.is_pressed(0) {
                input.y -= config.forward_assist;
            }
            input
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkthrough_framework_common::xr::XrGamepad;

    fn controller(axes: &[f32], trigger: bool) -> XrInputSource {
        XrInputSource {
            gamepad: Some(XrGamepad {
                axes: axes.to_vec(),
                buttons: vec![trigger],
            }),
        }
    }

    #[test]
    fn letters_and_arrows_map_to_the_same_direction() {
        assert_eq!(
            MoveDirection::from_key_code(KeyCode::KeyW),
            MoveDirection::from_key_code(KeyCode::ArrowUp),
            "forward"
        );
        assert_eq!(
            MoveDirection::from_key_code(KeyCode::KeyS),
            Some(MoveDirection::Back),
            "back"
        );
        assert_eq!(
            MoveDirection::from_key_code(KeyCode::ArrowLeft),
            Some(MoveDirection::Left),
            "left"
        );
        assert_eq!(
            MoveDirection::from_key_code(KeyCode::KeyD),
            Some(MoveDirection::Right),
            "right"
        );
        assert_eq!(MoveDirection::from_key_code(KeyCode::KeyQ), None, "unrelated key");
    }

    #[test]
    fn press_and_release_leaves_no_residual_input() {
        let mut move_state = MoveState::default();
        let w = PhysicalKey::Code(KeyCode::KeyW);

        assert!(move_state.apply_key(w, ElementState::Pressed), "w is a movement key");
        assert_eq!(move_state.input_vector(), Vec2::new(0.0, -1.0), "w walks forward");

        move_state.apply_key(w, ElementState::Released);
        assert_eq!(move_state.input_vector(), Vec2::ZERO, "released w adds nothing");
    }

    #[test]
    fn last_event_for_a_key_wins() {
        let mut move_state = MoveState::default();
        let left = PhysicalKey::Code(KeyCode::ArrowLeft);

        move_state.apply_key(left, ElementState::Pressed);
        move_state.apply_key(left, ElementState::Pressed);
        move_state.apply_key(left, ElementState::Released);

        assert!(!move_state.left, "a single release undoes repeated presses");
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut move_state = MoveState::default();
        assert!(
            !move_state.apply_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed),
            "space is no movement key"
        );
        assert_eq!(move_state, MoveState::default(), "state untouched");
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let move_state = MoveState {
            forward: true,
            back: true,
            left: false,
            right: true,
        };
        assert_eq!(move_state.input_vector(), Vec2::new(1.0, 0.0), "only strafing remains");
    }

    #[test]
    fn thumbstick_beats_touchpad_per_axis() {
        let config = MovementConfig::default();
        let sources = [controller(&[0.9, 0.9, 0.0, -0.5], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(
            input,
            Vec2::new(0.9, -0.5),
            "idle stick x falls back to the touchpad, deflected stick y wins"
        );
    }

    #[test]
    fn stick_drift_does_not_mask_touchpad() {
        let config = MovementConfig::default();
        let sources = [controller(&[0.0, -0.9, 0.12, 0.12], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(input, Vec2::new(0.0, -0.9), "drift within deadzone ignored");
    }

    #[test]
    fn mixed_axes_are_chosen_independently() {
        let config = MovementConfig::default();
        let sources = [controller(&[0.5, 0.5, 0.2, 0.0], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(input, Vec2::new(0.2, 0.5), "stick x, touchpad y");
    }

    #[test]
    fn deflection_exactly_at_deadzone_uses_touchpad() {
        let config = MovementConfig::default();
        let deadzone = config.stick_deadzone;
        let sources = [controller(&[0.3, 0.4, deadzone, -deadzone], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(input, Vec2::new(0.3, 0.4), "deadzone itself is not beyond it");
    }

    #[test]
    fn touchpad_is_used_within_deadzone() {
        let config = MovementConfig::default();
        let sources = [controller(&[0.3, -0.4, 0.1, 0.1], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(input, Vec2::new(0.3, -0.4), "touchpad used");
    }

    #[test]
    fn controllers_accumulate_with_forward_assist() {
        let config = MovementConfig::default();
        let sources = [
            controller(&[0.0, 0.0, 0.5, 0.0], false),
            controller(&[0.0, 0.0, 0.5, 0.0], true),
            XrInputSource { gamepad: None },
        ];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert!(
            input.abs_diff_eq(Vec2::new(1.0, -0.8), 1e-6),
            "sticks summed and assist added: {input}"
        );
    }

    #[test]
    fn controllers_with_missing_axes_read_as_idle() {
        let config = MovementConfig::default();
        let sources = [controller(&[], false)];

        let input = FrameInput::Xr(&sources).input_vector(&config);
        assert_eq!(input, Vec2::ZERO, "no axes, no movement");
    }
}
