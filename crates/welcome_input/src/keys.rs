//! Held-key tracking for movement
//!
//! Controls:
//! - W: forward (run along camera heading)
//! - A/D: left/right (bound but unused by the scene)
//! - S: back (bound but unused by the scene)
//! - Space: jump

use bitflags::bitflags;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

bitflags! {
    /// Logical movement keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Keys: u8 {
        const FORWARD = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const BACK = 1 << 3;
        const JUMP = 1 << 4;
    }
}

/// Key handles registered for the scene and which of them are held
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    bindings: Vec<(KeyCode, Keys)>,
    down: Keys,
}

impl KeyState {
    /// Empty state with no bound keys
    pub fn new() -> Self {
        Self::default()
    }

    /// W/A/D/S and Space
    pub fn with_default_bindings() -> Self {
        let mut state = Self::new();
        state.bind(KeyCode::KeyA, Keys::LEFT);
        state.bind(KeyCode::KeyW, Keys::FORWARD);
        state.bind(KeyCode::KeyD, Keys::RIGHT);
        state.bind(KeyCode::KeyS, Keys::BACK);
        state.bind(KeyCode::Space, Keys::JUMP);
        state
    }

    /// Bind a physical key to a logical key
    pub fn bind(&mut self, code: KeyCode, key: Keys) {
        self.bindings.retain(|(c, _)| *c != code);
        self.bindings.push((code, key));
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Process keyboard input
    ///
    /// Returns true if the key is bound.
    pub fn process_keyboard(&mut self, code: KeyCode, state: ElementState) -> bool {
        let Some(&(_, key)) = self.bindings.iter().find(|(c, _)| *c == code) else {
            return false;
        };
        self.set(key, state == ElementState::Pressed);
        true
    }

    pub fn set(&mut self, key: Keys, pressed: bool) {
        self.down.set(key, pressed);
    }

    pub fn is_down(&self, key: Keys) -> bool {
        self.down.contains(key)
    }

    pub fn keys_down(&self) -> Keys {
        self.down
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.down = Keys::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyState::with_default_bindings();
        assert_eq!(keys.binding_count(), 5);
        assert!(keys.keys_down().is_empty());
    }

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyState::with_default_bindings();
        assert!(keys.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
        assert!(keys.is_down(Keys::FORWARD));

        assert!(keys.process_keyboard(KeyCode::Space, ElementState::Pressed));
        assert_eq!(keys.keys_down(), Keys::FORWARD | Keys::JUMP);

        keys.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert!(!keys.is_down(Keys::FORWARD));
        assert!(keys.is_down(Keys::JUMP));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut keys = KeyState::with_default_bindings();
        assert!(!keys.process_keyboard(KeyCode::KeyQ, ElementState::Pressed));
        assert!(keys.keys_down().is_empty());
    }

    #[test]
    fn test_unbound_state_tracks_nothing() {
        let mut keys = KeyState::new();
        assert!(!keys.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
        assert!(!keys.is_down(Keys::FORWARD));
    }

    #[test]
    fn test_rebind_replaces() {
        let mut keys = KeyState::with_default_bindings();
        keys.bind(KeyCode::KeyW, Keys::JUMP);
        assert_eq!(keys.binding_count(), 5);
        keys.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(keys.is_down(Keys::JUMP));
        assert!(!keys.is_down(Keys::FORWARD));
    }

    #[test]
    fn test_clear() {
        let mut keys = KeyState::with_default_bindings();
        keys.set(Keys::FORWARD | Keys::LEFT, true);
        keys.clear();
        assert!(keys.keys_down().is_empty());
    }
}
