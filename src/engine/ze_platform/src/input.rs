pub const KEY_COUNT: usize = 256;

/// Virtual key codes used by the engine
pub mod keys {
    pub const ESCAPE: u32 = 0x1B;
    pub const SPACE: u32 = 0x20;
}

/// Pressed state of every virtual key, fed from platform key messages
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn key_down(&mut self, key: u32) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = true;
        }
    }

    pub fn key_up(&mut self, key: u32) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    pub fn is_key_down(&self, key: u32) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::input::{keys, Keyboard};

    #[test]
    fn starts_released() {
        let keyboard = Keyboard::new();
        for key in 0..256 {
            assert!(!keyboard.is_key_down(key));
        }
    }

    #[test]
    fn press_and_release() {
        let mut keyboard = Keyboard::new();
        keyboard.key_down(keys::ESCAPE);
        assert!(keyboard.is_key_down(keys::ESCAPE));
        assert!(!keyboard.is_key_down(keys::SPACE));

        keyboard.key_up(keys::ESCAPE);
        assert!(!keyboard.is_key_down(keys::ESCAPE));
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut keyboard = Keyboard::new();
        keyboard.key_down(256);
        keyboard.key_down(u32::MAX);
        assert!(!keyboard.is_key_down(256));
        assert!(!keyboard.is_key_down(u32::MAX));
        keyboard.key_up(1000);
    }
}
