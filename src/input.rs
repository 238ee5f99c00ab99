//! Key mapping
//!
//! Platform layers translate raw key events into [`Key`]s; this module turns
//! them into per-screen commands.

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    P,
    Space,
    Enter,
    Escape,
    Digit(u8),
}

/// Gameplay commands for one tick from the keys pressed this frame plus an
/// optional gesture steering value
pub fn gameplay_input(keys: &[Key], steer: Option<f32>) -> TickInput {
    let mut input = TickInput {
        steer: steer.map(|s| s.clamp(-1.0, 1.0)),
        ..Default::default()
    };
    for key in keys {
        match key {
            // One lane step per frame; left wins over right
            Key::Left | Key::A if input.lane_shift.is_none() => input.lane_shift = Some(-1),
            Key::Right | Key::D if input.lane_shift.is_none() => input.lane_shift = Some(1),
            Key::P => input.pause = true,
            Key::Escape => input.end = true,
            _ => {}
        }
    }
    input
}

/// Mode card index for a number key (1-based on the keyboard)
pub fn mode_hotkey(key: Key) -> Option<usize> {
    match key {
        Key::Digit(n @ 1..=9) => Some(n as usize - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gameplay_mapping() {
        let input = gameplay_input(&[Key::A, Key::Right, Key::P], Some(3.0));
        assert_eq!(input.lane_shift, Some(-1));
        assert!(input.pause);
        assert!(!input.end);
        assert_eq!(input.steer, Some(1.0));

        let input = gameplay_input(&[Key::D, Key::Escape], None);
        assert_eq!(input.lane_shift, Some(1));
        assert!(input.end);
    }

    #[test]
    fn test_mode_hotkeys() {
        assert_eq!(mode_hotkey(Key::Digit(1)), Some(0));
        assert_eq!(mode_hotkey(Key::Digit(4)), Some(3));
        assert_eq!(mode_hotkey(Key::Digit(0)), None);
        assert_eq!(mode_hotkey(Key::Enter), None);
    }
}
