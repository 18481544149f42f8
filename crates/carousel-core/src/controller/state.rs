use serde::{Deserialize, Serialize};

/// The only ways the current slide can change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Move forward one slide, stopping at the last
    Advance,
    /// Move back one slide, stopping at the first
    Retreat,
    /// Show the slide at this index
    JumpTo(usize),
}

/// Current slide index over a fixed number of slides
///
/// Invariant: `current_index < slide_count`, and `slide_count > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    current_index: usize,
    slide_count: usize,
}

impl CarouselState {
    /// Returns `None` for zero slides
    pub fn new(slide_count: usize) -> Option<Self> {
        (slide_count > 0).then_some(Self {
            current_index: 0,
            slide_count,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index == self.slide_count - 1
    }

    /// Command issued by a timer tick: advance, or wrap to the first slide
    pub fn auto_advance_command(&self) -> Command {
        if self.is_last() {
            Command::JumpTo(0)
        } else {
            Command::Advance
        }
    }

    /// Apply a command; returns false when it was a clamped no-op
    ///
    /// `JumpTo` always applies, even to the current index.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Advance => {
                if self.is_last() {
                    return false;
                }
                self.current_index += 1;
            }
            Command::Retreat => {
                if self.is_first() {
                    return false;
                }
                self.current_index -= 1;
            }
            Command::JumpTo(index) => {
                debug_assert!(index < self.slide_count, "dot index out of range");
                self.current_index = index;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_slides_has_no_state() {
        assert!(CarouselState::new(0).is_none());
    }

    #[test]
    fn test_advance_clamps_at_last() {
        let mut state = CarouselState::new(3).unwrap();
        for _ in 0..10 {
            state.apply(Command::Advance);
            assert!(state.current_index() <= 2);
        }
        assert_eq!(state.current_index(), 2);
        assert!(!state.apply(Command::Advance));
    }

    #[test]
    fn test_retreat_clamps_at_first() {
        let mut state = CarouselState::new(3).unwrap();
        state.apply(Command::JumpTo(2));
        for _ in 0..10 {
            state.apply(Command::Retreat);
        }
        assert_eq!(state.current_index(), 0);
        assert!(!state.apply(Command::Retreat));
    }

    #[test]
    fn test_auto_advance_wraps_only_at_last() {
        let mut state = CarouselState::new(2).unwrap();
        assert_eq!(state.auto_advance_command(), Command::Advance);
        state.apply(Command::Advance);
        assert_eq!(state.auto_advance_command(), Command::JumpTo(0));
    }

    #[test]
    fn test_jump_to_current_still_applies() {
        let mut state = CarouselState::new(1).unwrap();
        assert!(state.apply(Command::JumpTo(0)));
        assert!(!state.apply(Command::Advance));
        assert!(!state.apply(Command::Retreat));
    }
}
