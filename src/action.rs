use serde::{Deserialize, Serialize};

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// Number of dice rolled in every throw.
pub const DICE_COUNT: usize = 3;

/// Which dice to reroll on a throw. `true` means the die at that position is rolled again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Action(pub [bool; DICE_COUNT]);

impl Action {
    /// Reroll nothing; ends the turn.
    pub const PASS: Action = Action([false, false, false]);
    /// Reroll every die; always used for the opening throw of a turn.
    pub const THROW_ALL: Action = Action([true, true, true]);
    pub const COUNT: usize = 1 << DICE_COUNT;

    /// Every possible mask, ordered by [`Action::index`].
    pub const ALL: [Action; Action::COUNT] = [
        Action([false, false, false]),
        Action([false, false, true]),
        Action([false, true, false]),
        Action([false, true, true]),
        Action([true, false, false]),
        Action([true, false, true]),
        Action([true, true, false]),
        Action([true, true, true]),
    ];

    pub fn mask(&self) -> [bool; DICE_COUNT] {
        self.0
    }

    pub fn is_pass(&self) -> bool {
        *self == Action::PASS
    }

    /// Number of dice this action rerolls.
    pub fn rerolled(&self) -> usize {
        self.0.iter().filter(|reroll| **reroll).count()
    }

    /// Position in [`Action::ALL`]: the mask read as a binary number, first die most significant.
    pub fn index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, reroll| (acc << 1) | usize::from(*reroll))
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// Parses text such as `"101"` or `"1 0 1"`.
    ///
    /// Returns `None` unless the input holds exactly three `0`/`1` digits.
    pub fn parse_mask(input: &str) -> Option<Action> {
        let mut mask = [false; DICE_COUNT];
        let mut count = 0;
        for ch in input.chars().filter(|ch| !ch.is_whitespace() && *ch != ',') {
            let bit = match ch {
                '0' => false,
                '1' => true,
                _ => return None,
            };
            if count == DICE_COUNT {
                return None;
            }
            mask[count] = bit;
            count += 1;
        }
        (count == DICE_COUNT).then_some(Action(mask))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for reroll in self.0 {
            write!(f, "{}", u8::from(reroll))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_table_order() {
        for (index, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), index);
            assert_eq!(Action::from_index(index), Some(*action));
        }
        assert_eq!(Action::from_index(Action::COUNT), None);
        assert_eq!(Action::PASS.index(), 0);
        assert_eq!(Action::THROW_ALL.index(), 7);
    }

    #[test]
    fn parse_accepts_binary_masks_only() {
        assert_eq!(Action::parse_mask("101"), Some(Action([true, false, true])));
        assert_eq!(Action::parse_mask(" 1 1 0\n"), Some(Action([true, true, false])));
        assert_eq!(Action::parse_mask("1,0,0"), Some(Action([true, false, false])));
        assert_eq!(Action::parse_mask("12"), None);
        assert_eq!(Action::parse_mask("1011"), None);
        assert_eq!(Action::parse_mask("10"), None);
        assert_eq!(Action::parse_mask("abc"), None);
        assert_eq!(Action::parse_mask(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for action in Action::ALL {
            assert_eq!(Action::parse_mask(&action.to_string()), Some(action));
        }
    }
}
