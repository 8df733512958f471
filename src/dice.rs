use std::array::from_fn;

use rand::Rng;

use crate::action::{Action, DICE_COUNT};
use crate::combination::{Combination, MAX_FACE, MIN_FACE};

/// A single physical die. `id` survives sorting so a mask always addresses the same die.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Die {
    pub id: u8,
    pub value: u8,
}

impl Die {
    fn roll<R: Rng>(&mut self, rng: &mut R) {
        self.value = rng.gen_range(MIN_FACE..=MAX_FACE);
    }
}

/// Three dice kept sorted from highest to lowest face after every throw.
#[derive(Clone, Debug)]
pub struct DiceSet {
    dice: [Die; DICE_COUNT],
}

impl DiceSet {
    /// Fresh set; faces read 0 until the first throw.
    pub fn new() -> Self {
        Self {
            dice: from_fn(|idx| Die {
                id: idx as u8,
                value: 0,
            }),
        }
    }

    /// Rerolls the masked positions, re-sorts, and returns the new combination.
    pub fn reroll<R: Rng>(&mut self, action: Action, rng: &mut R) -> Combination {
        for (die, reroll) in self.dice.iter_mut().zip(action.mask()) {
            if reroll {
                die.roll(rng);
            }
        }
        // Stable: equal faces keep their previous relative order.
        self.dice.sort_by(|a, b| b.value.cmp(&a.value));
        self.current_combination()
    }

    pub fn current_combination(&self) -> Combination {
        Combination::new(self.values())
    }

    pub fn values(&self) -> [u8; DICE_COUNT] {
        from_fn(|idx| self.dice[idx].value)
    }

    pub fn dice(&self) -> &[Die; DICE_COUNT] {
        &self.dice
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn throw_all_yields_sorted_faces_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut dice = DiceSet::new();
        for _ in 0..200 {
            let combination = dice.reroll(Action::THROW_ALL, &mut rng);
            let values = combination.values();
            assert!(values.iter().all(|v| (MIN_FACE..=MAX_FACE).contains(v)));
            assert!(values[0] >= values[1] && values[1] >= values[2]);
            assert_eq!(values, dice.values());
        }
    }

    #[test]
    fn pass_leaves_dice_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut dice = DiceSet::new();
        let first = dice.reroll(Action::THROW_ALL, &mut rng);
        let before = *dice.dice();
        let again = dice.reroll(Action::PASS, &mut rng);
        assert_eq!(first, again);
        assert_eq!(before, *dice.dice());
    }

    #[test]
    fn masked_positions_are_the_only_ones_rerolled() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut dice = DiceSet::new();
        dice.reroll(Action::THROW_ALL, &mut rng);
        for _ in 0..200 {
            let before = *dice.dice();
            let action = Action([true, false, false]);
            dice.reroll(action, &mut rng);
            // The two kept dice are still present with their faces.
            for kept in &before[1..] {
                assert!(
                    dice.dice()
                        .iter()
                        .any(|die| die.id == kept.id && die.value == kept.value)
                );
            }
        }
    }

    #[test]
    fn identities_survive_sorting() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut dice = DiceSet::new();
        for _ in 0..50 {
            dice.reroll(Action::THROW_ALL, &mut rng);
            let mut ids: Vec<u8> = dice.dice().iter().map(|die| die.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec![0, 1, 2]);
        }
    }

    #[test]
    fn current_combination_does_not_roll() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut dice = DiceSet::new();
        let thrown = dice.reroll(Action::THROW_ALL, &mut rng);
        assert_eq!(dice.current_combination(), thrown);
        assert_eq!(dice.current_combination(), thrown);
    }
}
