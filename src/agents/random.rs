use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::player::Player;
use crate::state::Observation;

/// Baseline agent that samples uniformly from the eight reroll masks.
pub struct RandomAgent<R: Rng> {
    name: String,
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        Self::named("RandomPlayer", rng)
    }

    pub fn named(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl<R: Rng> Player for RandomAgent<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&mut self, _observation: &Observation) -> Action {
        *Action::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Action::PASS)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn observation() -> Observation {
        Observation {
            player_comb: [5, 3, 3],
            opp_comb: [6, 6, 2],
            round_nb: 4,
            max_throws: 3,
            current_throws: 1,
            state_round: 1,
            player_score: 9,
            opp_score: 11,
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let mut first = RandomAgent::new(StdRng::seed_from_u64(12));
        let mut second = RandomAgent::new(StdRng::seed_from_u64(12));
        for _ in 0..50 {
            assert_eq!(
                first.choose_action(&observation()),
                second.choose_action(&observation())
            );
        }
    }

    #[test]
    fn every_mask_is_eventually_chosen() {
        let mut agent = RandomAgent::named("Dice", StdRng::seed_from_u64(5));
        assert_eq!(agent.name(), "Dice");
        let mut seen = [false; Action::COUNT];
        for _ in 0..500 {
            seen[agent.choose_action(&observation()).index()] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }
}
