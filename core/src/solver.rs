use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Tolerance used when comparing risks for ties.
///
/// Risks are ratios of small integers, so distinct values are far further apart than this, while
/// equal ratios reached through different divisions can differ in the last few bits.
pub const RISK_EPSILON: f64 = 1e-12;

/// Risk reported when no clue says anything about the chosen tile.
pub const UNINFORMED_RISK: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Reveal,
}

/// Which fallback level produced a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTier {
    /// Some clue proves the tile safe.
    DeducedSafe,
    /// Best of the tiles that clues put a risk on.
    LowestRisk,
    /// No clue touches any hidden tile, picked blindly.
    Uninformed,
}

/// A decision of the enemy.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub pos: Pos,
    pub risk: f64,
    pub tier: MoveTier,
}

impl Move {
    /// Human-readable reason for the move, for display and logs only.
    pub fn rationale(&self) -> String {
        match self.tier {
            MoveTier::DeducedSafe => "deduced safe".into(),
            MoveTier::LowestRisk => format!("min-risk p≈{:.3}", self.risk),
            MoveTier::Uninformed => "fallback (no frontier)".into(),
        }
    }
}

/// Everything single clues can tell about the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deduction {
    pub safe: BTreeSet<Pos>,
    pub mines: BTreeSet<Pos>,
    /// Lowest local risk any clue assigned to a tile.
    pub risk: BTreeMap<Pos, f64>,
    /// Clues ignored because they contradict the board.
    pub inconsistent: Vec<Pos>,
}

/// Reads every frontier clue on its own, without mutating the board.
pub fn deduce(state: &GameState) -> Deduction {
    let mut deduction = Deduction::default();

    for clue in sweep_frontier(state) {
        let reading = clue.reading();
        if reading == ClueReading::Inconsistent {
            log::trace!("Skipping inconsistent clue {:?}", clue);
            deduction.inconsistent.push(clue.pos);
            continue;
        }

        let hidden: SmallVec<[Pos; 8]> = state
            .neighbors(clue.pos)
            .filter(|&nb| state.tile_at(nb).is_hidden())
            .collect();

        match reading {
            ClueReading::AllSafe => deduction.safe.extend(hidden),
            ClueReading::AllMines => deduction.mines.extend(hidden),
            ClueReading::Risk(local) => {
                for pos in hidden {
                    deduction
                        .risk
                        .entry(pos)
                        .and_modify(|risk| *risk = risk.min(local))
                        .or_insert(local);
                }
            }
            ClueReading::Inconsistent => {}
        }
    }

    deduction
}

/// Picks the enemy's next reveal, flagging every certain mine on the way.
///
/// Priority is a proven-safe tile, then the lowest-risk tile next to a clue, then any hidden tile.
/// Ties are broken uniformly with `rng`. Returns `None` only when nothing is hidden.
pub fn deduce_and_move<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<Move> {
    let deduction = deduce(state);

    for &pos in &deduction.mines {
        if state.flag(pos) {
            log::debug!("Flagged certain mine at {:?}", pos);
        }
    }

    let safe: Vec<Pos> = deduction
        .safe
        .iter()
        .copied()
        .filter(|&pos| state.tile_at(pos).is_hidden())
        .collect();
    if let Some(&pos) = safe.choose(rng) {
        return Some(reveal_move(pos, 0.0, MoveTier::DeducedSafe));
    }

    let candidates: Vec<(Pos, f64)> = deduction
        .risk
        .iter()
        .map(|(&pos, &risk)| (pos, risk))
        .filter(|&(pos, _)| state.tile_at(pos).is_hidden())
        .collect();
    if let Some(min_risk) = candidates.iter().map(|&(_, risk)| risk).reduce(f64::min) {
        let best: Vec<Pos> = candidates
            .iter()
            .filter(|&&(_, risk)| nearly_equal(risk, min_risk))
            .map(|&(pos, _)| pos)
            .collect();
        if let Some(&pos) = best.choose(rng) {
            return Some(reveal_move(pos, min_risk, MoveTier::LowestRisk));
        }
    }

    let any_hidden: Vec<Pos> = state.hidden().collect();
    any_hidden
        .choose(rng)
        .map(|&pos| reveal_move(pos, UNINFORMED_RISK, MoveTier::Uninformed))
}

fn reveal_move(pos: Pos, risk: f64, tier: MoveTier) -> Move {
    let mv = Move {
        kind: MoveKind::Reveal,
        pos,
        risk,
        tier,
    };
    log::debug!("Enemy chose {:?}: {}", pos, mv.rationale());
    mv
}

fn nearly_equal(a: f64, b: f64) -> bool {
    let diff = a - b;
    -RISK_EPSILON < diff && diff < RISK_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    fn state(size: Pos, mines: &[Pos]) -> GameState {
        GameState::new(MineLayout::from_mine_coords(size, mines).unwrap(), 3, None, 0)
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn single_clue_flags_its_only_neighbor_then_falls_back() {
        // (0,1) ends up the lone clue, its only hidden neighbor is the mine
        let mut state = state((1, 4), &[(0, 2)]);
        state.reveal((0, 0));

        let mv = deduce_and_move(&mut state, &mut rng()).unwrap();

        assert_eq!(state.tile_at((0, 2)), Tile::Flagged);
        assert_eq!(mv.tier, MoveTier::Uninformed);
        assert_eq!(mv.pos, (0, 3));
        assert_eq!(mv.risk, UNINFORMED_RISK);
    }

    #[test]
    fn zero_clue_makes_neighbors_safe() {
        let mut state = state((1, 3), &[]);
        state.grid[[0, 1]] = Tile::Revealed(Reveal::Clue(0));

        let deduction = deduce(&state);
        let mv = deduce_and_move(&mut state, &mut rng()).unwrap();

        assert_eq!(deduction.safe, BTreeSet::from([(0, 0), (0, 2)]));
        assert_eq!(mv.tier, MoveTier::DeducedSafe);
        assert_eq!(mv.risk, 0.0);
        assert!(deduction.safe.contains(&mv.pos));
    }

    #[test]
    fn safe_tiles_beat_low_risk_tiles() {
        // (0,0) puts a risk on three tiles, the zero at (0,4) proves its neighbors safe
        let mut state = state((3, 5), &[(1, 1)]);
        state.grid[[0, 0]] = Tile::Revealed(Reveal::Clue(1));
        state.grid[[0, 4]] = Tile::Revealed(Reveal::Clue(0));

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mv = deduce_and_move(&mut state.clone(), &mut rng).unwrap();

            assert_eq!(mv.tier, MoveTier::DeducedSafe);
            assert!([(0, 3), (1, 3), (1, 4)].contains(&mv.pos));
        }
    }

    #[test]
    fn risk_is_minimum_over_touching_clues() {
        // hidden middle row between two rows of revealed mines
        let mut state = state((3, 10), &[]);
        for col in 0..10 {
            state.grid[[0, col]] = Tile::Revealed(Reveal::Mine);
            state.grid[[2, col]] = Tile::Revealed(Reveal::Mine);
        }
        // (0,1) sees hidden (1,0),(1,1),(1,2) and revealed mines (0,0),(0,2)
        state.grid[[0, 1]] = Tile::Revealed(Reveal::Clue(3));
        // (2,2) sees hidden (1,1),(1,2),(1,3) and revealed mines (2,1),(2,3)
        state.grid[[2, 2]] = Tile::Revealed(Reveal::Clue(4));

        let deduction = deduce(&state);

        let third = 1.0 / 3.0;
        let two_thirds = 2.0 / 3.0;
        assert_eq!(deduction.risk[&(1, 0)], third);
        assert_eq!(deduction.risk[&(1, 1)], third);
        assert_eq!(deduction.risk[&(1, 2)], third);
        assert_eq!(deduction.risk[&(1, 3)], two_thirds);

        let mv = deduce_and_move(&mut state, &mut rng()).unwrap();
        assert_eq!(mv.tier, MoveTier::LowestRisk);
        assert_eq!(mv.risk, third);
        assert!([(1, 0), (1, 1), (1, 2)].contains(&mv.pos));
    }

    #[test]
    fn certain_mines_are_flagged_and_not_chosen() {
        let mut state = state((2, 2), &[(1, 1)]);
        state.grid[[0, 0]] = Tile::Revealed(Reveal::Clue(3));

        let mv = deduce_and_move(&mut state, &mut rng());

        assert_eq!(state.flags().count(), 3);
        assert_eq!(mv, None);
    }

    #[test]
    fn inconsistent_clue_is_ignored() {
        let mut state = state((1, 3), &[]);
        state.grid[[0, 0]] = Tile::Revealed(Reveal::Clue(5));

        let deduction = deduce(&state);
        let mv = deduce_and_move(&mut state, &mut rng()).unwrap();

        assert_eq!(deduction.inconsistent, [(0, 0)]);
        assert_eq!(mv.tier, MoveTier::Uninformed);
        assert_eq!(state.flags().count(), 0);
    }

    #[test]
    fn fully_revealed_board_has_no_move() {
        let mut state = state((2, 2), &[]);
        state.reveal((0, 0));

        assert_eq!(deduce_and_move(&mut state, &mut rng()), None);
    }

    #[test]
    fn same_seed_same_choice() {
        let mut state = state((6, 6), &[]);
        state.grid[[0, 0]] = Tile::Revealed(Reveal::Clue(1));
        state.grid[[5, 5]] = Tile::Revealed(Reveal::Clue(1));

        let first = deduce_and_move(&mut state.clone(), &mut rng());
        let second = deduce_and_move(&mut state.clone(), &mut rng());

        assert_eq!(first, second);
    }

    #[test]
    fn rationale_names_the_tier() {
        let mv = reveal_move((0, 0), 0.25, MoveTier::LowestRisk);

        assert_eq!(mv.rationale(), "min-risk p≈0.250");
    }
}
