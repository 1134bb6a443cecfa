use alloc::vec::Vec;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Request coming from the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    PlaceMine { pos: Pos },
    /// Handled by the front end; the controller treats it as no input.
    Quit,
}

/// What a single controller step did.
#[derive(Clone, Debug, PartialEq)]
pub enum StepEvent {
    /// Nothing happened: waiting on input, or the game is over.
    Idle,
    /// A pass-through phase was left.
    Advanced { from: Phase, to: Phase },
    MinePlaced(Pos),
    PlacementRejected { pos: Pos, outcome: PlaceOutcome },
    EnemyMoved {
        mv: Move,
        revealed: Vec<Pos>,
        detonated: bool,
    },
    /// The solver found nothing hidden to reveal.
    EnemyStalled,
    /// Neither side has won, back to the player.
    RoundOver,
    GameOver(Outcome),
}

/// Advances the turn controller by exactly one transition.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    intent: Option<Intent>,
    rules: &Rules,
    rng: &mut R,
) -> StepEvent {
    match state.phase {
        Phase::Init => pass_through(state, Phase::PlayerInput),
        Phase::PlayerInput => player_input(state, intent),
        Phase::PlayerResolve => pass_through(state, Phase::EnemyThink),
        Phase::EnemyThink => enemy_think(state, rules, rng),
        Phase::EnemyAct => pass_through(state, Phase::CheckWinLose),
        Phase::CheckWinLose => check_win_lose(state),
        Phase::GameOver => StepEvent::Idle,
    }
}

fn pass_through(state: &mut GameState, to: Phase) -> StepEvent {
    let from = state.phase;
    log::debug!("Passing through {:?} to {:?}", from, to);
    state.phase = to;
    StepEvent::Advanced { from, to }
}

fn player_input(state: &mut GameState, intent: Option<Intent>) -> StepEvent {
    let Some(Intent::PlaceMine { pos }) = intent else {
        return StepEvent::Idle;
    };

    match state.place_mine_and_update_numbers(pos) {
        PlaceOutcome::Placed => {
            state.turn = Turn::Enemy;
            state.phase = Phase::EnemyThink;
            StepEvent::MinePlaced(pos)
        }
        outcome => {
            log::debug!("Placement at {:?} rejected: {:?}", pos, outcome);
            StepEvent::PlacementRejected { pos, outcome }
        }
    }
}

fn enemy_think<R: Rng + ?Sized>(state: &mut GameState, rules: &Rules, rng: &mut R) -> StepEvent {
    let event = match deduce_and_move(state, rng) {
        Some(mv) => {
            let revealed = state.reveal(mv.pos);
            let detonated = state.has_mine_at(mv.pos);
            if detonated {
                state.enemy_health -= rules.damage_per_mine;
                log::debug!(
                    "Enemy hit a mine at {:?}, health {}/{}",
                    mv.pos,
                    state.enemy_health,
                    state.enemy_max_health
                );
            }
            state.enemy_moves += 1;
            StepEvent::EnemyMoved {
                mv,
                revealed,
                detonated,
            }
        }
        None => StepEvent::EnemyStalled,
    };

    state.phase = Phase::CheckWinLose;
    event
}

fn check_win_lose(state: &mut GameState) -> StepEvent {
    let outcome = if state.enemy_health <= 0 {
        Outcome::PlayerWin
    } else if state.all_safe_revealed() {
        Outcome::EnemyWin
    } else {
        state.turn = Turn::Player;
        state.phase = Phase::PlayerInput;
        return StepEvent::RoundOver;
    };

    log::debug!("Game over: {:?}", outcome);
    state.outcome = outcome;
    state.phase = Phase::GameOver;
    StepEvent::GameOver(outcome)
}

/// One game in progress together with its rules and random source.
#[derive(Clone, Debug)]
pub struct Session {
    state: GameState,
    rules: Rules,
    rng: SmallRng,
}

impl Session {
    /// Generates a board for `config`; board and enemy draw from one generator seeded with
    /// `config.seed`.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let state = RandomBoardGenerator.generate(config, &mut rng)?;
        Ok(Self {
            state,
            rules: config.rules(),
            rng,
        })
    }

    /// Continues a loaded game.
    ///
    /// The random stream restarts from the game seed mixed with the number of enemy moves made,
    /// so resuming the same save twice plays out the same way.
    pub fn resume(state: GameState, rules: Rules) -> Self {
        let stream = u64::from(state.enemy_moves).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let rng = SmallRng::seed_from_u64(state.seed ^ stream);
        Self { state, rules, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn step(&mut self, intent: Option<Intent>) -> StepEvent {
        step(&mut self.state, intent, &self.rules, &mut self.rng)
    }

    /// Places a mine and lets the enemy answer, stopping once the player is needed again or the
    /// game ends.
    ///
    /// A rejected placement yields just the rejection event.
    pub fn play_round(&mut self, pos: Pos) -> Vec<StepEvent> {
        let mut events = Vec::new();

        // finish anything left over from a loaded game first
        events.extend(self.run_until_input());
        if self.state.is_over() {
            return events;
        }

        let placed = self.step(Some(Intent::PlaceMine { pos }));
        let accepted = matches!(placed, StepEvent::MinePlaced(_));
        events.push(placed);
        if accepted {
            events.extend(self.run_until_input());
        }
        events
    }

    /// Steps through every phase that does not need the player.
    pub fn run_until_input(&mut self) -> Vec<StepEvent> {
        let mut events = Vec::new();
        while !self.state.phase.awaits_player() && !self.state.is_over() {
            events.push(self.step(None));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(size: Pos, mines: &[Pos], health: i32) -> GameState {
        GameState::new(
            MineLayout::from_mine_coords(size, mines).unwrap(),
            health,
            None,
            0,
        )
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(3)
    }

    #[test]
    fn player_input_waits_without_placement() {
        let mut state = state((3, 3), &[], 3);
        let before = state.clone();

        assert_eq!(step(&mut state, None, &Rules::default(), &mut rng()), StepEvent::Idle);
        assert_eq!(
            step(&mut state, Some(Intent::Quit), &Rules::default(), &mut rng()),
            StepEvent::Idle
        );
        assert_eq!(state, before);
    }

    #[test]
    fn rejected_placement_stays_in_player_input() {
        let mut state = state((3, 3), &[(1, 1)], 3);

        let event = step(
            &mut state,
            Some(Intent::PlaceMine { pos: (1, 1) }),
            &Rules::default(),
            &mut rng(),
        );

        assert_eq!(
            event,
            StepEvent::PlacementRejected {
                pos: (1, 1),
                outcome: PlaceOutcome::AlreadyMined
            }
        );
        assert_eq!(state.phase(), Phase::PlayerInput);
    }

    #[test]
    fn one_step_per_transition() {
        let mut state = state((3, 3), &[], 3);
        let rules = Rules::default();
        let mut rng = rng();

        let placed = step(&mut state, Some(Intent::PlaceMine { pos: (0, 0) }), &rules, &mut rng);
        assert_eq!(placed, StepEvent::MinePlaced((0, 0)));
        assert_eq!(state.phase(), Phase::EnemyThink);
        assert_eq!(state.turn(), Turn::Enemy);

        let moved = step(&mut state, None, &rules, &mut rng);
        assert!(matches!(moved, StepEvent::EnemyMoved { .. }));
        assert_eq!(state.phase(), Phase::CheckWinLose);
        assert_eq!(state.enemy_moves(), 1);

        step(&mut state, None, &rules, &mut rng);
        assert!(matches!(state.phase(), Phase::PlayerInput | Phase::GameOver));
    }

    #[test]
    fn detonation_costs_health() {
        // every hidden tile but the new one is a mine, so the enemy must hit one
        let mut state = state((1, 3), &[(0, 0), (0, 1)], 2);
        let rules = Rules { damage_per_mine: 2 };
        let mut rng = rng();

        step(&mut state, Some(Intent::PlaceMine { pos: (0, 2) }), &rules, &mut rng);
        let event = step(&mut state, None, &rules, &mut rng);

        let StepEvent::EnemyMoved { detonated, mv, .. } = event.clone() else {
            panic!("expected a move, got {:?}", event);
        };
        assert!(detonated);
        assert_eq!(mv.tier, MoveTier::Uninformed);
        assert_eq!(state.enemy_health(), 0);

        assert_eq!(
            step(&mut state, None, &rules, &mut rng),
            StepEvent::GameOver(Outcome::PlayerWin)
        );
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.outcome(), Outcome::PlayerWin);
    }

    #[test]
    fn enemy_wins_when_every_safe_tile_is_open() {
        let mut state = state((1, 2), &[], 3);
        state.reveal((0, 0));
        state.phase = Phase::CheckWinLose;

        let event = step(&mut state, None, &Rules::default(), &mut rng());

        assert_eq!(event, StepEvent::GameOver(Outcome::EnemyWin));
        assert_eq!(state.outcome(), Outcome::EnemyWin);
    }

    #[test]
    fn stalled_enemy_still_checks_outcome() {
        let mut state = state((1, 1), &[(0, 0)], 3);
        state.flag((0, 0));
        state.phase = Phase::EnemyThink;
        let rules = Rules::default();
        let mut rng = rng();

        assert_eq!(step(&mut state, None, &rules, &mut rng), StepEvent::EnemyStalled);
        assert_eq!(state.phase(), Phase::CheckWinLose);
        // no safe tiles at all
        assert_eq!(
            step(&mut state, None, &rules, &mut rng),
            StepEvent::GameOver(Outcome::EnemyWin)
        );
    }

    #[test]
    fn game_over_is_terminal() {
        let mut state = state((2, 2), &[], 3);
        state.phase = Phase::GameOver;
        state.outcome = Outcome::PlayerWin;
        let before = state.clone();

        let event = step(
            &mut state,
            Some(Intent::PlaceMine { pos: (0, 0) }),
            &Rules::default(),
            &mut rng(),
        );

        assert_eq!(event, StepEvent::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn unused_phases_pass_through() {
        let rules = Rules::default();
        let mut rng = rng();
        for (from, to) in [
            (Phase::Init, Phase::PlayerInput),
            (Phase::PlayerResolve, Phase::EnemyThink),
            (Phase::EnemyAct, Phase::CheckWinLose),
        ] {
            let mut state = state((2, 2), &[], 3);
            state.phase = from;

            assert_eq!(
                step(&mut state, None, &rules, &mut rng),
                StepEvent::Advanced { from, to }
            );
            assert_eq!(state.phase(), to);
        }
    }

    #[test]
    fn player_wins_on_the_detonation_that_empties_health() {
        // the only safe tile is flagged, so every enemy reveal is a mine
        let health = 3;
        let mut state = state((1, 5), &[(0, 1), (0, 2), (0, 3), (0, 4)], health);
        state.flag((0, 0));
        let rules = Rules { damage_per_mine: 1 };
        let mut rng = rng();

        let mut detonations = 0;
        let outcome = loop {
            state.phase = Phase::EnemyThink;
            let event = step(&mut state, None, &rules, &mut rng);
            assert!(matches!(event, StepEvent::EnemyMoved { detonated: true, .. }));
            detonations += 1;

            match step(&mut state, None, &rules, &mut rng) {
                StepEvent::GameOver(outcome) => break outcome,
                event => assert_eq!(event, StepEvent::RoundOver),
            }
        };

        assert_eq!(outcome, Outcome::PlayerWin);
        assert_eq!(detonations, health);
        assert_eq!(state.enemy_health(), 0);
    }

    #[test]
    fn session_replays_identically_from_seed() {
        let config = GameConfig {
            seed: 99,
            ..GameConfig::new((8, 8), 6)
        };
        let placements = [(0, 0), (7, 7), (3, 4), (4, 3), (0, 7), (7, 0)];

        let play = || {
            let mut session = Session::new(&config).unwrap();
            let mut log = Vec::new();
            for &pos in &placements {
                if session.state().is_over() {
                    break;
                }
                log.extend(session.play_round(pos));
            }
            (log, session.into_state())
        };

        assert_eq!(play(), play());
    }

    #[test]
    fn play_round_returns_to_player_or_ends() {
        let config = GameConfig::new((6, 6), 4);
        let mut session = Session::new(&config).unwrap();
        let pos = session.state().hidden().find(|&pos| !session.state().has_mine_at(pos)).unwrap();

        let events = session.play_round(pos);

        assert_eq!(events.first(), Some(&StepEvent::MinePlaced(pos)));
        assert!(events.iter().any(|event| matches!(event, StepEvent::EnemyMoved { .. })));
        let phase = session.state().phase();
        assert!(phase == Phase::PlayerInput || phase == Phase::GameOver);
    }

    #[test]
    fn intent_uses_tagged_wire_format() {
        let place = Intent::PlaceMine { pos: (2, 5) };

        assert_eq!(
            serde_json::to_string(&place).unwrap(),
            r#"{"type":"PLACE_MINE","pos":[2,5]}"#
        );
        assert_eq!(
            serde_json::from_str::<Intent>(r#"{"type":"QUIT"}"#).unwrap(),
            Intent::Quit
        );
    }
}
