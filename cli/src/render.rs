use std::fmt::Write as _;

use minelayer_core::{GameState, Move, Outcome, Reveal, StepEvent, Tile};

/// Glyph for one tile. `show_mines` uncovers the layout on hidden tiles.
fn glyph(state: &GameState, pos: (u8, u8), show_mines: bool) -> char {
    match state.tile_at(pos) {
        Tile::Hidden if show_mines && state.has_mine_at(pos) => 'x',
        Tile::Hidden => '#',
        Tile::Flagged => 'F',
        Tile::Revealed(Reveal::Mine) => '*',
        Tile::Revealed(Reveal::Clue(0)) => '.',
        Tile::Revealed(Reveal::Clue(n)) => char::from(b'0' + n),
    }
}

/// Board with row and column labels.
pub fn board(state: &GameState, show_mines: bool) -> String {
    let (height, width) = state.size();
    let mut s = String::new();

    s.push_str("    ");
    for col in 0..width {
        let _ = write!(s, "{:>3}", col);
    }
    s.push('\n');

    for row in 0..height {
        let _ = write!(s, "{:>3} ", row);
        for col in 0..width {
            let _ = write!(s, "{:>3}", glyph(state, (row, col), show_mines));
        }
        s.push('\n');
    }
    s
}

pub fn hud(state: &GameState) -> String {
    let target = match state.total_mines_target() {
        Some(target) => target.to_string(),
        None => "-".into(),
    };
    format!(
        "Enemy HP: {}/{}  |  {:?} / {:?}  |  Mines: {} (target {})",
        state.enemy_health(),
        state.enemy_max_health(),
        state.turn(),
        state.phase(),
        state.mine_count(),
        target,
    )
}

fn enemy_move(mv: &Move, detonated: bool) -> String {
    let (row, col) = mv.pos;
    let mut line = format!("Enemy reveals ({}, {}) [{}]", row, col, mv.rationale());
    if detonated {
        line.push_str(" and hits a mine!");
    }
    line
}

/// Line describing one controller event, `None` for the silent ones.
pub fn event(event: &StepEvent) -> Option<String> {
    match event {
        StepEvent::MinePlaced((row, col)) => Some(format!("Mine laid at ({}, {})", row, col)),
        StepEvent::PlacementRejected { pos, outcome } => {
            Some(format!("Cannot lay a mine at {:?}: {:?}", pos, outcome))
        }
        StepEvent::EnemyMoved { mv, detonated, .. } => Some(enemy_move(mv, *detonated)),
        StepEvent::EnemyStalled => Some("Enemy has nothing left to reveal".into()),
        StepEvent::GameOver(outcome) => Some(outcome_line(*outcome).into()),
        StepEvent::Idle | StepEvent::Advanced { .. } | StepEvent::RoundOver => None,
    }
}

pub fn outcome_line(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::PlayerWin => "The enemy ran out of health. You win!",
        Outcome::EnemyWin => "The enemy cleared every safe tile. You lose.",
        Outcome::Ongoing => "The game goes on.",
    }
}
