use super::*;

/// Spreads the configured mines uniformly over the board.
///
/// The mine count is cut down to fit the board and the mine target, so a fresh game never starts
/// above its own budget.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RandomBoardGenerator;

impl BoardGenerator for RandomBoardGenerator {
    fn generate<R: Rng + ?Sized>(self, config: &GameConfig, rng: &mut R) -> Result<GameState> {
        config.validate()?;

        let total_cells = config.total_cells();
        let mut mines = config.mines;
        if let Some(target) = config.total_mines_target {
            if mines > target {
                log::warn!(
                    "Initial mines exceed the mine target, requested {} but target is {}",
                    mines,
                    target
                );
                mines = target;
            }
        }

        let (_, width) = config.size;
        let mut layout = MineLayout::empty(config.size);
        for index in rand::seq::index::sample(rng, total_cells.into(), mines.into()) {
            // index < total_cells, so both parts fit a coordinate
            let pos = ((index / usize::from(width)) as Coord, (index % usize::from(width)) as Coord);
            layout.insert(pos);
        }

        if layout.mine_count() != mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mines
            );
        }
        log::debug!(
            "Generated {}x{} board with {} mines, seed {}",
            config.size.0,
            config.size.1,
            layout.mine_count(),
            config.seed
        );

        Ok(GameState::new(
            layout,
            config.enemy_health,
            config.total_mines_target,
            config.seed,
        ))
    }
}
