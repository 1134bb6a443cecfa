use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::*;

/// Result of trying to lay a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed,
    OutOfBounds,
    /// Target is revealed or flagged.
    NotHidden,
    AlreadyMined,
    /// Would exceed the configured mine target.
    OverBudget,
}

impl PlaceOutcome {
    pub const fn is_placed(self) -> bool {
        matches!(self, Self::Placed)
    }
}

impl GameState {
    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.mine_layout.in_bounds(pos)
    }

    /// In-bounds king-move neighbors of `pos`, in a fixed order.
    pub fn neighbors(&self, pos: Pos) -> NeighborIter {
        self.grid.iter_neighbors(pos)
    }

    pub fn adjacent_mine_count(&self, pos: Pos) -> u8 {
        self.mine_layout.adjacent_mine_count(pos)
    }

    /// Opens a hidden tile, flooding outwards from zero clues.
    ///
    /// Returns every position that went from hidden to revealed, in reveal order. Out of bounds,
    /// revealed and flagged targets are left alone and yield an empty list.
    pub fn reveal(&mut self, pos: Pos) -> Vec<Pos> {
        let mut newly = Vec::new();

        if !self.in_bounds(pos) || !self.tile_at(pos).is_hidden() {
            return newly;
        }

        let reveal = self.reveal_single_tile(pos);
        newly.push(pos);
        log::debug!("Reveal at {:?}: {:?}", pos, reveal);

        if reveal != Reveal::Clue(0) {
            return newly;
        }

        let mut to_visit = VecDeque::from([pos]);
        while let Some(visit_pos) = to_visit.pop_front() {
            for nb in self.neighbors(visit_pos) {
                if !self.tile_at(nb).is_hidden() || self.has_mine_at(nb) {
                    continue;
                }

                let nb_reveal = self.reveal_single_tile(nb);
                newly.push(nb);
                log::trace!("Flood revealed {:?}: {:?}", nb, nb_reveal);

                if nb_reveal == Reveal::Clue(0) {
                    to_visit.push_back(nb);
                }
            }
        }

        newly
    }

    /// Lays a mine on a hidden tile and bumps the clue of every revealed safe neighbor.
    ///
    /// Nothing is revealed. On rejection the state is untouched.
    pub fn place_mine_and_update_numbers(&mut self, pos: Pos) -> PlaceOutcome {
        use PlaceOutcome::*;

        if !self.in_bounds(pos) {
            return OutOfBounds;
        }
        if !self.tile_at(pos).is_hidden() {
            return NotHidden;
        }
        if self.has_mine_at(pos) {
            return AlreadyMined;
        }
        if let Some(target) = self.total_mines_target {
            if self.mine_count() >= target {
                return OverBudget;
            }
        }

        self.mine_layout.insert(pos);

        for nb in self.neighbors(pos) {
            let tile = &mut self.grid[nb.to_nd_index()];
            // revealed mines keep their sentinel, covered tiles have no clue yet
            if let Tile::Revealed(Reveal::Clue(count)) = *tile {
                *tile = Tile::Revealed(Reveal::Clue(count + 1));
            }
        }

        log::debug!("Mine placed at {:?}, total {}", pos, self.mine_count());
        Placed
    }

    /// Marks a hidden tile as flagged, returning whether anything changed.
    pub(crate) fn flag(&mut self, pos: Pos) -> bool {
        let tile = &mut self.grid[pos.to_nd_index()];
        if tile.is_hidden() {
            *tile = Tile::Flagged;
            true
        } else {
            false
        }
    }

    fn reveal_single_tile(&mut self, pos: Pos) -> Reveal {
        let reveal = if self.has_mine_at(pos) {
            Reveal::Mine
        } else {
            Reveal::Clue(self.adjacent_mine_count(pos))
        };
        self.grid[pos.to_nd_index()] = Tile::Revealed(reveal);
        reveal
    }
}
