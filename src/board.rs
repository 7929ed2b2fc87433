use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SnekError};
use crate::TermInt;

/// A cell in simulation space: `y` grows upward from the bottom border, `x`
/// grows rightward from the left border.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Pos { y, x }
    }

    pub fn offset(self, (dy, dx): (i32, i32)) -> Self {
        Pos::new(self.y + dy, self.x + dx)
    }
}

/// The playing field. Row/column 0 and `height - 1`/`width - 1` are walls,
/// everything in between is playable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    height: TermInt,
    width: TermInt,
}

impl Board {
    pub fn new(height: TermInt, width: TermInt) -> Result<Self> {
        let playable = height.saturating_sub(2) as usize * width.saturating_sub(2) as usize;
        if playable < 2 {
            return Err(SnekError::BoardTooSmall { height, width });
        }

        Ok(Board { height, width })
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (1..=self.max_y()).contains(&pos.y) && (1..=self.max_x()).contains(&pos.x)
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let (max_y, max_x) = (self.max_y(), self.max_x());
        (1..=max_y).flat_map(move |y| (1..=max_x).map(move |x| Pos::new(y, x)))
    }

    /// Picks a playable cell uniformly among those not in `excluded`. `None`
    /// means the board is full.
    pub fn choose_free_cell<R: Rng + ?Sized>(&self, rng: &mut R, excluded: &HashSet<Pos>) -> Option<Pos> {
        let free: Vec<Pos> = self.cells().filter(|pos| !excluded.contains(pos)).collect();
        free.choose(rng).copied()
    }

    /// Simulation space to `(row, col)` on screen. `None` for cells that do not
    /// exist on the display.
    pub fn to_screen(&self, pos: Pos) -> Option<(TermInt, TermInt)> {
        let row = self.bottom_row() - pos.y;
        let in_screen = (0..self.height as i32).contains(&row) && (0..self.width as i32).contains(&pos.x);
        in_screen.then(|| (row as TermInt, pos.x as TermInt))
    }

    #[cfg(test)]
    pub fn from_screen(&self, row: TermInt, col: TermInt) -> Pos {
        Pos::new(self.bottom_row() - row as i32, col as i32)
    }

    fn bottom_row(&self) -> i32 {
        self.height as i32 - 1
    }

    fn max_y(&self) -> i32 {
        self.height as i32 - 2
    }

    fn max_x(&self) -> i32 {
        self.width as i32 - 2
    }
}
