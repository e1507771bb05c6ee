use std::fmt;

/// Represents a cell in the maze grid.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Solid rock. Every cell starts out as a wall before carving.
    #[default]
    Wall,
    /// A carved room or passage.
    Open,
    /// The room where the player spawns.
    Start,
    /// The room the player has to reach.
    End,
}

impl Cell {
    /// Symbol used for grid cells outside the maze.
    pub const OUT_OF_BOUNDS: char = 'X';
    /// Symbol used on the full map for cells the player has not seen yet.
    pub const UNKNOWN: char = '?';

    pub const fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Open => ' ',
            Cell::Start => 'S',
            Cell::End => 'E',
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
