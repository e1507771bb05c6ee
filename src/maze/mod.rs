pub mod cell;
pub mod compass;
pub mod grid;

pub use cell::Cell;
pub use compass::Facing;
pub use grid::Grid;

/// A generated maze: the cell grid plus the locations of its entrance and exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid<Cell>,
    start: (u16, u16),
    end: (u16, u16),
}

impl Maze {
    /// Wraps a carved grid. `start` and `end` must already hold `Cell::Start` and `Cell::End`.
    pub(crate) fn new(grid: Grid<Cell>, start: (u16, u16), end: (u16, u16)) -> Self {
        debug_assert_eq!(grid[start], Cell::Start);
        debug_assert_eq!(grid[end], Cell::End);
        Maze { grid, start, end }
    }

    /// Side length of the maze grid.
    pub fn dim(&self) -> u16 {
        self.grid.dim()
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn start(&self) -> (u16, u16) {
        self.start
    }

    pub fn end(&self) -> (u16, u16) {
        self.end
    }

    /// Returns the cell at a signed coordinate, or `None` outside the maze.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.get(x, y)
    }

    /// Renders the maze as one string per row using the cell symbols.
    pub fn rows(&self) -> Vec<String> {
        (0..self.dim())
            .map(|y| (0..self.dim()).map(|x| self[(x, y)].symbol()).collect())
            .collect()
    }

    /// Builds a maze from its row strings, for hand-drawn test layouts.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let dim = rows.len() as u16;
        let mut grid = Grid::new(dim, Cell::Wall);
        let (mut start, mut end) = (None, None);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), rows.len(), "test layouts must be square");
            for (x, symbol) in row.chars().enumerate() {
                let coord = (x as u16, y as u16);
                let cell = match symbol {
                    '#' => Cell::Wall,
                    ' ' => Cell::Open,
                    'S' => {
                        start = Some(coord);
                        Cell::Start
                    }
                    'E' => {
                        end = Some(coord);
                        Cell::End
                    }
                    other => panic!("unknown maze symbol {other:?}"),
                };
                grid.set(coord, cell);
            }
        }
        Maze::new(
            grid,
            start.expect("layout has no start"),
            end.expect("layout has no end"),
        )
    }
}

impl std::ops::Index<(u16, u16)> for Maze {
    type Output = Cell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.grid[index]
    }
}
