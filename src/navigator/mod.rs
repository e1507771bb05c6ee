mod scan;

use rand::Rng;

pub use scan::{CorridorScan, Sight};

use crate::{
    error::Result,
    generators::hunt_and_kill,
    maze::{Cell, Facing, Grid, Maze},
};

/// Radius of the minimap window around the player.
pub const DEFAULT_MINIMAP_RADIUS: usize = 2;
/// Widest minimap window the sidebar will draw.
pub const MAX_MINIMAP_RADIUS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    Playing,
    /// The player has stood on the end cell. Never left once entered.
    Won,
}

/// Where the player stands and which way they look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    position: (u16, u16),
    facing: Facing,
    status: PlayStatus,
}

impl PlayerState {
    pub fn position(&self) -> (u16, u16) {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn status(&self) -> PlayStatus {
        self.status
    }
}

/// Result of trying to step forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved to the given cell.
    Moved((u16, u16)),
    /// A wall or the edge of the maze is in the way. Nothing changed.
    Blocked,
    /// The player moved onto the end cell.
    ReachedEnd,
}

/// One maze session: the maze, the player in it, and the cells the player has seen.
pub struct MazeNavigator {
    maze: Maze,
    player: PlayerState,
    discovered: Grid<bool>,
}

impl MazeNavigator {
    /// Start a session on `maze` with the player at the start cell facing South.
    pub fn new(maze: Maze) -> Self {
        let discovered = Grid::new(maze.dim(), false);
        let player = PlayerState {
            position: maze.start(),
            facing: Facing::South,
            status: PlayStatus::Playing,
        };
        MazeNavigator {
            maze,
            player,
            discovered,
        }
    }

    /// Generate a fresh Hunt-and-Kill maze of side `dim` and start a session on it.
    pub fn generate<R: Rng + ?Sized>(dim: u16, rng: &mut R) -> Result<Self> {
        Ok(MazeNavigator::new(hunt_and_kill(dim, rng)?))
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn position(&self) -> (u16, u16) {
        self.player.position
    }

    pub fn facing(&self) -> Facing {
        self.player.facing
    }

    /// Whether the player has reached the end. Does not change any state.
    pub fn check_win(&self) -> bool {
        self.player.status == PlayStatus::Won
    }

    pub fn is_discovered(&self, coord: (u16, u16)) -> bool {
        self.discovered[coord]
    }

    /// Step one cell in the facing direction.
    ///
    /// The target is clamped to the grid on each axis. Walls block the move
    /// without changing anything. Landing on the end cell wins the maze for good.
    pub fn move_forward(&mut self) -> MoveOutcome {
        let (x, y) = self.player.position;
        let (dx, dy) = self.player.facing.delta();
        let last = self.maze.dim() as i32 - 1;
        let target = (
            (x as i32 + dx).clamp(0, last) as u16,
            (y as i32 + dy).clamp(0, last) as u16,
        );

        if target == self.player.position || self.maze[target].is_wall() {
            tracing::trace!("[navigator] blocked at {:?} facing {}", (x, y), self.player.facing);
            return MoveOutcome::Blocked;
        }

        self.player.position = target;
        if target == self.maze.end() {
            if self.player.status == PlayStatus::Playing {
                tracing::info!("[navigator] reached the end at {:?}", target);
            }
            self.player.status = PlayStatus::Won;
            return MoveOutcome::ReachedEnd;
        }
        MoveOutcome::Moved(target)
    }

    /// Quarter turn counter-clockwise. Returns the new facing.
    pub fn turn_left(&mut self) -> Facing {
        self.player.facing = self.player.facing.turned_left();
        self.player.facing
    }

    /// Quarter turn clockwise. Returns the new facing.
    pub fn turn_right(&mut self) -> Facing {
        self.player.facing = self.player.facing.turned_right();
        self.player.facing
    }

    /// Scan the corridor ahead and the lanes beside it.
    ///
    /// The center lane starts one cell ahead and checks up to `max_depth + 1`
    /// cells, stopping at the first wall. The side lanes start right beside the
    /// player and run parallel to the center lane for as far as the center lane
    /// reached, without stopping at walls, so they cover every depth the center
    /// lane shows plus the player's own.
    pub fn scan_corridors(&self, max_depth: usize) -> CorridorScan {
        let (x, y) = (self.player.position.0 as i32, self.player.position.1 as i32);
        let step = self.player.facing.delta();
        let (lx, ly) = self.player.facing.turned_left().delta();
        let (rx, ry) = self.player.facing.turned_right().delta();

        let center = scan::scan_lane(
            &self.maze,
            (x + step.0, y + step.1),
            step,
            max_depth,
            false,
        );
        let side_depth = center.len();
        let left = scan::scan_lane(&self.maze, (x + lx, y + ly), step, side_depth, true);
        let right = scan::scan_lane(&self.maze, (x + rx, y + ry), step, side_depth, true);

        CorridorScan {
            left,
            center,
            right,
        }
    }

    /// Extract the `(2 * radius + 1)` square window around the player, one row per `y`.
    ///
    /// Cells outside the maze read [`Cell::OUT_OF_BOUNDS`] and the player's cell
    /// shows the facing glyph. Every in-bounds cell of the window becomes discovered.
    pub fn get_minimap(&mut self, radius: usize) -> Vec<Vec<char>> {
        let r = radius as i32;
        let (px, py) = (self.player.position.0 as i32, self.player.position.1 as i32);
        let mut rows = Vec::with_capacity(2 * radius + 1);
        for y in py - r..=py + r {
            let mut row = Vec::with_capacity(2 * radius + 1);
            for x in px - r..=px + r {
                let symbol = match self.discovered.to_coord(x, y) {
                    None => Cell::OUT_OF_BOUNDS,
                    Some(coord) => {
                        self.discovered.set(coord, true);
                        self.symbol_at(coord)
                    }
                };
                row.push(symbol);
            }
            rows.push(row);
        }
        rows
    }

    /// The whole maze as the player knows it: undiscovered cells read [`Cell::UNKNOWN`].
    pub fn full_map(&self) -> Vec<Vec<char>> {
        let dim = self.maze.dim();
        (0..dim)
            .map(|y| {
                (0..dim)
                    .map(|x| {
                        if self.discovered[(x, y)] {
                            self.symbol_at((x, y))
                        } else {
                            Cell::UNKNOWN
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn symbol_at(&self, coord: (u16, u16)) -> char {
        if coord == self.player.position {
            self.player.facing.glyph()
        } else {
            self.maze[coord].symbol()
        }
    }
}
