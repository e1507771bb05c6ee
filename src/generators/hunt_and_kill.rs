use rand::Rng;

use crate::{
    error::{MazeError, Result},
    generators::room_neighbors,
    maze::{Cell, Grid, Maze},
};

/// Smallest side length with two distinct rooms for the start and the end.
pub const MIN_DIM: u16 = 5;
/// Largest side length accepted from settings and the size prompt.
pub const MAX_MAZE_DIM: u16 = 255;

/// Carves a perfect maze of side `dim` with the Hunt-and-Kill algorithm.
///
/// Rooms live on odd coordinates and are joined by knocking out the wall cell
/// between two rooms. A random walk carves into unvisited rooms until it dead
/// ends, then the grid is scanned row by row for the first unvisited room next
/// to a visited one, which is joined to the maze and the walk resumes from it.
///
/// The starting room becomes [`Cell::Start`] and the room at
/// `(dim - 2, dim - 2)` becomes [`Cell::End`].
///
/// # Errors
/// * [`MazeError::EvenDimension`] if `dim` is even
/// * [`MazeError::TooSmall`] if `dim` is below [`MIN_DIM`]
pub fn hunt_and_kill<R: Rng + ?Sized>(dim: u16, rng: &mut R) -> Result<Maze> {
    if dim % 2 == 0 {
        return Err(MazeError::EvenDimension(dim));
    }
    if dim < MIN_DIM {
        return Err(MazeError::TooSmall { dim, min: MIN_DIM });
    }

    let mut grid = Grid::new(dim, Cell::Wall);
    let end = (dim - 2, dim - 2);

    // The end room is the last room in row-major order, so drawing an index
    // below the room count minus one never picks it
    let rooms_per_side = (dim as u32 - 1) / 2;
    let idx = rng.random_range(0..rooms_per_side * rooms_per_side - 1);
    let start = (
        (2 * (idx % rooms_per_side) + 1) as u16,
        (2 * (idx / rooms_per_side) + 1) as u16,
    );
    grid.set(start, Cell::Open);

    let mut current = Some(start);
    let mut hunts = 0usize;
    while let Some(room) = current {
        let unvisited = room_neighbors(room, &grid)
            .filter(|&(neighbor, _)| grid[neighbor] == Cell::Wall)
            .collect::<Vec<_>>();

        current = if unvisited.is_empty() {
            hunts += 1;
            hunt(&mut grid, rng)
        } else {
            let (next, wall) = unvisited[rng.random_range(0..unvisited.len())];
            grid.set(wall, Cell::Open);
            grid.set(next, Cell::Open);
            Some(next)
        };
    }

    grid.set(start, Cell::Start);
    grid.set(end, Cell::End);
    tracing::debug!(
        "[generator] carved {}x{} maze from {:?} after {} hunts",
        dim,
        dim,
        start,
        hunts
    );

    Ok(Maze::new(grid, start, end))
}

/// Finds the first unvisited room (row-major) bordering a visited room,
/// joins it to a random visited neighbor and returns it.
/// Returns `None` once every room has been visited.
fn hunt<R: Rng + ?Sized>(grid: &mut Grid<Cell>, rng: &mut R) -> Option<(u16, u16)> {
    let (room, visited) = {
        let grid: &Grid<Cell> = grid;
        let dim = grid.dim();
        (1..dim)
            .step_by(2)
            .flat_map(|y| (1..dim).step_by(2).map(move |x| (x, y)))
            .filter(|&room| grid[room] == Cell::Wall)
            .find_map(|room| {
                let visited = room_neighbors(room, grid)
                    .filter(|&(neighbor, _)| !grid[neighbor].is_wall())
                    .collect::<Vec<_>>();
                (!visited.is_empty()).then_some((room, visited))
            })?
    };

    let (_, wall) = visited[rng.random_range(0..visited.len())];
    grid.set(wall, Cell::Open);
    grid.set(room, Cell::Open);
    Some(room)
}
