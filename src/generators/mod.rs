use rand::{SeedableRng, rngs::StdRng};

mod hunt_and_kill;

pub use hunt_and_kill::{MAX_MAZE_DIM, MIN_DIM, hunt_and_kill};

use crate::{
    error::Result,
    maze::{Cell, Facing, Grid, Maze},
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Generate a perfect maze of side `dim`, seeded when `seed` is given.
pub fn generate_maze(dim: u16, seed: Option<u64>) -> Result<Maze> {
    let mut rng = get_rng(seed);
    hunt_and_kill(dim, &mut rng)
}

/// Get the rooms two cells away from `room` in each compass direction.
/// Rooms sit on odd coordinates; the outer ring of the grid is never a room,
/// so neighbors landing on it or beyond are skipped.
/// Yields `(neighbor, wall)` where `wall` is the cell between the two rooms.
fn room_neighbors(
    room: (u16, u16),
    grid: &Grid<Cell>,
) -> impl Iterator<Item = ((u16, u16), (u16, u16))> + '_ {
    let (x, y) = (room.0 as i32, room.1 as i32);
    let last = grid.dim() as i32 - 1;
    Facing::ALL.into_iter().filter_map(move |facing| {
        let (dx, dy) = facing.delta();
        let (nx, ny) = (x + 2 * dx, y + 2 * dy);
        if nx <= 0 || ny <= 0 || nx >= last || ny >= last {
            return None;
        }
        Some(((nx as u16, ny as u16), ((x + dx) as u16, (y + dy) as u16)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_neighbors() {
        let grid = Grid::new(7, Cell::Wall);
        let neighbors = room_neighbors((3, 3), &grid).collect::<Vec<_>>();
        assert_eq!(
            neighbors,
            vec![
                ((3, 1), (3, 2)),
                ((5, 3), (4, 3)),
                ((3, 5), (3, 4)),
                ((1, 3), (2, 3)),
            ]
        );
    }

    #[test]
    fn test_corner_room_has_two_neighbors() {
        let grid = Grid::new(7, Cell::Wall);
        let neighbors = room_neighbors((1, 1), &grid)
            .map(|(n, _)| n)
            .collect::<Vec<_>>();
        assert_eq!(neighbors, vec![(3, 1), (1, 3)]);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate_maze(21, Some(42)).unwrap();
        let b = generate_maze(21, Some(42)).unwrap();
        assert_eq!(a, b);
    }
}
