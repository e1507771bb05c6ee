use crate::maze::{Cell, Maze};

/// What a lane saw at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sight {
    /// A wall, or the edge of the maze.
    Blocked,
    Open,
    /// The end of the maze.
    Goal,
}

impl Sight {
    pub const fn code(self) -> char {
        match self {
            Sight::Blocked => '0',
            Sight::Open => '1',
            Sight::Goal => '2',
        }
    }

    pub fn from_code(code: char) -> Option<Sight> {
        match code {
            '0' => Some(Sight::Blocked),
            '1' => Some(Sight::Open),
            '2' => Some(Sight::Goal),
            _ => None,
        }
    }

    fn of(cell: Option<Cell>) -> Sight {
        match cell {
            None | Some(Cell::Wall) => Sight::Blocked,
            Some(Cell::End) => Sight::Goal,
            Some(Cell::Open | Cell::Start) => Sight::Open,
        }
    }
}

/// Line-of-sight along the three lanes of the first-person view.
///
/// Each lane is a string of [`Sight`] codes ordered farthest first: the last
/// character is the step nearest to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorridorScan {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl CorridorScan {
    /// How many cells the center lane reaches, including the cell that stopped it.
    pub fn depth(&self) -> usize {
        self.center.len()
    }

    /// Distance in cells from the player to the end, if it is straight ahead.
    pub fn goal_distance(&self) -> Option<usize> {
        let nearest_first = Self::nearest_first(&self.center);
        nearest_first
            .iter()
            .position(|&sight| sight == Sight::Goal)
            .map(|i| i + 1)
    }

    /// Decodes a lane into sights ordered nearest first.
    pub fn nearest_first(lane: &str) -> Vec<Sight> {
        lane.chars().rev().filter_map(Sight::from_code).collect()
    }
}

/// Walks from `origin` along `step`, probing at most `max_depth + 1` cells.
/// The walk stops after recording the first blocked cell unless `ignore_stop` is set.
pub(super) fn scan_lane(
    maze: &Maze,
    origin: (i32, i32),
    step: (i32, i32),
    max_depth: usize,
    ignore_stop: bool,
) -> String {
    let mut sights = Vec::with_capacity(max_depth + 1);
    let (mut x, mut y) = origin;
    for _ in 0..=max_depth {
        let sight = Sight::of(maze.cell(x, y));
        sights.push(sight.code());
        if sight == Sight::Blocked && !ignore_stop {
            break;
        }
        x += step.0;
        y += step.1;
    }
    sights.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_stops_at_wall() {
        let maze = Maze::from_rows(&["#####", "#S  #", "### #", "#E  #", "#####"]);
        // From (1,1) looking east: (2,1) open, (3,1) open, (4,1) wall
        let lane = scan_lane(&maze, (2, 1), (1, 0), 10, false);
        assert_eq!(lane, "011");
    }

    #[test]
    fn test_scan_ignoring_stops_runs_full_length() {
        let maze = Maze::from_rows(&["#####", "#S  #", "### #", "#E  #", "#####"]);
        let lane = scan_lane(&maze, (0, 1), (1, 0), 5, true);
        // (0..=5, 1): wall, start, open, open, wall, out of bounds
        assert_eq!(lane, "001110");
    }

    #[test]
    fn test_goal_distance() {
        let scan = CorridorScan {
            left: "000".to_string(),
            center: "021".to_string(),
            right: "000".to_string(),
        };
        assert_eq!(scan.depth(), 3);
        assert_eq!(scan.goal_distance(), Some(2));
        assert_eq!(
            CorridorScan::nearest_first(&scan.center),
            vec![Sight::Open, Sight::Goal, Sight::Blocked]
        );
    }
}
