use std::fmt;

/// One of the four compass directions the player can face.
///
/// Directions are listed clockwise. `y` grows downward (it is the row index),
/// so North is the direction of decreasing `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// All facings in clockwise order, starting from North.
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Unit step `(dx, dy)` taken when moving one cell in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Facing::North => 0,
            Facing::East => 1,
            Facing::South => 2,
            Facing::West => 3,
        }
    }

    /// The facing after a quarter turn counter-clockwise.
    pub fn turned_left(self) -> Facing {
        Facing::ALL[(self.index() + Facing::ALL.len() - 1) % Facing::ALL.len()]
    }

    /// The facing after a quarter turn clockwise.
    pub fn turned_right(self) -> Facing {
        Facing::ALL[(self.index() + 1) % Facing::ALL.len()]
    }

    /// Glyph drawn for the player on the minimap and full map.
    pub const fn glyph(self) -> char {
        match self {
            Facing::North => '↑',
            Facing::East => '→',
            Facing::South => '↓',
            Facing::West => '←',
        }
    }

    /// Single letter shown on the compass.
    pub const fn letter(self) -> char {
        match self {
            Facing::North => 'N',
            Facing::East => 'E',
            Facing::South => 'S',
            Facing::West => 'W',
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::North => write!(f, "North"),
            Facing::East => write!(f, "East"),
            Facing::South => write!(f, "South"),
            Facing::West => write!(f, "West"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_turns_return_to_start() {
        for facing in Facing::ALL {
            let left = (0..4).fold(facing, |f, _| f.turned_left());
            let right = (0..4).fold(facing, |f, _| f.turned_right());
            assert_eq!(left, facing);
            assert_eq!(right, facing);
        }
    }

    #[test]
    fn test_left_then_right_is_identity() {
        for facing in Facing::ALL {
            assert_eq!(facing.turned_left().turned_right(), facing);
            assert_eq!(facing.turned_right().turned_left(), facing);
        }
    }

    #[test]
    fn test_turn_wraparound() {
        assert_eq!(Facing::North.turned_left(), Facing::West);
        assert_eq!(Facing::West.turned_right(), Facing::North);
        assert_eq!(Facing::South.turned_right(), Facing::West);
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        for facing in Facing::ALL {
            let (dx, dy) = facing.delta();
            let (ox, oy) = facing.turned_right().turned_right().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        // Up on screen is the smaller row index
        assert_eq!(Facing::North.delta(), (0, -1));
    }
}
