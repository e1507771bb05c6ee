/// Square matrix stored as one contiguous slice, indexed by `(x, y)` where
/// `y` is the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    data: Box<[T]>,
    dim: u16,
}

impl<T: Copy> Grid<T> {
    pub fn new(dim: u16, cell: T) -> Self {
        let data = vec![cell; dim as usize * dim as usize].into_boxed_slice();
        Grid { data, dim }
    }

    /// Returns the cell at a signed coordinate, or `None` if it lies outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.to_coord(x, y).map(|coord| self[coord])
    }

    pub fn set(&mut self, coord: (u16, u16), cell: T) {
        let idx = self.ravel_index(coord.0, coord.1);
        self.data[idx] = cell;
    }
}

impl<T> Grid<T> {
    /// Side length of the grid.
    pub fn dim(&self) -> u16 {
        self.dim
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.to_coord(x, y).is_some()
    }

    /// Converts a signed coordinate into an in-bounds grid coordinate.
    pub fn to_coord(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let dim = self.dim as i32;
        ((0..dim).contains(&x) && (0..dim).contains(&y)).then_some((x as u16, y as u16))
    }

    /// Iterates over all cells in row-major order, yielding `((x, y), &cell)`.
    pub fn cells(&self) -> impl Iterator<Item = ((u16, u16), &T)> {
        let dim = self.dim as usize;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (((i % dim) as u16, (i / dim) as u16), cell))
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since dim is u16 (assuming usize is at least 32 bits)
        y as usize * self.dim as usize + x as usize
    }
}

impl<T> std::ops::Index<(u16, u16)> for Grid<T> {
    type Output = T;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

impl<T> std::ops::IndexMut<(u16, u16)> for Grid<T> {
    fn index_mut(&mut self, index: (u16, u16)) -> &mut Self::Output {
        let idx = self.ravel_index(index.0, index.1);
        &mut self.data[idx]
    }
}
