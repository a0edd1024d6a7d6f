use std::ops::{Index, IndexMut};

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Row-major grid addressed by `(row, column)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vec2D<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T> Vec2D<T> {
    pub fn new(rows: usize, columns: usize) -> Self
    where
        T: Default + Clone,
    {
        Self {
            rows,
            columns,
            data: vec![T::default(); rows * columns],
        }
    }

    /// `(rows, columns)`
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if !self.contains(row, column) {
            return None;
        }
        self.data.get(row * self.columns + column)
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut T> {
        if !self.contains(row, column) {
            return None;
        }
        self.data.get_mut(row * self.columns + column)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Iterates `((row, column), &cell)` in row-major order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let columns = self.columns;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / columns, i % columns), cell))
    }

    /// In-bounds positions among the 8 cells surrounding `(row, column)`.
    ///
    /// Positions off the edge of the grid are skipped, never wrapped.
    pub fn neighbors(&self, row: usize, column: usize) -> impl Iterator<Item = (usize, usize)> + use<T> {
        let (rows, columns) = self.dims();
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = column.checked_add_signed(dc)?;
            (r < rows && c < columns).then_some((r, c))
        })
    }
}

impl<T> Index<(usize, usize)> for Vec2D<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, column) = index;
        &self.data[row * self.columns + column]
    }
}

impl<T> IndexMut<(usize, usize)> for Vec2D<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, column) = index;
        &mut self.data[row * self.columns + column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_clipped_at_edges() {
        let grid: Vec2D<u8> = Vec2D::new(3, 4);

        assert_eq!(grid.neighbors(0, 0).count(), 3);
        assert_eq!(grid.neighbors(0, 1).count(), 5);
        assert_eq!(grid.neighbors(1, 1).count(), 8);
        assert_eq!(grid.neighbors(2, 3).count(), 3);

        let mut corner: Vec<_> = grid.neighbors(2, 3).collect();
        corner.sort();
        assert_eq!(corner, vec![(1, 2), (1, 3), (2, 2)]);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let mut grid: Vec2D<u8> = Vec2D::new(2, 5);
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 5).is_none());
        assert!(grid.get_mut(1, 4).is_some());
        grid[(1, 4)] = 7;
        assert_eq!(grid.get(1, 4), Some(&7));
        assert_eq!(grid.indexed_iter().last(), Some(((1, 4), &7)));
    }
}
