use serde::{Deserialize, Serialize};

/// N-dimensional grid storage with flat backing array and stride-based indexing.
///
/// Stores values in row-major order where the last dimension varies fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    #[serde(skip)]
    strides: Vec<usize>,
}

impl<T: Clone> SweepGrid<T> {
    /// Create a new grid with the given shape, filled with `fill`.
    pub fn new(shape: Vec<usize>, fill: T) -> Self {
        let total_size: usize = shape.iter().product();
        let strides = compute_strides(&shape);
        Self {
            data: vec![fill; total_size],
            shape,
            strides,
        }
    }
}

impl<T> SweepGrid<T> {
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert multi-dimensional indices to flat index
    pub fn flat_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let strides = self.strides();
        let mut flat = 0;
        for (i, (&idx, &size)) in indices.iter().zip(&self.shape).enumerate() {
            if idx >= size {
                return None;
            }
            flat += idx * strides[i];
        }
        Some(flat)
    }

    pub fn get(&self, indices: &[usize]) -> Option<&T> {
        self.flat_index(indices).map(|i| &self.data[i])
    }

    /// Set the value at the given indices; false when out of bounds
    pub fn set(&mut self, indices: &[usize], value: T) -> bool {
        if let Some(i) = self.flat_index(indices) {
            self.data[i] = value;
            true
        } else {
            false
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all indices in row-major order
    pub fn indices(&self) -> GridIndices {
        GridIndices {
            shape: self.shape.clone(),
            current: vec![0; self.shape.len()],
            done: self.data.is_empty(),
        }
    }

    /// Iterate over (indices, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (Vec<usize>, &T)> {
        self.indices().zip(self.data.iter())
    }

    /// Values along `dim` with every other coordinate taken from `at`.
    ///
    /// `at[dim]` is ignored. `None` when `dim` or `at` do not fit the grid.
    pub fn lane(&self, dim: usize, at: &[usize]) -> Option<Vec<&T>> {
        if dim >= self.ndim() || at.len() != self.ndim() {
            return None;
        }
        let mut indices = at.to_vec();
        (0..self.shape[dim])
            .map(|i| {
                indices[dim] = i;
                self.get(&indices)
            })
            .collect()
    }

    // strides are not serialized; rebuild them for grids that came from serde
    fn strides(&self) -> std::borrow::Cow<'_, [usize]> {
        if self.strides.len() == self.shape.len() {
            std::borrow::Cow::Borrowed(&self.strides)
        } else {
            std::borrow::Cow::Owned(compute_strides(&self.shape))
        }
    }
}

/// Compute strides for row-major order
fn compute_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return Vec::new();
    }
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Iterator over all indices in a grid
pub struct GridIndices {
    shape: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current.clone();

        // last dimension varies fastest
        for i in (0..self.shape.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.shape[i] {
                break;
            }
            self.current[i] = 0;
            if i == 0 {
                self.done = true;
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut grid = SweepGrid::new(vec![2, 3], 0);
        assert_eq!(grid.flat_index(&[1, 2]), Some(5));
        assert_eq!(grid.flat_index(&[2, 0]), None);
        assert!(grid.set(&[1, 0], 7));
        assert_eq!(grid.data(), &[0, 0, 0, 7, 0, 0]);
    }

    #[test]
    fn test_indices_cover_grid_in_order() {
        let grid = SweepGrid::new(vec![2, 2], ());
        let all: Vec<Vec<usize>> = grid.indices().collect();
        assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert_eq!(SweepGrid::new(vec![0, 4], ()).indices().count(), 0);
    }

    #[test]
    fn test_lane_along_last_axis() {
        let mut grid = SweepGrid::new(vec![2, 3], 0);
        for (n, indices) in grid.indices().collect::<Vec<_>>().into_iter().enumerate() {
            grid.set(&indices, n);
        }
        let lane: Vec<usize> = grid.lane(1, &[1, 0]).unwrap().into_iter().copied().collect();
        assert_eq!(lane, vec![3, 4, 5]);
        assert!(grid.lane(2, &[0, 0]).is_none());
    }

    #[test]
    fn test_deserialized_grid_still_indexes() {
        let mut grid = SweepGrid::new(vec![2, 2], 0);
        grid.set(&[1, 1], 9);
        let json = serde_json::to_string(&grid).unwrap();
        let back: SweepGrid<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&[1, 1]), Some(&9));
    }
}
