use crate::sequence::CrossingSequence;

/// Binary `(n - 1) x L` matrix of one pie slice: a 1 at `[row][column]` marks
/// the crossing of the curves on levels `row` and `row + 1` at that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionMatrix {
    curves: usize,
    cells: Vec<Vec<u8>>,
}

impl IntersectionMatrix {
    pub fn build(sequence: &CrossingSequence) -> Self {
        let curves = sequence.curves();
        let mut cells = vec![vec![0u8; sequence.len()]; curves - 1];
        for (column, &row) in sequence.rows().iter().enumerate() {
            cells[row][column] = 1;
        }
        Self { curves, cells }
    }

    pub fn curves(&self) -> usize {
        self.curves
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.cells[row][column]
    }

    /// Row holding the 1 of `column`, if there is one.
    pub fn row_of(&self, column: usize) -> Option<usize> {
        (0..self.rows()).find(|&row| self.cells[row][column] == 1)
    }

    /// Inverse of [`IntersectionMatrix::build`]: the row index of every column.
    /// `build` puts exactly one 1 in each column, so no column is skipped.
    pub fn to_sequence(&self) -> Vec<usize> {
        (0..self.columns())
            .filter_map(|column| self.row_of(column))
            .collect()
    }

    pub fn row_sums(&self) -> Vec<usize> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&cell| cell as usize).sum())
            .collect()
    }

    pub fn column_sums(&self) -> Vec<usize> {
        (0..self.columns())
            .map(|column| self.cells.iter().map(|row| row[column] as usize).sum())
            .collect()
    }
}
