//! Crossing sequences and the whitespace-separated stream they are read from.

use crate::error::{Result, VennError};

/// Largest curve count whose region signatures fit in a `u32`.
pub const MAX_CURVES: usize = 31;

/// Number of crossings in one pie slice, `(2^n - 2) / n`.
///
/// Fails for `n < 3`, for curve counts too large to index regions, and for
/// any `n` that does not divide `2^n - 2` (no rotationally symmetric diagram
/// exists there, e.g. `n = 4`).
pub fn slice_length(n: usize) -> Result<usize> {
    if n < 3 {
        return Err(VennError::DegenerateConfiguration {
            n,
            reason: "at least 3 curves are needed for any crossing".to_string(),
        });
    }
    if n > MAX_CURVES {
        return Err(VennError::DegenerateConfiguration {
            n,
            reason: format!("at most {MAX_CURVES} curves are supported"),
        });
    }
    let crossings = (1usize << n) - 2;
    if crossings % n != 0 {
        return Err(VennError::DegenerateConfiguration {
            n,
            reason: format!("{crossings} crossings cannot be split into {n} equal pie slices"),
        });
    }
    Ok(crossings / n)
}

/// One pie slice of a diagram: the row of every crossing, in angular order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingSequence {
    curves: usize,
    rows: Vec<usize>,
}

impl CrossingSequence {
    /// Validates `rows` against `n` curves. `diagram` is the 1-based position
    /// of the sequence in its input and only shows up in errors.
    pub fn new(rows: Vec<usize>, n: usize, diagram: usize) -> Result<Self> {
        let expected = slice_length(n)?;
        if rows.len() != expected {
            return Err(VennError::malformed(
                diagram,
                format!("expected {expected} crossings for {n} curves, got {}", rows.len()),
            ));
        }
        if let Some((column, row)) = rows.iter().enumerate().find(|(_, row)| **row > n - 2) {
            return Err(VennError::malformed(
                diagram,
                format!("row {row} at column {column} is outside 0..={}", n - 2),
            ));
        }
        Ok(Self { curves: n, rows })
    }

    pub fn curves(&self) -> usize {
        self.curves
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads consecutive crossing sequences of `n` curves out of whitespace
/// separated text.
///
/// The first bad token, out-of-range row, or trailing partial sequence is
/// yielded as [`VennError::MalformedSequence`] and ends the iteration.
pub struct SequenceReader<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    curves: usize,
    length: usize,
    diagram: usize,
    done: bool,
}

impl<'a> SequenceReader<'a> {
    pub fn new(input: &'a str, n: usize) -> Result<Self> {
        let length = slice_length(n)?;
        Ok(Self {
            tokens: input.split_whitespace(),
            curves: n,
            length,
            diagram: 0,
            done: false,
        })
    }

    fn read_one(&mut self) -> Option<Result<CrossingSequence>> {
        let first = self.tokens.next()?;
        self.diagram += 1;
        let mut rows = Vec::with_capacity(self.length);
        let mut token = Some(first);
        while rows.len() < self.length {
            let Some(raw) = token.take().or_else(|| self.tokens.next()) else {
                return Some(Err(VennError::malformed(
                    self.diagram,
                    format!(
                        "input ended after {} of {} crossings",
                        rows.len(),
                        self.length
                    ),
                )));
            };
            match raw.parse::<usize>() {
                Ok(row) => rows.push(row),
                Err(_) => {
                    return Some(Err(VennError::malformed(
                        self.diagram,
                        format!("`{raw}` is not a row index"),
                    )));
                }
            }
        }
        Some(CrossingSequence::new(rows, self.curves, self.diagram))
    }
}

impl Iterator for SequenceReader<'_> {
    type Item = Result<CrossingSequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.read_one();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_length_follows_prime_curve_counts() {
        assert_eq!(slice_length(3).unwrap(), 2);
        assert_eq!(slice_length(5).unwrap(), 6);
        assert_eq!(slice_length(7).unwrap(), 18);
        assert_eq!(slice_length(11).unwrap(), 186);
    }

    #[test]
    fn slice_length_rejects_degenerate_counts() {
        for n in [0, 1, 2, 4, 6, 32] {
            assert!(
                matches!(slice_length(n), Err(VennError::DegenerateConfiguration { .. })),
                "n = {n}"
            );
        }
    }

    #[test]
    fn rejects_rows_out_of_range() {
        let err = CrossingSequence::new(vec![0, 2], 3, 1).unwrap_err();
        assert!(matches!(err, VennError::MalformedSequence { diagram: 1, .. }));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = CrossingSequence::new(vec![0, 1, 2, 1, 2], 5, 4).unwrap_err();
        assert!(matches!(err, VennError::MalformedSequence { diagram: 4, .. }));
    }

    #[test]
    fn reader_splits_stream_by_slice_length() {
        let input = "0 1\n1 0\n\n0\n1\n";
        let sequences: Vec<_> = SequenceReader::new(input, 3)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(sequences.len(), 3);
        assert_eq!(sequences[1].rows(), &[1, 0]);
        assert_eq!(sequences[2].rows(), &[0, 1]);
    }

    #[test]
    fn reader_stops_at_first_bad_record() {
        let input = "0 1 0 x 1 0";
        let items: Vec<_> = SequenceReader::new(input, 3).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(VennError::MalformedSequence { diagram: 2, .. })
        ));
    }

    #[test]
    fn reader_reports_trailing_partial_sequence() {
        let items: Vec<_> = SequenceReader::new("0 1 2 1 2 3 0 1", 5).unwrap().collect();
        assert_eq!(items.len(), 2);
        let Err(VennError::MalformedSequence { diagram, reason }) = &items[1] else {
            panic!("expected a malformed sequence, got {:?}", items[1]);
        };
        assert_eq!(*diagram, 2);
        assert!(reason.contains("2 of 6"));
    }
}
