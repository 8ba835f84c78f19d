pub(crate) mod types;
pub use types::*;

use crate::matrix::IntersectionMatrix;

/// Reconstructs the full symmetric diagram from one pie slice.
///
/// The curves start in identity order (curve `k` on level `k` at angle zero)
/// and the slice is walked `n` times. A 1 in row `r` swaps the curves on
/// levels `r` and `r + 1`, which is where those two curves cross. Rotating the
/// picture by `2π/n` keeps every level, so the replicas reuse the same rows
/// and only the curves holding them change.
pub fn compute_layout(matrix: &IntersectionMatrix) -> Layout {
    let n = matrix.curves();
    let slice_rows = matrix.to_sequence();
    let slice_columns = slice_rows.len();
    let total = n * slice_columns;
    let gap = std::f32::consts::TAU / total.max(1) as f32;

    let mut order: Vec<usize> = (0..n).collect();
    let mut levels = Vec::with_capacity(total + 1);
    let mut crossings = Vec::with_capacity(total);
    let mut rings: Vec<Ring> = (0..n.saturating_sub(1))
        .map(|index| Ring {
            index,
            crossings: Vec::new(),
        })
        .collect();
    let mut traces: Vec<CurveTrace> = (0..n)
        .map(|curve| CurveTrace {
            curve,
            start_level: curve,
            events: Vec::new(),
        })
        .collect();

    for slice in 0..n {
        for (slice_column, &ring) in slice_rows.iter().enumerate() {
            let column = slice * slice_columns + slice_column;
            levels.push(order.clone());
            let lower = order[ring];
            let upper = order[ring + 1];
            order.swap(ring, ring + 1);

            traces[lower].events.push(CurveEvent {
                crossing: column,
                partner: upper,
                ring,
                direction: Direction::Outward,
            });
            traces[upper].events.push(CurveEvent {
                crossing: column,
                partner: lower,
                ring,
                direction: Direction::Inward,
            });
            rings[ring].crossings.push(column);
            crossings.push(Crossing {
                column,
                slice,
                slice_column,
                ring,
                angle: (column as f32 + 0.5) * gap,
                lower,
                upper,
            });
        }
    }
    levels.push(order);

    let layout = Layout {
        curves: n,
        slice_columns,
        crossings,
        rings,
        traces,
        levels,
    };
    if !layout.closes() {
        tracing::debug!(
            curves = n,
            "level order does not return to the identity, curves will not close"
        );
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::CrossingSequence;
    use std::f32::consts::TAU;

    fn layout_of(rows: &[usize], n: usize) -> Layout {
        let sequence = CrossingSequence::new(rows.to_vec(), n, 1).unwrap();
        compute_layout(&IntersectionMatrix::build(&sequence))
    }

    #[test]
    fn three_circles_cross_pairwise_twice() {
        let layout = layout_of(&[0, 1], 3);
        assert_eq!(layout.total_columns(), 6);
        assert_eq!(layout.traces.len(), 3);
        assert!(layout.closes());
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert_eq!(layout.crossings_between(a, b), 2, "curves {a} and {b}");
        }
        assert_eq!(layout.rings[0].crossings, vec![0, 2, 4]);
        assert_eq!(layout.rings[1].crossings, vec![1, 3, 5]);
    }

    #[test]
    fn three_circles_trace() {
        let layout = layout_of(&[0, 1], 3);
        let first = &layout.crossings[0];
        assert_eq!((first.lower, first.upper), (0, 1));
        let second = &layout.crossings[1];
        assert_eq!((second.lower, second.upper), (0, 2));
        assert_eq!(layout.levels[2], vec![1, 2, 0]);

        let outer = &layout.traces[0];
        assert_eq!(outer.events.len(), 4);
        assert_eq!(outer.events[0].direction, Direction::Outward);
        assert_eq!(outer.events[1].partner, 2);
    }

    #[test]
    fn replicas_are_rotations_of_the_slice() {
        let layout = layout_of(&[0, 1, 2, 1, 2, 3], 5);
        let slice = TAU / 5.0;
        for crossing in &layout.crossings[6..] {
            let base = &layout.crossings[crossing.slice_column];
            assert_eq!(crossing.ring, base.ring);
            let expected = base.angle + crossing.slice as f32 * slice;
            assert!((crossing.angle - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn every_curve_takes_part_in_its_share_of_crossings() {
        let layout = layout_of(&[0, 1, 2, 1, 2, 3], 5);
        assert!(layout.closes());
        let events: usize = layout.traces.iter().map(|trace| trace.events.len()).sum();
        assert_eq!(events, 2 * layout.total_columns());
        for trace in &layout.traces {
            let mut level = trace.start_level;
            for event in &trace.events {
                level = match event.direction {
                    Direction::Outward => event.ring + 1,
                    Direction::Inward => event.ring,
                };
            }
            assert_eq!(level, trace.start_level);
        }
    }
}
