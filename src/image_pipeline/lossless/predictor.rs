//! Fixed causal predictor over one merged row.

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::lossless::sink::ResidualSink;

/// Computes the residuals of `current` and hands them to `sink`.
///
/// Even and odd positions are predicted separately. The first pair is
/// predicted from the first pair of `previous`; every later pair from the pair
/// to its left. Even residuals go to route 0, odd ones to route `table1`.
pub fn walk_row<S: ResidualSink>(
    previous: &[u16],
    current: &[u16],
    sink: &mut S,
    table1: usize,
) -> Result<()> {
    let mut pred_even = previous[0] as i32;
    let mut pred_odd = previous[1] as i32;

    for pair in current.chunks_exact(2) {
        let even = pair[0] as i32;
        let odd = pair[1] as i32;

        sink.visit(even - pred_even, 0)?;
        sink.visit(odd - pred_odd, table1)?;

        pred_even = even;
        pred_odd = odd;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every residual with its route.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) residuals: Vec<(i32, usize)>,
    }

    impl ResidualSink for Recorder {
        fn visit(&mut self, residual: i32, route: usize) -> Result<()> {
            self.residuals.push((residual, route));
            Ok(())
        }
    }

    #[test]
    fn test_first_pair_predicted_from_previous_row() {
        let previous = [100, 200, 0, 0];
        let current = [110, 190, 110, 190];
        let mut recorder = Recorder::default();
        walk_row(&previous, &current, &mut recorder, 1).unwrap();
        assert_eq!(recorder.residuals, vec![(10, 0), (-10, 1), (0, 0), (0, 1)]);
    }

    #[test]
    fn test_later_pairs_predicted_from_left_neighbour() {
        let previous = [0, 0, 7, 7, 7, 7];
        let current = [5, 6, 8, 4, 8, 9];
        let mut recorder = Recorder::default();
        walk_row(&previous, &current, &mut recorder, 1).unwrap();
        let residuals: Vec<i32> = recorder.residuals.iter().map(|&(r, _)| r).collect();
        assert_eq!(residuals, vec![5, 6, 3, -2, 0, 5]);
    }

    #[test]
    fn test_single_table_routes_everything_to_zero() {
        let previous = [0, 0, 0, 0];
        let current = [1, 2, 3, 4];
        let mut recorder = Recorder::default();
        walk_row(&previous, &current, &mut recorder, 0).unwrap();
        assert!(recorder.residuals.iter().all(|&(_, route)| route == 0));
        assert_eq!(recorder.residuals.len(), 4);
    }

    #[test]
    fn test_extreme_residuals() {
        let previous = [0, u16::MAX];
        let current = [u16::MAX, 0];
        let mut recorder = Recorder::default();
        walk_row(&previous, &current, &mut recorder, 1).unwrap();
        assert_eq!(recorder.residuals, vec![(65535, 0), (-65535, 1)]);
    }
}
