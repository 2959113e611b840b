mod grid;
mod points;

pub(crate) use grid::Grid;
pub(crate) use points::PointSet;

use clap::ValueEnum;

pub(crate) type Age = u8;

/// Oldest age that is still drawn.
pub(crate) const MAX_AGE: Age = 20;
/// Age of a dormant cell. Aging stops here until the cell is activated again.
pub(crate) const CAP: Age = MAX_AGE + 1;
/// Width of the near-dormant band used by the random spread rule.
pub(crate) const AGE_THRESHOLD: Age = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FieldKind {
    /// Fixed grid of ages
    Grid,
    /// Sparse set of live points
    Points,
}

/// Shared spatial state the simulation ages and spreads over.
///
/// Coordinates are signed so neighbor offsets can step off the edge; every
/// lookup outside `[0, width) x [0, height)` reads as `None` and every write
/// there is dropped.
pub(crate) trait Field: Send {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn get(&self, x: i32, y: i32) -> Option<Age>;
    fn set(&mut self, x: i32, y: i32, age: Age);

    /// Advance every non-dormant cell by one tick.
    fn age_all(&mut self);

    /// Cells with age 1, in scan order (column by column, top to bottom).
    fn fresh(&self) -> Vec<(i32, i32)>;

    /// Every cell with age below `CAP`.
    fn visible(&self) -> Vec<(i32, i32, Age)>;

    fn live_count(&self) -> usize;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn activate(&mut self, x: i32, y: i32) {
        self.set(x, y, 0);
    }
}

pub(crate) fn new_field(kind: FieldKind, width: i32, height: i32) -> Box<dyn Field> {
    match kind {
        FieldKind::Grid => Box::new(Grid::new(width, height)),
        FieldKind::Points => Box::new(PointSet::new(width, height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_picks_representation_with_same_bounds() {
        for kind in [FieldKind::Grid, FieldKind::Points] {
            let f = new_field(kind, 7, 3);
            assert_eq!((f.width(), f.height()), (7, 3));
            assert_eq!(f.get(6, 2), Some(CAP));
            assert_eq!(f.get(7, 2), None);
            assert_eq!(f.live_count(), 0);
        }
    }

    #[test]
    fn activate_resets_to_zero_on_both_representations() {
        for kind in [FieldKind::Grid, FieldKind::Points] {
            let mut f = new_field(kind, 4, 4);
            f.activate(2, 3);
            assert_eq!(f.get(2, 3), Some(0));
            f.age_all();
            f.age_all();
            f.activate(2, 3);
            assert_eq!(f.get(2, 3), Some(0));
            assert_eq!(f.live_count(), 1);
        }
    }

    #[test]
    fn live_count_agrees_across_representations() {
        let mut fields = [new_field(FieldKind::Grid, 5, 5), new_field(FieldKind::Points, 5, 5)];
        for f in fields.iter_mut() {
            f.set(1, 1, CAP);
            f.set(2, 2, CAP - 1);
            f.activate(3, 3);
        }
        loop {
            let counts: Vec<usize> = fields.iter().map(|f| f.live_count()).collect();
            assert_eq!(counts[0], counts[1]);
            assert_eq!(counts[0], fields[0].visible().len());
            if counts[0] == 0 {
                break;
            }
            for f in fields.iter_mut() {
                f.age_all();
            }
        }
    }
}
