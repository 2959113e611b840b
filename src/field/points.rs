use super::{Age, Field, CAP};
use std::collections::BTreeMap;

/// Sparse set of live points. An empty in-bounds position reads as dormant.
///
/// Keyed by `(x, y)` so iteration follows the same column-by-column scan the
/// grid uses, and a position never holds two points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PointSet {
    w: i32,
    h: i32,
    live: BTreeMap<(i32, i32), Age>,
}

impl PointSet {
    pub(crate) fn new(w: i32, h: i32) -> Self {
        Self {
            w: w.max(0),
            h: h.max(0),
            live: BTreeMap::new(),
        }
    }
}

impl Field for PointSet {
    fn width(&self) -> i32 {
        self.w
    }

    fn height(&self) -> i32 {
        self.h
    }

    fn get(&self, x: i32, y: i32) -> Option<Age> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.live.get(&(x, y)).copied().unwrap_or(CAP))
    }

    fn set(&mut self, x: i32, y: i32, age: Age) {
        if self.in_bounds(x, y) {
            self.live.insert((x, y), age.min(CAP));
        }
    }

    fn age_all(&mut self) {
        for age in self.live.values_mut() {
            *age = age.saturating_add(1);
        }
        self.live.retain(|_, age| *age <= CAP);
    }

    fn fresh(&self) -> Vec<(i32, i32)> {
        self.live
            .iter()
            .filter(|&(_, &age)| age == 1)
            .map(|(&pos, _)| pos)
            .collect()
    }

    fn visible(&self) -> Vec<(i32, i32, Age)> {
        self.live
            .iter()
            .filter(|&(_, &age)| age < CAP)
            .map(|(&(x, y), &age)| (x, y, age))
            .collect()
    }

    fn live_count(&self) -> usize {
        self.live.values().filter(|&&age| age < CAP).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_past_cap_is_dropped_on_aging() {
        let mut p = PointSet::new(5, 5);
        p.set(2, 2, CAP);
        p.set(3, 3, CAP - 1);
        assert_eq!(p.live.len(), 2);
        assert_eq!(p.live_count(), 1);

        p.age_all();
        assert_eq!(p.live.len(), 1);
        assert_eq!(p.live_count(), 0);
        assert_eq!(p.get(3, 3), Some(CAP));
        assert_eq!(p.get(2, 2), Some(CAP));

        p.age_all();
        assert!(p.live.is_empty());
    }

    #[test]
    fn activating_occupied_position_resets_instead_of_duplicating() {
        let mut p = PointSet::new(5, 5);
        p.activate(1, 4);
        p.age_all();
        p.age_all();
        p.activate(1, 4);
        assert_eq!(p.live_count(), 1);
        assert_eq!(p.get(1, 4), Some(0));
    }

    #[test]
    fn points_outside_bounds_are_never_created() {
        let mut p = PointSet::new(2, 2);
        p.activate(-1, 0);
        p.activate(0, 2);
        p.activate(2, 1);
        assert_eq!(p.live_count(), 0);
        assert_eq!(p.get(-1, 0), None);
    }

    #[test]
    fn fresh_matches_grid_scan_order() {
        let mut p = PointSet::new(3, 3);
        p.set(2, 0, 1);
        p.set(0, 2, 1);
        p.set(0, 1, 1);
        p.set(1, 1, 4);
        assert_eq!(p.fresh(), vec![(0, 1), (0, 2), (2, 0)]);
        assert_eq!(p.visible().len(), 4);
    }
}
