use super::{Age, Field, CAP};

/// Dense grid of cell ages, row-major like the frame buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    w: i32,
    h: i32,
    ages: Vec<Age>,
}

impl Grid {
    pub(crate) fn new(w: i32, h: i32) -> Self {
        let (w, h) = (w.max(0), h.max(0));
        Self {
            w,
            h,
            ages: vec![CAP; (w as usize) * (h as usize)],
        }
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
}

impl Field for Grid {
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
        Some(self.ages[self.idx(x, y)])
    }

    fn set(&mut self, x: i32, y: i32, age: Age) {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.ages[i] = age.min(CAP);
        }
    }

    fn age_all(&mut self) {
        for age in &mut self.ages {
            if *age < CAP {
                *age += 1;
            }
        }
    }

    fn fresh(&self) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for x in 0..self.w {
            for y in 0..self.h {
                if self.ages[self.idx(x, y)] == 1 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn visible(&self) -> Vec<(i32, i32, Age)> {
        let mut out = Vec::new();
        for y in 0..self.h {
            for x in 0..self.w {
                let age = self.ages[self.idx(x, y)];
                if age < CAP {
                    out.push((x, y, age));
                }
            }
        }
        out
    }

    fn live_count(&self) -> usize {
        self.ages.iter().filter(|&&a| a < CAP).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn activate_then_age_once() {
        let mut g = Grid::new(4, 4);
        g.activate(1, 1);
        assert_eq!(g.get(1, 1), Some(0));

        g.age_all();
        for x in 0..4 {
            for y in 0..4 {
                let want = if (x, y) == (1, 1) { 1 } else { CAP };
                assert_eq!(g.get(x, y), Some(want), "cell ({x},{y})");
            }
        }
    }

    #[test]
    fn out_of_range_reads_absent_and_writes_are_dropped() {
        let mut g = Grid::new(3, 2);
        let before = g.clone();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MIN, i32::MAX)] {
            assert_eq!(g.get(x, y), None);
            g.set(x, y, 0);
            g.activate(x, y);
        }
        assert_eq!(g, before);
    }

    #[test]
    fn set_clamps_to_cap() {
        let mut g = Grid::new(2, 2);
        g.set(0, 0, 200);
        assert_eq!(g.get(0, 0), Some(CAP));
    }

    #[test]
    fn ages_climb_by_one_and_stop_at_cap() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Grid::new(6, 5);
        let mut last = g.clone();

        for _ in 0..60 {
            if rng.gen_bool(0.3) {
                g.activate(rng.gen_range(0..6), rng.gen_range(0..5));
                last = g.clone();
            }
            g.age_all();
            for x in 0..6 {
                for y in 0..5 {
                    let (a, b) = (last.get(x, y).unwrap(), g.get(x, y).unwrap());
                    assert!(b <= CAP);
                    if a == CAP {
                        assert_eq!(b, CAP);
                    } else {
                        assert_eq!(b, a + 1);
                    }
                }
            }
            last = g.clone();
        }
    }

    #[test]
    fn fresh_scans_column_major() {
        let mut g = Grid::new(3, 3);
        g.set(2, 0, 1);
        g.set(0, 2, 1);
        g.set(0, 1, 1);
        g.set(1, 1, 4);
        assert_eq!(g.fresh(), vec![(0, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn visible_skips_dormant_cells() {
        let mut g = Grid::new(3, 1);
        g.set(0, 0, 0);
        g.set(2, 0, CAP - 1);
        assert_eq!(g.visible(), vec![(0, 0, 0), (2, 0, CAP - 1)]);
        assert_eq!(g.live_count(), 2);
    }

    #[test]
    fn zero_sized_grid_is_empty() {
        let mut g = Grid::new(0, -3);
        g.age_all();
        assert_eq!(g.get(0, 0), None);
        assert!(g.fresh().is_empty());
    }
}
