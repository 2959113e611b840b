use crate::field::{Age, Field, AGE_THRESHOLD, CAP};
use clap::ValueEnum;
use rand::Rng;

pub(crate) const DEFAULT_SPREAD_CHANCE: f64 = 0.4;

const SQUARE: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const DIAMOND: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const UPWARD: [(i32, i32); 1] = [(0, -1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyKind {
    /// Trails never spread
    None,
    /// Spread to all eight surrounding cells
    Square,
    /// Spread north, south, east and west
    Diamond,
    /// Spread to surrounding cells by chance, including fading ones
    Random,
    /// Spread to the cell directly above
    Upward,
}

/// Which neighbors of a freshly activated cell get activated on a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Policy {
    None,
    Square,
    Diamond,
    Random { chance: f64 },
    Upward,
}

impl Policy {
    pub(crate) fn from_kind(kind: PolicyKind, chance: f64) -> Self {
        match kind {
            PolicyKind::None => Policy::None,
            PolicyKind::Square => Policy::Square,
            PolicyKind::Diamond => Policy::Diamond,
            PolicyKind::Random if chance.is_nan() => Policy::Random {
                chance: DEFAULT_SPREAD_CHANCE,
            },
            PolicyKind::Random => Policy::Random {
                chance: chance.clamp(0.0, 1.0),
            },
            PolicyKind::Upward => Policy::Upward,
        }
    }

    pub(crate) fn offsets(&self) -> &'static [(i32, i32)] {
        match self {
            Policy::None => &[],
            Policy::Square | Policy::Random { .. } => &SQUARE,
            Policy::Diamond => &DIAMOND,
            Policy::Upward => &UPWARD,
        }
    }

    fn accepts<R: Rng + ?Sized>(&self, age: Age, rng: &mut R) -> bool {
        match *self {
            Policy::None => false,
            Policy::Square | Policy::Diamond => age >= CAP,
            // a live point above is renewed, not skipped
            Policy::Upward => true,
            // only roll for neighbors inside the band
            Policy::Random { chance } => age > CAP - AGE_THRESHOLD && rng.gen_bool(chance),
        }
    }

    /// Activate qualifying neighbors of every age-1 cell.
    ///
    /// The age-1 set is captured before any write, so a cell activated here
    /// waits until the next tick to spread.
    /// Returns how many cells were activated.
    pub(crate) fn propagate<R: Rng + ?Sized>(&self, field: &mut dyn Field, rng: &mut R) -> usize {
        let offsets = self.offsets();
        if offsets.is_empty() {
            return 0;
        }

        let mut spread = 0;
        for (x, y) in field.fresh() {
            for &(dx, dy) in offsets {
                let (nx, ny) = (x + dx, y + dy);
                let Some(age) = field.get(nx, ny) else {
                    continue;
                };
                if self.accepts(age, rng) {
                    field.activate(nx, ny);
                    spread += 1;
                }
            }
        }
        spread
    }
}
