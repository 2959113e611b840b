use crate::field::Field;
use crate::policy::Policy;
use rand::rngs::StdRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SimCommand {
    Activate { x: i32, y: i32 },
}

/// The field plus the rule that spreads over it. Only the simulation task
/// holds one, so every write to the field goes through here.
pub(crate) struct Simulation {
    field: Box<dyn Field>,
    policy: Policy,
    rng: StdRng,
    ticks: u64,
}

impl Simulation {
    pub(crate) fn new(field: Box<dyn Field>, policy: Policy, rng: StdRng) -> Self {
        Self {
            field,
            policy,
            rng,
            ticks: 0,
        }
    }

    pub(crate) fn apply(&mut self, cmd: SimCommand) {
        match cmd {
            SimCommand::Activate { x, y } => self.field.activate(x, y),
        }
    }

    /// Propagate, then age. Returns the number of cells the policy activated.
    pub(crate) fn tick(&mut self) -> usize {
        let spread = self.policy.propagate(self.field.as_mut(), &mut self.rng);
        self.field.age_all();
        self.ticks += 1;
        spread
    }

    pub(crate) fn field(&self) -> &dyn Field {
        self.field.as_ref()
    }

    pub(crate) fn policy(&self) -> Policy {
        self.policy
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks
    }
}
