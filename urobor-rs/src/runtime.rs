//! Depth-first execution of a [`TestTree`].
//!
//! Each node runs its commands against its own context, then runs every
//! child on a copy of that context.  A failing command or child marks the
//! node failed; nothing short-circuits, so the whole tree is always visited.

use tracing::{debug, warn};

use crate::command::{Env, Printed};
use crate::context::Context;
use crate::interpolation::Interpolator;
use crate::test_case::{Status, TestCaseId, TestTree};

pub struct Runner {
    engine: Interpolator,
    output: Vec<Printed>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(Interpolator::default())
    }
}

impl Runner {
    pub fn new(engine: Interpolator) -> Self {
        Self { engine, output: Vec::new() }
    }

    pub fn engine(&self) -> &Interpolator {
        &self.engine
    }

    /// Values printed so far, in execution order.
    pub fn output(&self) -> &[Printed] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<Printed> {
        std::mem::take(&mut self.output)
    }

    /// Run the whole tree starting from `ctx`.  Returns the root status.
    pub fn run(&mut self, tree: &mut TestTree, ctx: Context) -> Status {
        let root = tree.root();
        self.run_node(tree, root, ctx)
    }

    fn run_node(&mut self, tree: &mut TestTree, id: TestCaseId, mut ctx: Context) -> Status {
        let mut failed = false;

        let mut env = Env { engine: &self.engine, output: &mut self.output };
        for command in tree[id].commands() {
            if let Err(e) = command.execute(&mut ctx, &mut env) {
                warn!(target: "urobor::run", case = tree[id].name(), command = %command, "{e}");
                failed = true;
            }
        }

        let children = tree[id].children().to_vec();
        for child in children {
            if self.run_node(tree, child, ctx.copy()) == Status::Failed {
                failed = true;
            }
        }

        let status = if failed { Status::Failed } else { Status::Passed };
        debug!(target: "urobor::run", case = tree[id].name(), %status, "finished");
        tree.set_status(id, status);
        status
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
