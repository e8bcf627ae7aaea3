//! Test tree: one node per heading.
//!
//! Nodes live in an arena ([`TestTree`]) and refer to each other by
//! [`TestCaseId`].  The parent link is only used by the compiler to place
//! headings; execution walks downwards.

use std::fmt;
use std::ops::Index;

use crate::command::Command;

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "__root__";

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    NotStarted,
    Passed,
    Failed,
    /// Reserved for commands that opt out of running.
    Skipped,
    /// Reserved for extension.
    Other,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "not_started",
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Other => "other",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TestCase ──────────────────────────────────────────────────────────────────

/// Index of a node in its [`TestTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestCaseId(usize);

#[derive(Debug, Clone)]
pub struct TestCase {
    name: String,
    level: u8,
    status: Status,
    commands: Vec<Command>,
    children: Vec<TestCaseId>,
    parent: Option<TestCaseId>,
}

impl TestCase {
    fn new(name: String, level: u8, parent: Option<TestCaseId>) -> Self {
        Self {
            name,
            level,
            status: Status::NotStarted,
            commands: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Heading depth; 0 for the root.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn children(&self) -> &[TestCaseId] {
        &self.children
    }

    pub fn parent(&self) -> Option<TestCaseId> {
        self.parent
    }

    pub fn is_passed(&self) -> bool {
        self.status == Status::Passed
    }
}

// ── TestTree ──────────────────────────────────────────────────────────────────

/// Arena of test cases rooted at a level-0 `__root__` node.
#[derive(Debug, Clone)]
pub struct TestTree {
    nodes: Vec<TestCase>,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TestCase::new(ROOT_NAME.to_owned(), 0, None)],
        }
    }

    pub fn root(&self) -> TestCaseId {
        TestCaseId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get(&self, id: TestCaseId) -> Option<&TestCase> {
        self.nodes.get(id.0)
    }

    /// Append a new child to `parent` and return its id.
    pub fn add_child(&mut self, parent: TestCaseId, name: impl Into<String>, level: u8) -> TestCaseId {
        let id = TestCaseId(self.nodes.len());
        self.nodes.push(TestCase::new(name.into(), level, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn push_command(&mut self, id: TestCaseId, command: Command) {
        self.nodes[id.0].commands.push(command);
    }

    pub fn set_status(&mut self, id: TestCaseId, status: Status) {
        self.nodes[id.0].status = status;
    }

    /// Put every node back to [`Status::NotStarted`].
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.status = Status::NotStarted;
        }
    }

    /// Child of `parent` with the given name, if any.
    pub fn child(&self, parent: TestCaseId, name: &str) -> Option<TestCaseId> {
        self[parent]
            .children
            .iter()
            .copied()
            .find(|&id| self[id].name == name)
    }

    /// Node reached by following `path` names from the root.
    pub fn find(&self, path: &[&str]) -> Option<TestCaseId> {
        path.iter()
            .try_fold(self.root(), |id, name| self.child(id, name))
    }

    /// `(passed, total)` over the direct children of `id`.
    pub fn child_counts(&self, id: TestCaseId) -> (usize, usize) {
        let children = &self[id].children;
        let passed = children.iter().filter(|&&c| self[c].is_passed()).count();
        (passed, children.len())
    }

    /// `(passed, failed, total)` over every node except the root.
    pub fn summary(&self) -> (usize, usize, usize) {
        let cases = &self.nodes[1..];
        let passed = cases.iter().filter(|c| c.status == Status::Passed).count();
        let failed = cases.iter().filter(|c| c.status == Status::Failed).count();
        (passed, failed, cases.len())
    }

    /// Pre-order walk with depth below the root (root itself excluded).
    pub fn walk(&self) -> Vec<(usize, TestCaseId)> {
        let mut out = Vec::with_capacity(self.nodes.len() - 1);
        let mut stack: Vec<(usize, TestCaseId)> =
            self[self.root()].children.iter().rev().map(|&c| (0, c)).collect();
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            stack.extend(self[id].children.iter().rev().map(|&c| (depth + 1, c)));
        }
        out
    }
}

impl Index<TestCaseId> for TestTree {
    type Output = TestCase;

    fn index(&self, id: TestCaseId) -> &TestCase {
        &self.nodes[id.0]
    }
}

/// Indented outline, one `name (passed/total)` line per node.
impl fmt::Display for TestTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, id) in self.walk() {
            let (passed, total) = self.child_counts(id);
            writeln!(
                f,
                "{:indent$}{} ({passed}/{total}) {}",
                "",
                self[id].name,
                self[id].status,
                indent = depth * 2
            )?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestTree {
        let mut tree = TestTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "A", 1);
        tree.add_child(a, "A.1", 2);
        tree.add_child(a, "A.2", 2);
        tree.add_child(root, "B", 1);
        tree
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = TestTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree[tree.root()].name(), ROOT_NAME);
        assert_eq!(tree[tree.root()].level(), 0);
        assert_eq!(tree[tree.root()].parent(), None);
    }

    #[test]
    fn children_keep_insertion_order_and_parent() {
        let tree = sample();
        let a = tree.find(&["A"]).unwrap();
        let names: Vec<&str> = tree[a].children().iter().map(|&c| tree[c].name()).collect();
        assert_eq!(names, ["A.1", "A.2"]);
        let a2 = tree.find(&["A", "A.2"]).unwrap();
        assert_eq!(tree[a2].parent(), Some(a));
        assert!(tree.find(&["A", "missing"]).is_none());
    }

    #[test]
    fn counts_and_summary() {
        let mut tree = sample();
        let a = tree.find(&["A"]).unwrap();
        let a1 = tree.find(&["A", "A.1"]).unwrap();
        let a2 = tree.find(&["A", "A.2"]).unwrap();
        tree.set_status(a1, Status::Passed);
        tree.set_status(a2, Status::Failed);
        tree.set_status(a, Status::Failed);
        assert_eq!(tree.child_counts(a), (1, 2));
        assert_eq!(tree.summary(), (1, 2, 4));

        tree.reset();
        assert_eq!(tree.summary(), (0, 0, 4));
    }

    #[test]
    fn outline_is_indented_preorder() {
        let tree = sample();
        assert_eq!(
            tree.to_string(),
            "A (0/2) not_started\n  A.1 (0/0) not_started\n  A.2 (0/0) not_started\nB (0/0) not_started\n"
        );
    }

    #[test]
    fn status_strings() {
        assert_eq!(Status::default(), Status::NotStarted);
        assert_eq!(Status::NotStarted.to_string(), "not_started");
        assert_eq!(Status::Failed.to_string(), "failed");
    }
}
