//! Demo-mode operation blocklist.

/// Operations blocked while demo mode is on, unless configuration replaces
/// the list.
pub const DEFAULT_BLOCKED_OPERATIONS: [&str; 5] = [
    "filesystem:delete_file",
    "filesystem:write_file",
    "git:push",
    "git:force_push",
    "execute:shell",
];

/// Process-wide policy check consulted before any tool lookup or I/O.
///
/// Matching is by substring: a tool id is blocked when it contains any
/// blocked entry. Renaming a server or tool bypasses the check, so the gate
/// is a guard against accidents in demonstrations, not an access-control
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGate {
    demo_mode: bool,
    blocked_operations: Vec<String>,
}

impl SecurityGate {
    /// Creates a gate with the default blocklist.
    #[must_use]
    pub fn new(demo_mode: bool) -> Self {
        Self {
            demo_mode,
            blocked_operations: DEFAULT_BLOCKED_OPERATIONS
                .iter()
                .map(|operation| (*operation).to_owned())
                .collect(),
        }
    }

    /// Replaces the blocklist.
    #[must_use]
    pub fn with_blocked_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_operations = operations.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether demo mode is on.
    #[must_use]
    pub const fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Returns the active blocklist.
    #[must_use]
    pub fn blocked_operations(&self) -> &[String] {
        &self.blocked_operations
    }

    /// Returns whether `tool_id` is blocked.
    ///
    /// Always `false` when demo mode is off.
    #[must_use]
    pub fn is_blocked(&self, tool_id: &str) -> bool {
        self.demo_mode
            && self
                .blocked_operations
                .iter()
                .any(|operation| tool_id.contains(operation.as_str()))
    }
}

impl Default for SecurityGate {
    fn default() -> Self {
        Self::new(false)
    }
}
