//! Aggregate root trait and optimistic versioning.

/// Aggregate root marker + minimal interface.
///
/// Every mutable entity that participates in an atomic commit carries a
/// version. Stores compare the version a change was decided against with the
/// version currently persisted (compare-and-swap) before writing.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// `0` means "never persisted".
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// The aggregate must not exist yet.
    New,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    /// Expectation for writing back an aggregate that was read at `version`.
    pub fn of(version: u64) -> Self {
        if version == 0 {
            ExpectedVersion::New
        } else {
            ExpectedVersion::Exact(version)
        }
    }

    /// `actual` is the persisted version, `None` if the aggregate does not exist.
    pub fn matches(self, actual: Option<u64>) -> bool {
        match (self, actual) {
            (ExpectedVersion::New, None) => true,
            (ExpectedVersion::Exact(v), Some(a)) => v == a,
            _ => false,
        }
    }

    /// Version the aggregate will carry once the write succeeds.
    pub fn next(self) -> u64 {
        match self {
            ExpectedVersion::New => 1,
            ExpectedVersion::Exact(v) => v + 1,
        }
    }
}
