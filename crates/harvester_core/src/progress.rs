use std::fmt;

/// Completion counter for one harvest run.
///
/// Counts completions only; it never knows which worker finished which book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarvestProgress {
    total: usize,
    completed: usize,
    failed: usize,
}

impl HarvestProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn succeeded(&self) -> usize {
        self.completed - self.failed
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Records one completion and returns the line to report for it.
    pub fn record<'a>(&mut self, address: &'a str, succeeded: bool) -> ProgressLine<'a> {
        self.completed += 1;
        if !succeeded {
            self.failed += 1;
        }
        ProgressLine {
            completed: self.completed,
            total: self.total,
            address,
        }
    }
}

/// Renders as `"    k /  total : address"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressLine<'a> {
    pub completed: usize,
    pub total: usize,
    pub address: &'a str,
}

impl fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} / {:>5} : {}",
            self.completed, self.total, self.address
        )
    }
}
