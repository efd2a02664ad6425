//! Per-process classification policy
//!
//! Some applications self-draw their chrome and either never answer the
//! native hit-test or answer in ways that hide their tab strips. The policy
//! table maps an owning-process name to the strategy the classifier should
//! use for its windows. Ships as a fixed table; read-only at runtime.

use std::collections::HashMap;

/// Strategy tag for one process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyStrategy {
    /// Trust the native hit-test answer; geometric band only when the
    /// window gives no answer at all
    Standard,
    /// Skip tree inspection and decide purely on the geometric band
    GeometricOnly,
    /// Inspect UI-tree children for tab controls before the geometric band
    TreeInspect,
}

/// Lookup table from lowercase process name to strategy
#[derive(Debug, Clone)]
pub struct ProcessPolicyTable {
    entries: HashMap<String, ClassifyStrategy>,
}

impl ProcessPolicyTable {
    /// The built-in table.
    ///
    /// `code` and `taskmgr` draw their own chrome and report the whole top
    /// area as client space; `finder` answers nothing but carries a tab bar
    /// that must keep winning over the drag gesture.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert("code".to_string(), ClassifyStrategy::GeometricOnly);
        entries.insert("taskmgr".to_string(), ClassifyStrategy::GeometricOnly);
        entries.insert("finder".to_string(), ClassifyStrategy::TreeInspect);
        Self { entries }
    }

    /// An empty table, for tests and callers supplying their own entries.
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Adds or replaces an entry. Names are matched case-insensitively.
    pub fn with(mut self, process: &str, strategy: ClassifyStrategy) -> Self {
        self.entries.insert(process.to_lowercase(), strategy);
        self
    }

    /// Strategy for `process`, `Standard` when absent.
    pub fn lookup(&self, process: Option<&str>) -> ClassifyStrategy {
        process
            .and_then(|name| self.entries.get(&name.to_lowercase()).copied())
            .unwrap_or(ClassifyStrategy::Standard)
    }
}

impl Default for ProcessPolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
