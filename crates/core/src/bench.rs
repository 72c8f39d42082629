// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::journal::Journal;
use crate::scenario::Scenario;
use crate::signal::CompletionLatch;
use crate::space::AddressSpace;
use crate::Outcome;
use memlab_config::SpaceDescriptor;
use std::sync::Arc;

/// Execution environment for one conformance run.
///
/// Owns the address space and the completion latch, and wires a [`Journal`]
/// observer into the space before the scenario ever sees it, so every typed
/// access of the run is on the record.
pub struct Bench {
    pub space: AddressSpace,
    pub signal: CompletionLatch,
    journal: Arc<Journal>,
}

impl Default for Bench {
    fn default() -> Self {
        Self::new(AddressSpace::default())
    }
}

impl Bench {
    pub fn new(mut space: AddressSpace) -> Self {
        let journal = Arc::new(Journal::new());
        space.attach_observer(journal.clone());
        Self {
            space,
            signal: CompletionLatch::new(),
            journal,
        }
    }

    pub fn from_config(desc: &SpaceDescriptor) -> anyhow::Result<Self> {
        Ok(Self::new(AddressSpace::from_config(desc)?))
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Run a scenario to its end and classify what happened.
    pub fn run(&mut self, scenario: &dyn Scenario) -> Outcome {
        tracing::debug!("Running scenario '{}'", scenario.name());

        let outcome = match scenario.run(&mut self.space, &mut self.signal) {
            Err(e) => Outcome::Fault(e),
            Ok(()) => match self.signal.code() {
                Some(code) => Outcome::Completed { code },
                None => Outcome::NoSignal,
            },
        };

        tracing::debug!(
            "Scenario '{}' finished: {:?} ({} accesses)",
            scenario.name(),
            outcome,
            self.journal.len()
        );
        outcome
    }

    /// Zero the space, clear the journal and latch, keeping the wiring.
    pub fn reset(&mut self) {
        self.space.clear();
        self.journal.clear();
        self.signal.clear();
    }
}
