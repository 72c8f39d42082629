// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{SpaceObserver, Width};
use core::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Load,
    Store,
}

/// One committed memory transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub kind: AccessKind,
    pub width: Width,
    pub addr: u64,
    pub value: u32,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "store half 0x000002 <- 0x0001" / "load  half 0x000002 -> 0x0001"
        match self.kind {
            AccessKind::Load => {
                write!(
                    f,
                    "load  {} {:#08x} -> {:#06x}",
                    self.width, self.addr, self.value
                )
            }
            AccessKind::Store => {
                write!(
                    f,
                    "store {} {:#08x} <- {:#06x}",
                    self.width, self.addr, self.value
                )
            }
        }
    }
}

/// Ordered, uncoalesced record of every typed access against a space.
///
/// The journal is what gives the model its volatile semantics: a transaction
/// lands here, in program order, for every load and store the scenario issues.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<Transaction>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn push(&self, tx: Transaction) {
        tracing::trace!("{}", tx);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(tx);
        }
    }
}

impl SpaceObserver for Journal {
    fn on_load(&self, addr: u64, width: Width, value: u32) {
        self.push(Transaction {
            kind: AccessKind::Load,
            width,
            addr,
            value,
        });
    }

    fn on_store(&self, addr: u64, width: Width, value: u32) {
        self.push(Transaction {
            kind: AccessKind::Store,
            width,
            addr,
            value,
        });
    }
}
