// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bench;
pub mod journal;
pub mod scenario;
pub mod signal;
pub mod space;
pub mod view;

use core::fmt;

mod tests;

/// Width of a single memory transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    Byte,
    Half,
    Word,
}

impl Width {
    pub fn bytes(self) -> u64 {
        match self {
            Width::Byte => 1,
            Width::Half => 2,
            Width::Word => 4,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Byte => write!(f, "byte"),
            Width::Half => write!(f, "half"),
            Width::Word => write!(f, "word"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Memory access violation at {0:#x}")]
    Violation(u64),
    #[error("Misaligned {width}-wide access at {addr:#x}")]
    Misaligned { addr: u64, width: Width },
}

pub type AccessResult<T> = Result<T, AccessError>;

/// Any failure that aborts a scenario before its natural end.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Signal(#[from] signal::SignalError),
}

/// Trait for observing address-space transactions in a modular way.
///
/// Every typed access through the space notifies observers in program order,
/// which is what makes the accesses externally visible rather than elidable.
pub trait SpaceObserver: std::fmt::Debug + Send + Sync {
    fn on_load(&self, _addr: u64, _width: Width, _value: u32) {}
    fn on_store(&self, _addr: u64, _width: Width, _value: u32) {}
}

/// How one scenario run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The completion signal was raised; memory is ready for inspection.
    Completed { code: u32 },
    /// The scenario returned without raising the completion signal.
    NoSignal,
    /// The scenario aborted on an access or signal fault.
    Fault(BenchError),
}
