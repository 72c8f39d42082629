// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Software-interrupt code meaning "test finished, inspect state".
pub const COMPLETION_CODE: u32 = 0x11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("Completion signal already raised with code {0:#x}")]
    AlreadyRaised(u32),
}

/// One-shot latch for the end-of-test software interrupt.
///
/// A scenario raises it exactly once, after all its stores; the harness reads
/// the recorded code afterwards. Raising twice is an error, and a scenario
/// that never raises is reported by the bench, not here.
#[derive(Debug, Clone, Default)]
pub struct CompletionLatch {
    code: Option<u32>,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, code: u32) -> Result<(), SignalError> {
        if let Some(previous) = self.code {
            return Err(SignalError::AlreadyRaised(previous));
        }
        self.code = Some(code);
        Ok(())
    }

    pub fn is_raised(&self) -> bool {
        self.code.is_some()
    }

    pub fn code(&self) -> Option<u32> {
        self.code
    }

    pub fn clear(&mut self) {
        self.code = None;
    }
}
