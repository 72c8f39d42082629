// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::Scenario;
use crate::signal::{CompletionLatch, COMPLETION_CODE};
use crate::space::AddressSpace;
use crate::view::HalfwordView;
use crate::BenchError;

/// Halfword store/overwrite/copy at the bottom of the space.
///
/// Two aliasing views over base address 0. Index 1 gets 1, index 3 gets 5 and
/// is then overwritten with a copy of index 1 through the second view. Final
/// image: bytes 2 and 6 hold 1, bytes 3 and 7 hold 0 (little-endian), nothing
/// else is touched.
pub struct HalfwordCopy;

impl Scenario for HalfwordCopy {
    fn name(&self) -> &'static str {
        "halfword-copy"
    }

    fn summary(&self) -> &'static str {
        "Halfword stores and an aliased load/store copy at the bottom of the space"
    }

    fn run(
        &self,
        space: &mut AddressSpace,
        signal: &mut CompletionLatch,
    ) -> Result<(), BenchError> {
        let a = HalfwordView::new(0)?;
        let ptr = a;

        a.store(space, 1, 1)?;
        a.store(space, 3, 5)?;

        // The copy goes through a working local, never straight store-to-store.
        let copied = a.load(space, 1)?;
        ptr.offset(3).store(space, 0, copied)?;

        signal.raise(COMPLETION_CODE)?;
        Ok(())
    }
}
