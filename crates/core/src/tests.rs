// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(test)]
mod integration_tests {
    use crate::bench::Bench;
    use crate::journal::{AccessKind, Transaction};
    use crate::scenario::{lookup, HalfwordCopy, Scenario};
    use crate::signal::{CompletionLatch, COMPLETION_CODE};
    use crate::space::{AddressSpace, Endianness, DEFAULT_SPACE_SIZE};
    use crate::view::HalfwordView;
    use crate::{AccessError, BenchError, Outcome, Width};

    fn half_store(addr: u64, value: u32) -> Transaction {
        Transaction {
            kind: AccessKind::Store,
            width: Width::Half,
            addr,
            value,
        }
    }

    fn half_load(addr: u64, value: u32) -> Transaction {
        Transaction {
            kind: AccessKind::Load,
            width: Width::Half,
            addr,
            value,
        }
    }

    #[test]
    fn test_halfword_copy_end_to_end() {
        let mut bench = Bench::default();
        let scenario = lookup("halfword-copy").unwrap();

        let outcome = bench.run(scenario);
        assert!(matches!(outcome, Outcome::Completed { code: 0x11 }));

        // Every byte the scenario touches, and nothing else.
        for (addr, byte) in bench.space.contents().iter().enumerate() {
            let expected = match addr {
                0x2 | 0x6 => 1,
                _ => 0,
            };
            assert_eq!(*byte, expected, "unexpected value at address {:#x}", addr);
        }
    }

    #[test]
    fn test_halfword_copy_journal_order() {
        let mut bench = Bench::default();
        bench.run(&HalfwordCopy);

        assert_eq!(
            bench.journal().snapshot(),
            vec![
                half_store(0x2, 1),
                half_store(0x6, 5),
                half_load(0x2, 1),
                half_store(0x6, 1),
            ]
        );
        // The signal lands after the last journaled transaction.
        assert_eq!(bench.signal.code(), Some(COMPLETION_CODE));
    }

    #[test]
    fn test_halfword_copy_idempotent_across_fresh_spaces() {
        let mut first = Bench::default();
        let mut second = Bench::default();

        first.run(&HalfwordCopy);
        second.run(&HalfwordCopy);

        assert_eq!(first.space.contents(), second.space.contents());
        assert_eq!(first.space.checksum(), second.space.checksum());
        assert_eq!(first.journal().snapshot(), second.journal().snapshot());
    }

    #[test]
    fn test_halfword_copy_checksum_vector() {
        let mut bench = Bench::default();
        bench.run(&HalfwordCopy);
        assert_eq!(bench.space.checksum(), 536854530);
    }

    #[test]
    fn test_halfword_copy_big_endian_image() {
        let mut bench = Bench::new(AddressSpace::new(DEFAULT_SPACE_SIZE, Endianness::Big));
        let outcome = bench.run(&HalfwordCopy);

        assert!(matches!(outcome, Outcome::Completed { .. }));
        // Same halfword values, mirrored byte image.
        assert_eq!(bench.space.peek(0x2).unwrap(), 0);
        assert_eq!(bench.space.peek(0x3).unwrap(), 1);
        assert_eq!(bench.space.peek(0x6).unwrap(), 0);
        assert_eq!(bench.space.peek(0x7).unwrap(), 1);
    }

    struct SilentFixture;

    impl Scenario for SilentFixture {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn summary(&self) -> &'static str {
            "Stores one halfword and forgets to raise the signal"
        }

        fn run(
            &self,
            space: &mut AddressSpace,
            _signal: &mut CompletionLatch,
        ) -> Result<(), BenchError> {
            HalfwordView::new(0)?.store(space, 0, 0xAA)?;
            Ok(())
        }
    }

    #[test]
    fn test_missing_signal_detected() {
        let mut bench = Bench::default();
        let outcome = bench.run(&SilentFixture);
        assert!(matches!(outcome, Outcome::NoSignal));
    }

    struct WildStore;

    impl Scenario for WildStore {
        fn name(&self) -> &'static str {
            "wild-store"
        }

        fn summary(&self) -> &'static str {
            "Stores past the end of the space"
        }

        fn run(
            &self,
            space: &mut AddressSpace,
            signal: &mut CompletionLatch,
        ) -> Result<(), BenchError> {
            let view = HalfwordView::new(0)?;
            view.store(space, space.size() as u64 / 2, 1)?;
            signal.raise(COMPLETION_CODE)?;
            Ok(())
        }
    }

    #[test]
    fn test_out_of_range_store_faults() {
        let mut bench = Bench::default();
        let outcome = bench.run(&WildStore);

        match outcome {
            Outcome::Fault(BenchError::Access(AccessError::Violation(addr))) => {
                assert_eq!(addr, DEFAULT_SPACE_SIZE as u64);
            }
            other => panic!("Expected a violation fault, got {:?}", other),
        }
        // The fault aborts the run before the signal.
        assert!(!bench.signal.is_raised());
    }
}
