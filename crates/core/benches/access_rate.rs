// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use criterion::{criterion_group, criterion_main, Criterion};
use memlab_core::space::{AddressSpace, Endianness, DEFAULT_SPACE_SIZE};
use memlab_core::view::HalfwordView;

fn bench_halfword_traffic(c: &mut Criterion) {
    let mut space = AddressSpace::new(DEFAULT_SPACE_SIZE, Endianness::Little);
    let view = HalfwordView::new(0).unwrap();
    let halfwords = (DEFAULT_SPACE_SIZE / 2) as u64;

    c.bench_function("halfword_store_sweep", |b| {
        b.iter(|| {
            for index in 0..halfwords {
                view.store(&mut space, index, index as u16).unwrap();
            }
        })
    });

    c.bench_function("halfword_load_sweep", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for index in 0..halfwords {
                acc = acc.wrapping_add(view.load(&space, index).unwrap() as u32);
            }
            acc
        })
    });
}

criterion_group!(benches, bench_halfword_traffic);
criterion_main!(benches);
