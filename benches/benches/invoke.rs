// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for marshaling with `understory_dispatcher` and
//! `understory_automation`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_automation::{
    AutomationError, AutomationPeer, PatternId, PatternProvider, ProviderWrapper, ToggleProvider,
    ToggleState, WrapperRegistry,
};
use understory_dispatcher::{Dispatcher, DispatcherBuilder};

struct Switch(AtomicU64);

impl ToggleProvider for Switch {
    fn toggle_state(&self) -> ToggleState {
        if self.0.load(Ordering::Relaxed).is_multiple_of(2) {
            ToggleState::Off
        } else {
            ToggleState::On
        }
    }

    fn toggle(&self) -> Result<(), AutomationError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct SwitchPeer {
    dispatcher: Dispatcher,
    switch: Arc<Switch>,
}

impl AutomationPeer for SwitchPeer {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn pattern_provider(&self, pattern: PatternId) -> Option<PatternProvider> {
        (pattern == PatternId::TOGGLE).then(|| PatternProvider::Toggle(self.switch.clone()))
    }
}

fn bench_invoke(c: &mut Criterion) {
    let event_loop = DispatcherBuilder::new().build_for_current_thread();
    let local = event_loop.dispatcher().clone();
    let owner = DispatcherBuilder::new().name("bench-owner").spawn().unwrap();
    let remote = owner.dispatcher().clone();

    let mut group = c.benchmark_group("dispatcher/invoke");
    group.bench_function("inline", |b| {
        b.iter(|| black_box(local.invoke(|| black_box(1_u64))))
    });
    group.bench_function("cross_thread", |b| {
        b.iter(|| black_box(remote.invoke(|| black_box(1_u64))))
    });
    group.finish();
}

fn bench_wrapper(c: &mut Criterion) {
    let owner = DispatcherBuilder::new().name("bench-ui").spawn().unwrap();
    let peer: Arc<dyn AutomationPeer> = Arc::new(SwitchPeer {
        dispatcher: owner.dispatcher().clone(),
        switch: Arc::new(Switch(AtomicU64::new(0))),
    });
    let registry = WrapperRegistry::with_standard_patterns();

    let mut group = c.benchmark_group("automation/toggle");

    group.bench_function("resolve_wrapper", |b| {
        b.iter(|| black_box(registry.wrapper(&peer, PatternId::TOGGLE)))
    });

    let Ok(Some(ProviderWrapper::Toggle(toggle))) = registry.wrapper(&peer, PatternId::TOGGLE)
    else {
        panic!("switch supports Toggle");
    };
    group.bench_function("toggle_state", |b| {
        b.iter(|| black_box(toggle.toggle_state()))
    });

    group.finish();
}

criterion_group!(benches, bench_invoke, bench_wrapper);
criterion_main!(benches);
