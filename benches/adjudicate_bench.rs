use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use adjudicator::board::{RawOrder, Unit};
use adjudicator::{Adjudicator, AdjudicatorConfig, Phase, Reresolution};

fn opening_board() -> Vec<Unit> {
    vec![
        Unit::army("a-vie", "austria", "VIE"),
        Unit::army("a-bud", "austria", "BUD"),
        Unit::navy("f-tri", "austria", "TRI"),
        Unit::navy("f-lon", "england", "LON"),
        Unit::navy("f-edi", "england", "EDI"),
        Unit::army("a-lvp", "england", "LVP"),
        Unit::navy("f-bre", "france", "BRE"),
        Unit::army("a-par", "france", "PAR"),
        Unit::army("a-mar", "france", "MAR"),
        Unit::navy("f-kie", "germany", "KIE"),
        Unit::army("a-ber", "germany", "BER"),
        Unit::army("a-mun", "germany", "MUN"),
        Unit::navy("f-nap", "italy", "NAP"),
        Unit::army("a-rom", "italy", "ROM"),
        Unit::army("a-ven", "italy", "VEN"),
        Unit::navy("f-stp", "russia", "STP/sc"),
        Unit::army("a-mos", "russia", "MOS"),
        Unit::army("a-war", "russia", "WAR"),
        Unit::navy("f-sev", "russia", "SEV"),
        Unit::navy("f-ank", "turkey", "ANK"),
        Unit::army("a-con", "turkey", "CON"),
        Unit::army("a-smy", "turkey", "SMY"),
    ]
}

/// A common spring 1901 opening with a few bounces.
fn opening_orders() -> Vec<RawOrder> {
    vec![
        RawOrder::move_to("a-vie", "GAL"),
        RawOrder::move_to("a-bud", "SER"),
        RawOrder::move_to("f-tri", "ALB"),
        RawOrder::move_to("f-lon", "NTH"),
        RawOrder::move_to("f-edi", "NRG"),
        RawOrder::move_to("a-lvp", "YOR"),
        RawOrder::move_to("f-bre", "MAO"),
        RawOrder::move_to("a-par", "BUR"),
        RawOrder::move_to("a-mar", "SPA"),
        RawOrder::move_to("f-kie", "DEN"),
        RawOrder::move_to("a-ber", "KIE"),
        RawOrder::move_to("a-mun", "RUH"),
        RawOrder::move_to("f-nap", "ION"),
        RawOrder::move_to("a-rom", "APU"),
        RawOrder::move_to("a-ven", "TYR"),
        RawOrder::move_to("f-stp", "BOT"),
        RawOrder::move_to("a-mos", "UKR"),
        RawOrder::move_to("a-war", "GAL"),
        RawOrder::move_to("f-sev", "BLA"),
        RawOrder::move_to("f-ank", "BLA"),
        RawOrder::move_to("a-con", "BUL"),
        RawOrder::support_move("a-smy", "CON", "ANK"),
    ]
}

fn bench_all_hold(c: &mut Criterion) {
    let adj = Adjudicator::standard().unwrap();
    let units = opening_board();
    let orders: Vec<RawOrder> = Vec::new();
    c.bench_function("adjudicate_22_holds", |b| {
        b.iter(|| adj.adjudicate(black_box(&units), black_box(&orders)))
    });
}

fn bench_opening_moves(c: &mut Criterion) {
    let adj = Adjudicator::standard().unwrap();
    let units = opening_board();
    let orders = opening_orders();
    c.bench_function("adjudicate_opening_moves", |b| {
        b.iter(|| adj.adjudicate(black_box(&units), black_box(&orders)))
    });
}

fn bench_fixed_point(c: &mut Criterion) {
    let config = AdjudicatorConfig {
        reresolution: Reresolution::FixedPoint,
        ..AdjudicatorConfig::default()
    };
    let adj = Adjudicator::from_config(config).unwrap();
    let units = opening_board();
    let orders = opening_orders();
    c.bench_function("adjudicate_opening_fixed_point", |b| {
        b.iter(|| adj.adjudicate(black_box(&units), black_box(&orders)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let adj = Adjudicator::standard().unwrap();
    let phases: Vec<Phase> = (0..64)
        .map(|i| Phase {
            units: opening_board(),
            orders: if i % 2 == 0 { opening_orders() } else { Vec::new() },
        })
        .collect();
    c.bench_function("adjudicate_many_64", |b| {
        b.iter(|| adj.adjudicate_many(black_box(&phases)))
    });
}

fn bench_load_map(c: &mut Criterion) {
    c.bench_function("load_standard_map", |b| {
        b.iter(|| Adjudicator::standard().unwrap())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_all_hold, bench_opening_moves, bench_fixed_point, bench_batch, bench_load_map
}
criterion_main!(benches);
