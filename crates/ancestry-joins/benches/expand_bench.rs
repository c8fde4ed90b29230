use ancestry_joins::{AncestorScope, AncestryExecutor, AncestryQuery, MemoryStore, Node};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Builds `trees` trees, each a chain of `depth` rows with `fanout` leaves
/// hanging off the bottom.
fn build_forest(trees: u64, depth: u64, fanout: u64) -> MemoryStore<Node<u64>> {
    let mut store = MemoryStore::new();
    let mut next_id = 1;
    for _ in 0..trees {
        let mut parent = Node::root(next_id, ());
        next_id += 1;
        store.insert(parent.clone());
        for _ in 1..depth {
            let child = Node::child_of(next_id, &parent, ());
            next_id += 1;
            store.insert(child.clone());
            parent = child;
        }
        for _ in 0..fanout {
            store.insert(Node::child_of(next_id, &parent, ()));
            next_id += 1;
        }
    }
    store
}

fn bench_whole_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_store");
    for trees in [10_u64, 100, 1_000] {
        let store = build_forest(trees, 8, 4);
        let executor = AncestryExecutor::new(&store);
        group.bench_with_input(BenchmarkId::new("with_ancestors", trees), &trees, |b, _| {
            b.iter(|| black_box(executor.run(&AncestryQuery::with_ancestors())))
        });
        group.bench_with_input(BenchmarkId::new("leafs_only", trees), &trees, |b, _| {
            b.iter(|| black_box(executor.run(&AncestryQuery::with_ancestors_leafs_only())))
        });
    }
    group.finish();
}

fn bench_deep_chain(c: &mut Criterion) {
    let store = build_forest(1, 1_000, 1);
    let executor = AncestryExecutor::new(&store);
    let tip: Vec<_> = store.rows().last().cloned().into_iter().collect();

    c.bench_function("deep_chain_parent", |b| {
        b.iter(|| {
            black_box(executor.with_ancestors_only(&tip, AncestorScope::default().nth_reverse(1)))
        })
    });
}

criterion_group!(benches, bench_whole_store, bench_deep_chain);
criterion_main!(benches);
