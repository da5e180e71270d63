//! Fixpoint solver benchmarks.
//!
//! Measures equation-graph construction and chaotic iteration on
//! loop-heavy programs, the workload the solver is built for.
//!
//! Run with:
//! ```bash
//! cargo bench --bench solver
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use interval_analyzer::{analyze, EquationGraph, Node, Solver};

/// A chain of `depth` sequential counting loops over distinct counters,
/// each guarded by the previous counter's final value.
fn loop_chain(depth: usize) -> Node {
    let names: Vec<String> = (0..depth).map(|i| format!("x{}", i)).collect();
    let decls: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut stmts = Vec::new();
    for name in &names {
        stmts.push(Node::assign(name.clone(), Node::int(0)));
        stmts.push(Node::while_loop(
            Node::var(name.clone()).lt(Node::int(1000)),
            vec![Node::assign(name.clone(), Node::var(name.clone()).add(Node::int(1)))],
        ));
        stmts.push(Node::postcondition(Node::var(name.clone()).ge(Node::int(1000))));
    }
    Node::program(&decls, stmts)
}

/// Loops nested `depth` deep, innermost body incrementing every counter.
fn nested_loops(depth: usize) -> Node {
    let names: Vec<String> = (0..depth).map(|i| format!("x{}", i)).collect();
    let decls: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut body = vec![Node::assign(
        names[depth - 1].clone(),
        Node::var(names[depth - 1].clone()).add(Node::int(1)),
    )];
    for i in (0..depth - 1).rev() {
        let inner = body;
        body = vec![
            Node::assign(names[i + 1].clone(), Node::int(0)),
            Node::while_loop(
                Node::var(names[i + 1].clone()).lt(Node::int(10)),
                inner,
            ),
            Node::assign(names[i].clone(), Node::var(names[i].clone()).add(Node::int(1))),
        ];
    }

    let mut stmts = vec![Node::assign(names[0].clone(), Node::int(0))];
    stmts.push(Node::while_loop(
        Node::var(names[0].clone()).lt(Node::int(10)),
        body,
    ));
    Node::program(&decls, stmts)
}

fn bench_loop_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_chain");
    for depth in [1usize, 4, 16, 64] {
        let program = loop_chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &program, |b, program| {
            b.iter(|| analyze(program).unwrap());
        });
    }
    group.finish();
}

fn bench_nested_loops(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_loops");
    for depth in [2usize, 4, 6] {
        let program = nested_loops(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &program, |b, program| {
            b.iter(|| {
                let mut graph = EquationGraph::build(program).unwrap();
                Solver::default().solve(&mut graph).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_graph_build(c: &mut Criterion) {
    let program = loop_chain(64);
    c.bench_function("graph_build_64_loops", |b| {
        b.iter(|| EquationGraph::build(&program).unwrap().len());
    });
}

criterion_group!(benches, bench_loop_chain, bench_nested_loops, bench_graph_build);
criterion_main!(benches);
