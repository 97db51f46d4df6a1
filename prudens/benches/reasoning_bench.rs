use criterion::*;
use prudens::parser_prudens::{parse_context, parse_knowledge_base};
use prudens::{OperationMode, Reasoner, ReasonerConfig};
use shared::literal::Literal;

const PATH_RULES: &str = "
r0 :: edge(X, Y) implies path(X, Y);
r1 :: path(X, Y), edge(Y, Z) implies path(X, Z);
";

const BIRD_RULES: &str = "
r0 :: penguin(X) implies -flies(X);
r1 :: bird(X) implies flies(X);
r2 :: antarctic(X) implies penguin(X);
";

fn chain_context(length: usize) -> Vec<Literal> {
    let text: String = (0..length)
        .map(|i| format!("edge(n{}, n{});", i, i + 1))
        .collect();
    parse_context(&text).unwrap()
}

fn bird_context(count: usize) -> Vec<Literal> {
    let text: String = (0..count)
        .map(|i| {
            if i % 3 == 0 {
                format!("bird(b{0}); antarctic(b{0});", i)
            } else {
                format!("bird(b{});", i)
            }
        })
        .collect();
    parse_context(&text).unwrap()
}

fn reasoner(rules: &str, mode: OperationMode) -> Reasoner {
    let parsed = parse_knowledge_base(rules).unwrap();
    Reasoner::from_knowledge_base(parsed.knowledge_base())
        .unwrap()
        .with_config(ReasonerConfig::default().with_operation_mode(mode))
}

fn reasoning_benchmark(c: &mut Criterion) {
    let chain = chain_context(30);
    let birds = bird_context(300);

    let mut group = c.benchmark_group("fixpoint");
    group.sample_size(10);

    for (label, mode) in [
        ("single_thread", OperationMode::SingleThread),
        ("multi_thread", OperationMode::MultiThread),
    ] {
        let paths = reasoner(PATH_RULES, mode);
        group.bench_function(format!("transitive_chain_{}", label), |b| {
            b.iter(|| paths.infer(black_box(&chain)).unwrap())
        });

        let flyers = reasoner(BIRD_RULES, mode);
        group.bench_function(format!("late_retraction_{}", label), |b| {
            b.iter(|| flyers.infer(black_box(&birds)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, reasoning_benchmark);
criterion_main!(benches);
