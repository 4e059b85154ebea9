use automat::{Recognizer, TransitionTable, build, remove_epsilon, to_dfa};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_build(c: &mut Criterion) {
    let expression = "a* + (a+b*)^ a + (ab)^";

    c.bench_function("build_nfa", |b| {
        b.iter(|| black_box(build(black_box(expression))))
    });
}

fn bench_remove_epsilon(c: &mut Criterion) {
    let nfa = build("(0 + 1(01*0)*1)*").unwrap();
    let table = TransitionTable::from_automaton(&nfa).unwrap();

    c.bench_function("remove_epsilon", |b| {
        b.iter(|| black_box(remove_epsilon(black_box(&table))))
    });
}

fn bench_to_dfa(c: &mut Criterion) {
    let nfa = build("(a+b)*a(a+b)(a+b)(a+b)").unwrap();
    let table = TransitionTable::from_automaton(&nfa).unwrap();

    c.bench_function("to_dfa", |b| b.iter(|| black_box(to_dfa(black_box(&table)))));
}

fn bench_recognizer_new(c: &mut Criterion) {
    c.bench_function("recognizer_new", |b| {
        b.iter(|| black_box(Recognizer::new(black_box("(a+b)*abb"))))
    });
}

fn bench_is_match(c: &mut Criterion) {
    let recognizer = Recognizer::new("(0 + 1(01*0)*1)*").unwrap();
    let input = "110110110110110110110110110110";

    c.bench_function("is_match", |b| {
        b.iter(|| black_box(recognizer.is_match(black_box(input))))
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_remove_epsilon,
    bench_to_dfa,
    bench_recognizer_new,
    bench_is_match
);
criterion_main!(benches);
