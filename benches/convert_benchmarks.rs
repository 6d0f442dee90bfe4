use criterion::{Criterion, criterion_group, criterion_main};
use js_bridge::{MethodHandler, ScriptValue, channel, convert};
use std::hint::black_box;

// cargo bench --profile dev

// Initialize logger for benchmark so `RUST_LOG` is honored.
#[ctor::ctor]
fn __init_bench_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default()).try_init();
}

fn nested_object(depth: usize, width: usize) -> ScriptValue {
    let mut value = ScriptValue::string("leaf");
    for level in 0..depth {
        let mut entries = vec![(format!("child{level}"), value)];
        for i in 0..width {
            entries.push((format!("n{i}"), ScriptValue::Int(i as i32)));
            entries.push((format!("s{i}"), ScriptValue::string(format!("value {i}"))));
            entries.push((format!("d{i}"), ScriptValue::Date { ticks: 13_300_000_000_000_000 }));
        }
        value = ScriptValue::object(entries);
    }
    value
}

fn benchmark_conversion(c: &mut Criterion) {
    let shallow = nested_object(1, 16);
    c.bench_function("convert_flat_object", |b| b.iter(|| black_box(convert(black_box(&shallow)))));

    let deep = nested_object(32, 4);
    c.bench_function("convert_deep_object", |b| b.iter(|| black_box(convert(black_box(&deep)))));
}

fn benchmark_dispatch(c: &mut Criterion) {
    let (sender, rx) = channel();
    let handler = MethodHandler::new(sender);
    let args = vec![
        ScriptValue::string("doThing"),
        ScriptValue::Int(1),
        ScriptValue::string("two"),
        ScriptValue::Bool(true),
        nested_object(4, 4),
    ];
    c.bench_function("handle_call", |b| {
        b.iter(|| {
            let outcome = handler.handle_call("ExecuteJsMethod", black_box(&args));
            let _ = black_box(rx.try_recv());
            outcome
        })
    });
}

criterion_group!(benches, benchmark_conversion, benchmark_dispatch);
criterion_main!(benches);
