use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nut_exporter::{
    metrics::{registry, translate::translate},
    nut::{quote, unquote},
    NutClient, ObservationSink, PrometheusSink, VariableSet,
};
use std::time::Duration;

/// Variables as reported by a typical line-interactive UPS.
fn sample_variables() -> VariableSet {
    [
        ("battery.charge", "100"),
        ("battery.charge.low", "10"),
        ("battery.runtime", "2460"),
        ("battery.voltage", "13.6"),
        ("battery.charger.status", "floating"),
        ("device.mfr", "APC"),
        ("device.model", "Back-UPS ES 700G"),
        ("device.serial", "5B1234X56789"),
        ("device.type", "ups"),
        ("input.voltage", "231.0"),
        ("input.transfer.high", "266"),
        ("input.transfer.low", "180"),
        ("ups.beeper.status", "enabled"),
        ("ups.load", "17"),
        ("ups.realpower.nominal", "405"),
        ("ups.status", "OL"),
        ("ups.temperature", "N/A"),
        ("driver.name", "usbhid-ups"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Benchmark translation of one UPS worth of variables
fn bench_translate(c: &mut Criterion) {
    let vars = sample_variables();

    c.bench_function("translate_variables", |b| b.iter(|| translate(&vars)));

    c.bench_function("translate_empty", |b| {
        let empty = VariableSet::new();
        b.iter(|| translate(&empty))
    });
}

/// Benchmark value unquoting with and without escapes
fn bench_unquote(c: &mut Criterion) {
    for value in ["231.0", "Back-UPS ES 700G", "say \"hi\" \\ bye"] {
        let quoted = quote(value);
        c.bench_with_input(BenchmarkId::new("unquote", value), &quoted, |b, quoted| {
            b.iter(|| unquote(quoted).expect("Should unquote"))
        });
    }
}

/// Benchmark Prometheus text encoding of a full UPS
fn bench_exposition(c: &mut Criterion) {
    let observations = translate(&sample_variables());

    c.bench_function("prometheus_encode", |b| {
        b.iter(|| {
            let mut sink = PrometheusSink::new("nut");
            sink.describe(registry::descriptors()).expect("Should describe");
            for observation in observations.iter().cloned() {
                sink.observe(observation).expect("Should observe");
            }
            sink.encode().expect("Should encode")
        })
    });
}

/// Benchmark parsing a LIST VAR response from a scripted stream
fn bench_list_variables(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    let mut response = String::from("BEGIN LIST VAR ups\n");
    let mut vars: Vec<_> = sample_variables().into_iter().collect();
    vars.sort();
    for (key, value) in vars {
        response.push_str(&format!("VAR ups {} {}\n", key, quote(&value)));
    }
    response.push_str("END LIST VAR ups\n");

    c.bench_function("list_variables", |b| {
        b.to_async(&rt).iter(|| async {
            let mock = tokio_test::io::Builder::new()
                .write(b"LIST VAR ups\n")
                .read(response.as_bytes())
                .build();
            let mut client = NutClient::new(mock, Duration::from_secs(1));
            client.list_variables("ups").await.expect("Should list variables")
        })
    });
}

criterion_group!(
    benches,
    bench_translate,
    bench_unquote,
    bench_exposition,
    bench_list_variables
);
criterion_main!(benches);
