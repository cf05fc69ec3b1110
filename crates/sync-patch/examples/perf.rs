//! Throughput benchmark over representative sync workloads.
//!
//! Run:  cargo run --example perf --release -p sync-patch

use std::hint::black_box;
use std::time::Instant;

use serde_json::{json, Map, Value};
use sync_patch::json_patch::{apply_ops, apply_patch, from_json_patch, ApplyOptions, PatchError};

// ── harness ───────────────────────────────────────────────────────────────────

fn bench<F: FnMut()>(n: u32, mut f: F) -> u64 {
    let warmup = std::cmp::max(50, n / 10);
    for _ in 0..warmup {
        f();
    }
    let start = Instant::now();
    for _ in 0..n {
        f();
    }
    let elapsed = start.elapsed();
    (n as f64 / elapsed.as_secs_f64()) as u64
}

fn fmt(n: u64) -> String {
    // comma-grouped number
    let s = n.to_string();
    let mut out = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

fn row(label: &str, ops: u64) {
    println!("  {:<24}  {:>16} patch/s", label, fmt(ops));
}

// ── workloads ─────────────────────────────────────────────────────────────────

struct Workload {
    label: &'static str,
    base: Map<String, Value>,
    records: Vec<Value>,
}

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records,
        _ => Vec::new(),
    }
}

fn workloads() -> Vec<Workload> {
    let values: Vec<Value> = (0..512).map(Value::from).collect();
    let text = "Hello 🌍 ".repeat(16);
    let insert_pos = "Hello 🌍".encode_utf16().count();

    vec![
        Workload {
            label: "replace nested",
            base: map(json!({
                "viewStates": {
                    "Initial Load / No Track Selected": {"isLoading": true, "count": 1}
                },
                "config": {"Feature~Flag": true}
            })),
            records: records(json!([
                {"op": "replace", "path": "/viewStates/Initial Load ~1 No Track Selected/isLoading", "value": false},
                {"op": "inc", "path": "/viewStates/Initial Load ~1 No Track Selected/count", "inc": 3},
                {"op": "replace", "path": "/config/Feature~0Flag", "value": false}
            ])),
        },
        Workload {
            label: "list ops (512)",
            base: map(json!({"arr": values})),
            records: records(json!([
                {"op": "add", "path": "/arr/0", "value": -1},
                {"op": "add", "path": "/arr/256", "value": "mid"},
                {"op": "add", "path": "/arr/-", "value": 512},
                {"op": "remove", "path": "/arr/10"},
                {"op": "replace", "path": "/arr/5", "value": "five"}
            ])),
        },
        Workload {
            label: "string ops",
            base: map(json!({"text": text})),
            records: records(json!([
                {"op": "str_ins", "path": "/text", "pos": insert_pos, "str": "beautiful "},
                {"op": "str_del", "path": "/text", "pos": insert_pos + 10, "len": 6},
                {"op": "str_ins", "path": "/text", "pos": 0, "str": "Start: "}
            ])),
        },
        Workload {
            label: "mixed",
            base: map(json!({
                "metadata": {"version": 1, "tag": "beta"},
                "matrix": [[0, 1, 2], [3, 4, 5]],
                "list": ["a", "b", "c", "d"]
            })),
            records: records(json!([
                {"op": "test", "path": "/metadata/tag", "value": "beta"},
                {"op": "copy", "from": "/metadata/tag", "path": "/metadata/previous"},
                {"op": "move", "from": "/list/0", "path": "/list/3"},
                {"op": "replace", "path": "/matrix/0/1", "value": 42},
                {"op": "add", "path": "/matrix/1/-", "value": 6}
            ])),
        },
    ]
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<(), PatchError> {
    let n = 20_000;
    let options = ApplyOptions::default();

    println!("\n  sync-patch  apply throughput\n");
    println!("  {:<24}  {:>16}", "workload", "patches/sec");
    println!("  {}", "-".repeat(50));

    for workload in workloads() {
        // Fail fast on a broken workload instead of timing error paths.
        let mut probe = workload.base.clone();
        apply_patch(&mut probe, &workload.records)?;

        let ops = from_json_patch(&workload.records)?;

        let records_rate = bench(n, || {
            let mut doc = workload.base.clone();
            let _ = black_box(apply_patch(&mut doc, &workload.records));
            black_box(doc);
        });
        row(&format!("{} (records)", workload.label), records_rate);

        let ops_rate = bench(n, || {
            let mut doc = workload.base.clone();
            let _ = black_box(apply_ops(&mut doc, &ops, &options));
            black_box(doc);
        });
        row(&format!("{} (decoded)", workload.label), ops_rate);
    }

    println!();
    Ok(())
}
