use objgraph_canonical::{Canonicalizer, CanonicalizerConfig, JsonOptions, Timestamp};
use serde::Serialize;

#[derive(Serialize)]
struct Reading {
    sensor: &'static str,
    taken_at: Timestamp,
    values: Vec<f64>,
}

fn main() {
    let reading = Reading {
        sensor: "north-7",
        taken_at: Timestamp::from_unix_millis(1_621_468_800_123).expect("timestamp in range"),
        values: vec![1.0, 2.5],
    };
    let config = CanonicalizerConfig {
        json: JsonOptions::indented(2),
    };

    match Canonicalizer::new(config).canonicalize(&reading) {
        Ok(form) => {
            println!("{}", form.json);
            println!("digest: {}", form.digest);
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
