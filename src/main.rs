//! # GridStack CLI
//!
//! Usage:
//!   gridstack scene.json -o layout.json
//!   echo '{ ... }' | gridstack
//!   gridstack --example > scene.json
//!
//! Set `RUST_LOG=gridstack=debug` to trace placement decisions.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_scene_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("✗ Failed to read scene: {}", e);
            process::exit(1);
        }
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone());

    let json = match gridstack::layout_json(&input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("✗ Failed to write {}: {}", path, e);
                process::exit(1);
            }
            eprintln!("✓ Written {} bytes to {}", json.len(), path);
        }
        None => println!("{}", json),
    }
}

fn example_scene_json() -> &'static str {
    r##"{
  "config": {
    "columns": 12,
    "margin": 8,
    "cellHeight": "5em",
    "secondaryRegion": {
      "columns": 6,
      "rows": 1,
      "cellHeight": 48,
      "lineThickness": 4,
      "color": "#1f6feb"
    }
  },
  "containerWidth": 1280,
  "fontSize": 16,
  "widgets": [
    { "key": "revenue", "x": 0, "y": 0, "w": 8, "h": 3 },
    { "key": "alerts", "w": 4, "h": 2 },
    { "key": "uptime", "w": 4, "h": 1 },
    { "key": "map", "w": 6, "h": 4 },
    { "key": "latency", "x": 2, "y": 1, "w": 4, "h": 2 }
  ],
  "secondaryWidgets": [
    { "key": "refresh", "w": 1 },
    { "key": "export", "w": 1 },
    { "key": "filters", "x": 3, "y": 0, "w": 3 }
  ],
  "updates": [
    { "target": "uptime", "h": 2 }
  ],
  "removals": []
}
"##
}
