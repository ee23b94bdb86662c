//! Embeds Gulper build metadata: a local build counter, the UTC build time
//! and the cargo profile.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

/// Read the previous counter value, treating a missing or garbled file as 0
fn next_build_number(counter: &Path) -> u64 {
    let previous = fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    previous + 1
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter = Path::new(COUNTER_FILE);
    let build = next_build_number(counter);
    if let Err(e) = fs::write(counter, build.to_string()) {
        println!("cargo:warning=could not persist {}: {}", COUNTER_FILE, e);
    }

    let built_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GULPER_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=GULPER_BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=GULPER_BUILD_PROFILE={}", profile);
}
