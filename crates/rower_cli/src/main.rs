//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `rower_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("rower_core version={}", rower_core::core_version());
    println!("rower_core first_label={}", rower_core::row_label(0));
}
