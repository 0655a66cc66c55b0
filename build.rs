use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=link.ld");
    println!("cargo:rerun-if-env-changed=VERBOSE_BUILD");

    // Host builds (unit and integration tests) link normally.
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("riscv32") {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
        println!("cargo:rustc-link-arg-bins=--script={}/link.ld", manifest_dir);
    }
}
