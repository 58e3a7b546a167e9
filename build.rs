//! This build script records the build time for the firmware clock and, for the
//! PineTime target, copies the `memory.x` file from the crate root into a
//! directory where the linker can always find it at build time.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // The PineTime has no battery-backed RTC, so the clock starts at the build time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const BUILD_UTC_EPOCH: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    if env::var_os("CARGO_FEATURE_PINETIME").is_some() {
        // Put memory layout in the output directory and ensure it's on the linker search path.
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(include_bytes!("memory.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // No `rerun-if-changed` here: rebuilding any file should refresh `BUILD_UTC_EPOCH`.
}
