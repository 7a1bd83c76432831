//! Build script - copies the linker script into the output directory
//! so that the linker can find it at link time, and links the prebuilt
//! TinyUSB host library into the firmware.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to OUT_DIR
    fs::copy("memory.x", out_dir.join("memory.x")).unwrap();

    // Tell cargo to look for linker scripts in OUT_DIR
    println!("cargo:rustc-link-search={}", out_dir.display());

    // TinyUSB host stack (PIO-USB port), only for the firmware build.
    let target = env::var("TARGET").unwrap_or_default();
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() && target.starts_with("thumbv6m") {
        if let Ok(dir) = env::var("TINYUSB_HOST_LIB_DIR") {
            println!("cargo:rustc-link-search=native={dir}");
        }
        println!("cargo:rustc-link-lib=static=tinyusb_host");
    }

    // Rebuild if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TINYUSB_HOST_LIB_DIR");
}
