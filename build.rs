use std::env;
use std::path::PathBuf;

const VERTICAL_TRAINED_DATA: &str = "jpn_vert.traineddata";

fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=tessdata/");

    if target_os == "macos" {
        println!("cargo:rustc-link-lib=framework=Vision");
        println!("cargo:rustc-link-lib=framework=Foundation");
    }

    if target_os == "windows" {
        println!("cargo:rustc-link-search=native=C:/Program Files/Tesseract-OCR");
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let tessdata_src = manifest_dir.join("tessdata");
    if tessdata_src.join(VERTICAL_TRAINED_DATA).exists() {
        println!("cargo:warning=Found {} for bundling", VERTICAL_TRAINED_DATA);
    } else {
        println!(
            "cargo:warning=No tessdata/{} found. Vertical recognition will rely on TESSDATA_PREFIX.",
            VERTICAL_TRAINED_DATA
        );
    }
}
