use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=IMAGE_INSIGHT_VERSION");
    let version = env::var("IMAGE_INSIGHT_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=IMAGE_INSIGHT_VERSION={version}");
}
