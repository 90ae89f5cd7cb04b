use chrono::Utc;
use std::env;
use std::fs::{metadata, File};
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("version.rs");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let cargo_toml_path = Path::new(&manifest_dir).join("Cargo.toml");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    // Only regenerate when the manifest is newer than the last output
    let up_to_date = dest_path.exists()
        && match (metadata(&dest_path), metadata(&cargo_toml_path)) {
            (Ok(generated), Ok(manifest)) => match (generated.modified(), manifest.modified()) {
                (Ok(generated), Ok(manifest)) => generated >= manifest,
                _ => false,
            },
            _ => false,
        };
    if up_to_date {
        return;
    }

    let manifest = std::fs::read_to_string(&cargo_toml_path).unwrap();
    let storage_format_version = manifest
        .parse::<toml::Table>()
        .ok()
        .and_then(|doc| {
            doc.get("package")
                .and_then(|p| p.get("metadata"))
                .and_then(|m| m.get("storage_format_version"))
                .and_then(|v| v.as_integer())
        })
        .map(|v| v.to_string())
        .unwrap_or_else(|| "0".to_string());

    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let git_hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut f = File::create(&dest_path).unwrap();
    writeln!(
        &mut f,
        r###"pub const STORAGE_FORMAT_VERSION: &str = "{storage_format_version}";
pub const BUILD_TIME: &str = "{build_time}";
pub const GIT_HASH: &str = "{git_hash}";"###
    )
    .unwrap();
}
