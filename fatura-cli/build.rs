use std::path::Path;
use std::process::Command;

/// Version stamp for `fatura --version`: `$FATURA_BUILD_SHA` when the build
/// environment provides one (source tarballs), else `git describe` of the
/// workspace, else `unknown`.
fn build_sha(workspace: &Path) -> String {
    if let Ok(sha) = std::env::var("FATURA_BUILD_SHA") {
        if !sha.trim().is_empty() {
            return sha.trim().to_string();
        }
    }

    Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");

    println!("cargo:rustc-env=FATURA_BUILD_SHA={}", build_sha(&workspace));
    println!("cargo:rerun-if-env-changed=FATURA_BUILD_SHA");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
