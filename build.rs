//! Stamps the binary with the git revision it was built from.
//!
//! `soulpress --version` prints the crate version on a release tag and
//! `dev@<short-hash>` everywhere else.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let revision = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let tagged = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=SOULPRESS_REVISION={revision}");
    println!("cargo:rustc-env=SOULPRESS_TAGGED={tagged}");
}
