// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=SHUTTER_VERSION");

    // Packagers can pin the version string
    let version = std::env::var("SHUTTER_VERSION")
        .ok()
        .or_else(git_version)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `0.1.0` at a tag, `0.1.0+3.abcdef1` three commits past it,
/// or the bare commit hash when there are no tags
fn git_version() -> Option<String> {
    let described = git(&["describe", "--tags", "--always", "--match", "v*"])?;
    let described = described.strip_prefix('v').unwrap_or(&described);

    let mut parts = described.rsplitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(hash), Some(commits), Some(tag)) => {
            let hash = hash.strip_prefix('g').unwrap_or(hash);
            Some(format!("{}+{}.{}", tag, commits, hash))
        }
        _ => Some(described.to_string()),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}
