use std::env;
use std::process::Command;
use time::OffsetDateTime;

/// Tag the version "-dev" unless HEAD sits exactly on the matching release tag
fn display_version(package_version: &str) -> String {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let tag = Command::new("git")
        .args(["describe", "--tags", "--exact-match"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string());

    if tag.as_deref() == Some(format!("v{package_version}").as_str()) {
        package_version.to_string()
    } else {
        format!("{package_version}-dev")
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let version = if env::var("PROFILE").as_deref() == Ok("release") {
        package_version.clone()
    } else {
        display_version(&package_version)
    };

    // Reproducible builds pin the date through SOURCE_DATE_EPOCH
    let build_date = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
        .date();

    println!("cargo:rustc-env=APP_VERSION_DISPLAY={version} ({build_date})");
}
