/// Get the version string for manifest-tool and libmanifest
pub fn get_version_string() -> String {
    format!(
        "manifest-tool {}\nlibmanifest {}",
        env!("CARGO_PKG_VERSION"),
        libmanifest::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
