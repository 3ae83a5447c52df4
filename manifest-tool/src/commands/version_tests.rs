use super::*;

#[test]
fn test_print_version_contains_package_name() {
    let output = get_version_string();
    assert!(output.starts_with("manifest-tool "));
}

#[test]
fn test_print_version_contains_version_number() {
    let output = get_version_string();
    assert!(output.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_print_version_contains_libmanifest_version() {
    let output = get_version_string();
    let lib_line = output.lines().nth(1).unwrap();
    assert_eq!(lib_line, format!("libmanifest {}", libmanifest::version()));
}
