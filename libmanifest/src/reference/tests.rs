use super::*;
use std::str::FromStr;

#[test]
fn test_reference_from_valid_string_succeeds() {
    let reference = Reference::from_str("ghcr.io/user/repo:latest");
    assert!(reference.is_ok());
}

#[test]
fn test_reference_from_invalid_string_fails() {
    let reference = Reference::from_str("Invalid-Reference-With-Caps");
    assert!(matches!(
        reference.unwrap_err(),
        ToolError::Validation { .. }
    ));
}

#[test]
fn test_reference_accessors() {
    let reference = Reference::parse_tagged("example.com/app:v1").unwrap();
    assert_eq!(reference.registry(), "example.com");
    assert_eq!(reference.repository(), "app");
    assert_eq!(reference.tag(), Some("v1"));
    assert_eq!(reference.digest(), None);
    assert_eq!(reference.original(), "example.com/app:v1");
}

#[test]
fn test_parse_tagged_rejects_missing_tag() {
    let err = Reference::parse_tagged("example.com/app").unwrap_err();
    assert!(matches!(err, ToolError::Validation { .. }));
    assert!(err.to_string().contains("must include a tag"));
}

#[test]
fn test_parse_tagged_port_is_not_a_tag() {
    assert!(Reference::parse_tagged("localhost:5000/app").is_err());

    let reference = Reference::parse_tagged("localhost:5000/app:dev").unwrap();
    assert_eq!(reference.registry(), "localhost:5000");
    assert_eq!(reference.tag(), Some("dev"));
}

#[test]
fn test_parse_tagged_rejects_digest_only() {
    let name = "example.com/app@sha256:7173b809ca12ec5dee4506cd86be934c4596dd234ee82c0662eac04a8c2c71dc";
    assert!(Reference::parse_tagged(name).is_err());
}

#[test]
fn test_has_explicit_tag() {
    assert!(has_explicit_tag("alpine:3.19"));
    assert!(has_explicit_tag("registry:5000/team/app:v2"));
    assert!(!has_explicit_tag("registry:5000/team/app"));
    assert!(!has_explicit_tag("alpine"));
}
