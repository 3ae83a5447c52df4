use super::*;

#[test]
fn test_render_mode_from_flags() {
    assert_eq!(RenderMode::from_flags(false, false).unwrap(), RenderMode::Human);
    assert_eq!(
        RenderMode::from_flags(true, false).unwrap(),
        RenderMode::Raw {
            expand_config: false
        }
    );
    assert_eq!(
        RenderMode::from_flags(true, true).unwrap(),
        RenderMode::Raw {
            expand_config: true
        }
    );
}

#[test]
fn test_expand_config_without_raw_is_rejected() {
    let err = RenderMode::from_flags(false, true).unwrap_err();
    assert!(matches!(err, ToolError::Validation { .. }));
    assert!(err.to_string().contains("--expand-config"));
}

#[test]
fn test_plain_palette_leaves_text_alone() {
    let palette = Palette::plain();
    assert!(!palette.is_enabled());
    assert_eq!(palette.kind("linux"), "linux");
    assert_eq!(palette.digest("sha256:abc"), "sha256:abc");
    assert_eq!(palette.size(42), "42");
    assert_eq!(palette.count(format!("{:02}", 3)), "03");
}

#[test]
fn test_enabled_palette_adds_escape_codes() {
    let palette = Palette::new(true);
    let painted = palette.digest("sha256:abc");
    assert!(painted.contains("sha256:abc"));
    assert!(painted.contains('\u{1b}'));
    assert_ne!(painted, "sha256:abc");
}
