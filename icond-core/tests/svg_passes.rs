use icond_core::svg::{
    declared_height, declared_width, extract_width, inject_view_box, normalize_colors,
    resolve_view_box,
};

#[test]
fn width_defaults_to_canonical_size_when_missing() {
    assert_eq!(extract_width(r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#), 24);
}

#[test]
fn width_defaults_when_malformed() {
    assert_eq!(extract_width(r#"<svg width="16px" height="16px"></svg>"#), 24);
    assert_eq!(extract_width(r#"<svg width=""></svg>"#), 24);
}

#[test]
fn width_is_read_from_root_tag_only() {
    let svg = r#"<svg width="16" height="16"><rect width="4" stroke-width="2"/></svg>"#;
    assert_eq!(extract_width(svg), 16);

    let child_only = r#"<svg viewBox="0 0 24 24"><rect width="4"/></svg>"#;
    assert_eq!(declared_width(child_only), None);
}

#[test]
fn stroke_width_is_not_a_width() {
    let svg = r#"<svg stroke-width="2" height="32"></svg>"#;
    assert_eq!(declared_width(svg), None);
    assert_eq!(declared_height(svg), Some(32));
}

#[test]
fn single_quoted_width_is_read() {
    assert_eq!(extract_width("<svg width='48'></svg>"), 48);
}

#[test]
fn none_and_current_color_are_untouched() {
    let svg = r#"<svg><path fill="none" stroke="currentColor"/></svg>"#;
    let out = normalize_colors(svg);
    assert_eq!(out.content, svg);
    assert_eq!(out.changed, 0);
    assert!(!out.is_changed());
}

#[test]
fn hex_fill_becomes_current_color_and_second_pass_is_noop() {
    let svg = r##"<svg><path fill="#ABC123" d="M0 0"/></svg>"##;
    let first = normalize_colors(svg);
    assert_eq!(first.content, r#"<svg><path fill="currentColor" d="M0 0"/></svg>"#);
    assert_eq!(first.changed, 1);

    let second = normalize_colors(&first.content);
    assert_eq!(second.content, first.content);
    assert_eq!(second.changed, 0);
}

#[test]
fn fill_and_stroke_are_counted_separately() {
    let svg = r##"<svg fill="none"><path fill="#000" stroke="red"/><circle stroke="none"/></svg>"##;
    let out = normalize_colors(svg);
    assert_eq!(out.changed, 2);
    assert_eq!(
        out.content,
        r#"<svg fill="none"><path fill="currentColor" stroke="currentColor"/><circle stroke="none"/></svg>"#
    );
}

#[test]
fn quote_style_is_preserved() {
    let out = normalize_colors("<path fill='#fff'/>");
    assert_eq!(out.content, "<path fill='currentColor'/>");
}

#[test]
fn attributes_ending_in_fill_are_ignored() {
    let svg = r##"<path data-fill="#fff" stroke-width="2" fill-rule="evenodd"/>"##;
    let out = normalize_colors(svg);
    assert_eq!(out.content, svg);
    assert_eq!(out.changed, 0);
}

#[test]
fn view_box_synthesized_from_dimensions() {
    assert_eq!(
        resolve_view_box(r#"<svg width="32" height="32"></svg>"#).as_deref(),
        Some("0 0 32 32")
    );
}

#[test]
fn explicit_view_box_wins_over_dimensions() {
    let svg = r#"<svg width="999" height="999" viewBox="0 0 20 20"></svg>"#;
    assert_eq!(resolve_view_box(svg).as_deref(), Some("0 0 20 20"));
}

#[test]
fn view_box_is_absent_without_both_dimensions() {
    assert_eq!(resolve_view_box(r#"<svg width="32"></svg>"#), None);
    assert_eq!(resolve_view_box("<svg></svg>"), None);
}

#[test]
fn inject_adds_view_box_once() {
    let svg = r#"<svg width="16" height="16"><path/></svg>"#;
    let injected = inject_view_box(svg, "0 0 16 16").expect("root tag without viewBox");
    assert_eq!(
        injected,
        r#"<svg viewBox="0 0 16 16" width="16" height="16"><path/></svg>"#
    );
    assert_eq!(inject_view_box(&injected, "0 0 16 16"), None);
}
