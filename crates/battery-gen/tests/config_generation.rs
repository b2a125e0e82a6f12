use std::collections::BTreeMap;

use battery_gen::{
    generate_config, render_config, ConfigDocument, ConfigLine, DEFAULT_CONFIG_TEMPLATE,
};

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const TEMPLATE: &str = "[foo]\na = 1\nb = 2";

#[test]
fn overrides_replace_matching_keys() {
    let rendered = render_config(TEMPLATE, &fields(&[("b", "9")])).expect("render");
    assert_eq!(rendered, "[foo]\na = 1\nb = 9");
}

#[test]
fn empty_overrides_keep_template_values() {
    let rendered = render_config(TEMPLATE, &BTreeMap::new()).expect("render");
    assert_eq!(rendered, TEMPLATE);
}

#[test]
fn unknown_keys_are_ignored() {
    let with_unknown = render_config(TEMPLATE, &fields(&[("c", "5")])).expect("render");
    let empty = render_config(TEMPLATE, &BTreeMap::new()).expect("render");
    assert_eq!(with_unknown, empty);
}

#[test]
fn assignments_are_normalised() {
    let rendered =
        render_config("[s]\nkey=value\n  spaced   =  x  ", &BTreeMap::new()).expect("render");
    assert_eq!(rendered, "[s]\nkey = value\nspaced = x");
}

#[test]
fn blank_and_comment_lines_pass_through() {
    let template = "[a]\n# comment\n\nx = 1\n";
    let document = ConfigDocument::parse(template).expect("parse");
    assert_eq!(document.lines()[1], ConfigLine::Verbatim("# comment".into()));
    assert_eq!(document.render(), template);
}

#[test]
fn values_may_contain_equals_signs() {
    let document = ConfigDocument::parse("url = sqlite:///a.db?x=1").expect("parse");
    assert_eq!(document.get("url"), Some("sqlite:///a.db?x=1"));
}

#[test]
fn malformed_line_reports_line_number() {
    let err = ConfigDocument::parse("[a]\nx = 1\nnot an assignment").expect_err("malformed");
    assert_eq!(err.code(), "battery_gen.config_line");
    assert_eq!(err.info().context["line"], "3");
}

#[test]
fn bundled_template_parses() {
    let document = ConfigDocument::parse(DEFAULT_CONFIG_TEMPLATE).expect("bundled");
    assert!(document.get("title").is_some());
    assert!(document
        .lines()
        .iter()
        .any(|line| matches!(line, ConfigLine::Header(h) if h == "[HIT Configuration]")));
}

#[test]
fn generate_config_writes_config_txt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rendered = generate_config(dir.path(), TEMPLATE, &fields(&[("a", "7")])).expect("write");
    let on_disk = std::fs::read_to_string(dir.path().join("config.txt")).expect("read");
    assert_eq!(rendered, on_disk);
    assert_eq!(on_disk, "[foo]\na = 7\nb = 2");
}
