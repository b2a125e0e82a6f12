use std::path::Path;

use battery_core::errors::{BatteryError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("tag", "simple_rt")
        .with_path(Path::new("experiments/simple_rt"))
}

#[test]
fn relocation_error_surface() {
    let err = BatteryError::Relocation(sample_info("battery_gen.relocate_copy", "copy failed"));
    assert_eq!(err.code(), "battery_gen.relocate_copy");
    assert_eq!(err.info().context["tag"], "simple_rt");
    assert_eq!(err.info().path(), Some("experiments/simple_rt"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = BatteryError::Config(
        ErrorInfo::new("battery_gen.config_line", "assignment missing '='")
            .with_context("line", "3")
            .with_hint("use key = value"),
    );
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        concat!(
            "config error: assignment missing '=' [battery_gen.config_line] (line=3);",
            " hint: use key = value"
        )
    );
}

#[test]
fn display_joins_context_pairs_in_key_order() {
    let info = ErrorInfo::new("battery_gen.relocate_copy", "copy failed")
        .with_path(Path::new("out/static/experiments/stroop"))
        .with_context("tag", "stroop");
    assert_eq!(
        info.to_string(),
        "copy failed [battery_gen.relocate_copy] (path=out/static/experiments/stroop; tag=stroop)"
    );
    assert!(ErrorInfo::new("c", "m").path().is_none());
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = BatteryError::Source(ErrorInfo::new("battery_gen.git_clone", "clone failed"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Source");
    assert_eq!(json["detail"]["code"], "battery_gen.git_clone");
    let back: BatteryError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, err);
}
