use nm_core::errors::{ErrorInfo, NmError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("node", 7)
        .with_context("reason", "example")
}

#[test]
fn invalid_parameter_surface() {
    let err = NmError::InvalidParameter(sample_info("interval-inverted", "lower above upper"));
    assert_eq!(err.info().code, "interval-inverted");
    assert_eq!(err.info().context.get("node").map(String::as_str), Some("7"));
}

#[test]
fn invalid_edge_surface() {
    let err = NmError::InvalidEdge(sample_info("node-out-of-range", "node 7 missing"));
    assert_eq!(err.info().code, "node-out-of-range");
    assert!(err.to_string().starts_with("invalid edge:"));
}

#[test]
fn invalid_trade_surface() {
    let err = NmError::InvalidTrade(sample_info("self-trade", "node trades with itself"));
    assert_eq!(err.info().code, "self-trade");
}

#[test]
fn infeasible_surface() {
    let err = NmError::InfeasibleDegreeSequence(sample_info("odd-degree-sum", "sum is odd"));
    assert_eq!(err.info().code, "odd-degree-sum");
}

#[test]
fn state_surface_carries_hint() {
    let err = NmError::State(
        ErrorInfo::new("analysis-finalized", "samples closed").with_hint("collect before init"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("hint: collect before init"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = NmError::Serde(sample_info("deserialize-json", "bad payload"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Serde\""));
    let restored: NmError = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, err);
}
