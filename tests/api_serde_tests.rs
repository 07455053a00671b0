#![cfg(feature = "serde")]
//! Serialization of operator configurations.

use mls_rs::prelude::*;

#[test]
fn test_config_round_trip() {
    let config = MlsConfig {
        weight_function: Wendland4,
        polynomial_degree: Cubic,
        neighbors: Some(14),
        support_radius: SupportRadius::Fixed(0.25),
        rank_policy: QrWithEigenFallback,
        rcond: Some(1e-10),
        threads: Some(4),
    };

    let json = serde_json::to_string(&config).unwrap();
    let back: MlsConfig<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_enum_representation() {
    assert_eq!(serde_json::to_string(&Wendland2).unwrap(), "\"Wendland2\"");
    assert_eq!(serde_json::to_string(&Quadratic).unwrap(), "\"Quadratic\"");

    let radius: SupportRadius<f64> =
        serde_json::from_str(r#"{"FarthestNeighbor":{"scale":1.5}}"#).unwrap();
    assert_eq!(radius, SupportRadius::FarthestNeighbor { scale: 1.5 });
}

#[test]
fn test_deserialized_config_builds_operator() {
    let json = r#"{
        "weight_function": "Wendland0",
        "polynomial_degree": "Quadratic",
        "neighbors": 3,
        "support_radius": {"FarthestNeighbor": {"scale": 1.1}},
        "rank_policy": "PseudoInverse",
        "rcond": null,
        "threads": null
    }"#;
    let config: MlsConfig<f64> = serde_json::from_str(json).unwrap();

    let sources: Vec<[f64; 1]> = (0..5).map(|i| [i as f64]).collect();
    let values: Vec<f64> = sources.iter().map(|p| p[0] * p[0]).collect();
    let mls = MovingLeastSquares::with_config(&sources, &vec![[2.5]], &config).unwrap();
    let approx = mls.interpolate(&values).unwrap();
    assert!((approx[0] - 6.25).abs() < 1e-10);
}
