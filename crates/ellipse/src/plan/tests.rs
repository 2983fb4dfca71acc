use super::*;
use crate::error::ConfigError;

#[test]
fn default_step_counts_match_the_classic_exercises() {
    let counts: Vec<(MethodKind, usize)> = MethodKind::ALL
        .into_iter()
        .map(|k| (k, ConstructionPlan::defaults(k).unwrap().step_count()))
        .collect();
    assert_eq!(
        counts,
        vec![
            (MethodKind::FocusDirectrix, 7),
            (MethodKind::ArcCircleFromAxes, 8),
            (MethodKind::ArcCircleFromTriangle, 12),
            (MethodKind::ArcCircleMirrored, 12),
        ]
    );
}

#[test]
fn steps_are_numbered_in_order() {
    let plan = ConstructionPlan::defaults(MethodKind::ArcCircleFromTriangle).unwrap();
    for (i, s) in plan.steps().iter().enumerate() {
        assert_eq!(s.index, i);
        assert!(!s.label.is_empty());
    }
    assert_eq!(plan.steps()[0].label, "Construct horizontal line AB of 100 mm");
    assert!(plan.steps()[3].label.contains("17.5 mm"));
}

#[test]
fn since_and_during_rules() {
    let plan = ConstructionPlan::defaults(MethodKind::ArcCircleFromTriangle).unwrap();
    assert!(!plan.is_visible(FeatureId::TriangleApex, 0, false));
    assert!(plan.is_visible(FeatureId::TriangleApex, 1, false));
    assert!(plan.is_visible(FeatureId::TriangleApex, 11, false));

    // Arcs of the second division only while step 6 is current; its points persist.
    assert!(!plan.is_visible(FeatureId::DivisionArcs(1), 5, false));
    assert!(plan.is_visible(FeatureId::DivisionArcs(1), 6, false));
    assert!(!plan.is_visible(FeatureId::DivisionArcs(1), 7, false));
    assert!(plan.is_visible(FeatureId::DivisionPoints(1), 7, false));

    assert!(!plan.is_visible(FeatureId::Curve, 10, false));
    assert!(plan.is_visible(FeatureId::Curve, 11, false));
}

#[test]
fn reveal_all_bypasses_gating_but_not_membership() {
    let plan = ConstructionPlan::defaults(MethodKind::FocusDirectrix).unwrap();
    assert!(plan.is_visible(FeatureId::CurveLabel, 0, true));
    assert!(!plan.is_visible(FeatureId::CurveLabel, 0, false));
    // Not a focus–directrix feature at all.
    assert!(!plan.is_visible(FeatureId::TriangleApex, 0, true));
    assert_eq!(plan.rule(FeatureId::Rays), Some(RevealRule::Since(2)));
}

#[test]
fn eccentricity_appears_in_step_text() {
    let plan = ConstructionPlan::defaults(MethodKind::FocusDirectrix).unwrap();
    assert!(plan.steps()[6].label.contains("e = 0.667 < 1"));
    assert_eq!(ratio_text(0.5), "0.5");
}

#[test]
fn malformed_parameters_are_rejected() {
    let bad_e = Method::FocusDirectrix(FocusDirectrixParams {
        eccentricity: 1.2,
        ..Default::default()
    });
    assert_eq!(
        ConstructionPlan::new(bad_e).unwrap_err(),
        ConfigError::InvalidEccentricity(1.2)
    );

    let negative = Method::ArcCircleFromTriangle(TriangleParams {
        baseline_mm: -100.0,
        ..Default::default()
    });
    assert!(matches!(
        ConstructionPlan::new(negative),
        Err(ConfigError::InvalidLength {
            name: "baseline_mm",
            ..
        })
    ));

    let open_triangle = Method::ArcCircleMirrored(TriangleParams {
        apex_from_a_mm: 20.0,
        apex_from_b_mm: 30.0,
        ..Default::default()
    });
    assert!(matches!(
        ConstructionPlan::new(open_triangle),
        Err(ConfigError::Incompatible(_))
    ));

    let crowded = Method::ArcCircleFromTriangle(TriangleParams {
        divisions: 5,
        ..Default::default()
    });
    assert!(ConstructionPlan::new(crowded).is_err());

    let flat = Method::ArcCircleFromAxes(AxesParams {
        minor_axis_mm: 130.0,
        ..Default::default()
    });
    assert!(ConstructionPlan::new(flat).is_err());

    let few = Method::FocusDirectrix(FocusDirectrixParams {
        samples: 3,
        ..Default::default()
    });
    assert!(matches!(
        ConstructionPlan::new(few),
        Err(ConfigError::InvalidCount { min: 4, .. })
    ));
}

#[test]
fn method_kind_parses_and_params_deserialize() {
    for k in MethodKind::ALL {
        assert_eq!(k.as_str().parse::<MethodKind>().unwrap(), k);
    }
    assert!("spiral".parse::<MethodKind>().is_err());

    let m: Method =
        serde_json::from_str(r#"{"method":"focus-directrix","eccentricity":0.5}"#).unwrap();
    match m {
        Method::FocusDirectrix(p) => {
            assert_eq!(p.eccentricity, 0.5);
            assert_eq!(p.samples, 24);
        }
        other => panic!("unexpected {other:?}"),
    }
    let axes: Method = serde_json::from_str(r#"{"method":"arc-circle-from-axes"}"#).unwrap();
    assert_eq!(axes, Method::defaults(MethodKind::ArcCircleFromAxes));
}
