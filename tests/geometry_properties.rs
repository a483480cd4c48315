//! Geometry and trajectory property tests
//!
//! Minimum-curvature behaviour checked end to end through the public
//! calculator: straight holes, local consistency when re-tying part way
//! down, tie-on handling, BHC refinement and the error taxonomy.

use wellpath::geometry::{minimum_curvature, StartPoint};
use wellpath::{
    calculate, calculate_bhc, ErrorKind, Location, StationSeries, SurveyInput, TieOn,
    VsAzimuthSource,
};

const EPS: f64 = 1e-6;

fn survey(md: &[f64], inc: &[f64], azi: &[f64]) -> StationSeries {
    StationSeries::new(md.to_vec(), inc.to_vec(), azi.to_vec())
}

fn s_curve() -> SurveyInput {
    let md: Vec<f64> = (0..16).map(|i| i as f64 * 150.0).collect();
    let inc = vec![
        0.0, 2.5, 6.0, 10.5, 15.0, 20.0, 24.0, 27.0, 27.0, 26.0, 22.0, 17.0, 12.0, 8.0, 5.0, 4.0,
    ];
    let azi = vec![
        0.0, 310.0, 318.0, 327.0, 338.0, 349.0, 358.0, 6.0, 12.0, 15.0, 17.0, 18.0, 18.5, 19.0,
        19.0, 19.0,
    ];
    SurveyInput::new(StationSeries::new(md, inc, azi), TieOn::surface())
}

// ============================================================================
// Straight hole
// ============================================================================

#[test]
fn constant_angles_give_a_straight_line() {
    let n = 12;
    let md: Vec<f64> = (0..n).map(|i| 1000.0 + i as f64 * 97.3).collect();
    let stations = StationSeries::new(md.clone(), vec![37.0; n], vec![212.0; n]);
    let out = minimum_curvature(&stations, StartPoint::default()).unwrap();

    let (inc, azi) = (37.0_f64.to_radians(), 212.0_f64.to_radians());
    for i in 0..n {
        let along = md[i] - md[0];
        assert!((out.northing[i] - along * inc.sin() * azi.cos()).abs() < EPS);
        assert!((out.easting[i] - along * inc.sin() * azi.sin()).abs() < EPS);
        assert!((out.tvd[i] - along * inc.cos()).abs() < EPS);
    }
    assert!(out.segments.dls.iter().all(|d| d.abs() < EPS));
    assert!(out.segments.turn_rate.iter().all(|t| t.abs() < EPS));
}

// ============================================================================
// Local consistency
// ============================================================================

#[test]
fn re_tying_mid_survey_reproduces_positions() {
    let input = s_curve();
    let full = calculate(&input, Some(0.0)).unwrap();

    for k in [3, 7, 12] {
        let tie = TieOn {
            md: full.md[k],
            inc: full.inc[k],
            azi: full.azi[k],
            tvd: full.tvd[k],
            northing: full.northing[k],
            easting: full.easting[k],
        };
        let tail = StationSeries::new(
            full.md[k..].to_vec(),
            full.inc[k..].to_vec(),
            full.azi[k..].to_vec(),
        );
        let sub = calculate(&SurveyInput::new(tail, tie), Some(0.0)).unwrap();

        for j in 0..sub.len() {
            assert!((sub.northing[j] - full.northing[k + j]).abs() < EPS, "k={k} j={j}");
            assert!((sub.easting[j] - full.easting[k + j]).abs() < EPS, "k={k} j={j}");
            assert!((sub.tvd[j] - full.tvd[k + j]).abs() < EPS, "k={k} j={j}");
        }
        // segment metrics away from the padded first station agree too
        for j in 1..sub.len() {
            assert!((sub.dls[j] - full.dls[k + j]).abs() < EPS);
        }
    }
}

// ============================================================================
// Reference scenario
// ============================================================================

#[test]
fn three_station_build_and_turn() {
    let input = SurveyInput::new(
        survey(&[0.0, 100.0, 200.0], &[0.0, 5.0, 10.0], &[0.0, 45.0, 90.0]),
        TieOn::surface(),
    );
    let calc = calculate(&input, None).unwrap();

    assert_eq!(calc.len(), 3);
    for w in calc.tvd.windows(2) {
        assert!(w[1] > w[0]);
    }
    let horizontal: Vec<f64> = calc
        .northing
        .iter()
        .zip(&calc.easting)
        .map(|(n, e)| n.hypot(*e))
        .collect();
    assert!(horizontal[0] < horizontal[1] && horizontal[1] < horizontal[2]);
    assert!(calc.northing[2] > 0.0 && calc.easting[2] > 0.0);
    assert!(calc.dls[2] > 0.0);
    assert_eq!(calc.dls[0], 0.0);
    assert_eq!(calc.dls.len(), calc.len());
    assert_eq!(calc.segments.len(), 2);
}

#[test]
fn every_channel_has_station_length() {
    let calc = calculate(&s_curve(), None).unwrap();
    let n = calc.len();
    for (name, len) in calc.channel_lengths() {
        assert_eq!(len, n, "{name}");
    }
    for v in [
        &calc.dls,
        &calc.build_rate,
        &calc.turn_rate,
        &calc.vertical_section,
        &calc.closure_distance,
        &calc.closure_direction,
    ] {
        assert_eq!(v.len(), n);
    }
}

#[test]
fn turn_rate_takes_the_short_way_through_north() {
    let calc = calculate(&s_curve(), None).unwrap();
    // 349 -> 358 -> 6: both turns are small and to the right
    assert!(calc.turn_rate[6] > 0.0 && calc.turn_rate[6] < 5.0);
    assert!(calc.turn_rate[7] > 0.0 && calc.turn_rate[7] < 5.0);
}

// ============================================================================
// Tie-on handling
// ============================================================================

#[test]
fn tie_on_above_first_station_is_integrated() {
    let tie = TieOn {
        md: 500.0,
        tvd: 500.0,
        northing: 10.0,
        easting: -4.0,
        ..TieOn::default()
    };
    let input = SurveyInput::new(survey(&[600.0, 700.0], &[0.0, 0.0], &[0.0, 0.0]), tie);
    let calc = calculate(&input, None).unwrap();
    assert!((calc.tvd[0] - 600.0).abs() < EPS);
    assert!((calc.northing[1] - 10.0).abs() < EPS);
    assert!((calc.easting[1] + 4.0).abs() < EPS);
    assert_eq!(calc.dls.len(), 2);
}

#[test]
fn first_station_above_tie_on_is_rejected() {
    let tie = TieOn { md: 500.0, ..TieOn::default() };
    let input = SurveyInput::new(survey(&[400.0, 600.0], &[0.0, 0.0], &[0.0, 0.0]), tie);
    assert_eq!(
        calculate(&input, None).unwrap_err().kind(),
        ErrorKind::InvalidSurveyData
    );
}

#[test]
fn missing_tie_on_is_insufficient_data() {
    let input = SurveyInput {
        stations: survey(&[0.0, 100.0], &[0.0, 1.0], &[0.0, 0.0]),
        tie_on: None,
        location: None,
    };
    assert_eq!(
        calculate(&input, None).unwrap_err().kind(),
        ErrorKind::InsufficientData
    );
    assert_eq!(
        calculate_bhc(&input).unwrap_err().kind(),
        ErrorKind::InsufficientData
    );
}

#[test]
fn kernel_failures_carry_context() {
    let input = SurveyInput::new(
        survey(&[0.0, 100.0, 100.0], &[0.0, 1.0, 2.0], &[0.0; 3]),
        TieOn::surface(),
    );
    let err = calculate(&input, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Calculation);
    assert!(err.to_string().contains("strictly increasing"), "{err}");
}

#[test]
fn location_defaults_to_neutral_reference() {
    let calc = calculate(&s_curve(), None).unwrap();
    assert_eq!(calc.location, Location::default());
    assert_eq!(calc.location.geodetic_system, "WGS84");
}

// ============================================================================
// Vertical section / BHC
// ============================================================================

#[test]
fn vertical_section_defaults_to_tie_on_azimuth() {
    let mut input = s_curve();
    input.tie_on = Some(TieOn { azi: 45.0, ..TieOn::surface() });
    let calc = calculate(&input, None).unwrap();
    assert_eq!(calc.vertical_section_azimuth, 45.0);
    assert_eq!(calc.azimuth_source, VsAzimuthSource::TieOn);

    let dir = 45.0_f64.to_radians();
    let last = calc.len() - 1;
    let expected = calc.northing[last] * dir.cos() + calc.easting[last] * dir.sin();
    assert!((calc.vertical_section[last] - expected).abs() < EPS);
}

#[test]
fn bhc_is_a_fixed_point() {
    let input = s_curve();
    let bhc = calculate_bhc(&input).unwrap();
    let again = calculate(&input, Some(bhc.vertical_section_azimuth)).unwrap();
    let (a, b) = (
        bhc.bottom_hole_closure_direction().unwrap(),
        again.bottom_hole_closure_direction().unwrap(),
    );
    assert!((a - b).abs() < 1e-12);
    assert!((bhc.vertical_section_azimuth - a).abs() < 1e-12);
}
