use tc_core::units::{degc, mm, mps, percent};
use tc_materials::{Catalog, ConductivityFunction, FormulaError};
use tc_solver::{
    CondensationProblem, DewPointMargin, EquilibriumConfig, EquilibriumProblem, Geometry,
    NonConvergenceReason, SolverError, flux_balance, linear_thicknesses, min_thickness, solve,
    thickness_sweep,
};

fn k(value: f64) -> ConductivityFunction {
    ConductivityFunction::constant(value)
}

#[test]
fn flat_plate_200c_50mm() {
    let problem = EquilibriumProblem::new(degc(200.0), degc(25.0), mm(50.0), Geometry::FlatPlate)
        .with_emissivity(0.9);
    let result = solve(&problem, &k(0.05), &EquilibriumConfig::default()).unwrap();

    assert!(result.converged);
    assert!(result.surface_temperature > 25.0 && result.surface_temperature < 200.0);
    assert!(result.heat_flux > 0.0);

    let balance = flux_balance(&problem, &k(0.05), result.surface_temperature).unwrap();
    assert!(balance.residual.abs() < 0.5);
}

#[test]
fn pipe_88_9mm_uses_logarithmic_conduction() {
    let pipe = Geometry::pipe(mm(88.9)).unwrap();
    let problem = EquilibriumProblem::new(degc(200.0), degc(25.0), mm(50.0), pipe);
    let result = solve(&problem, &k(0.05), &EquilibriumConfig::default()).unwrap();
    assert!(result.surface_temperature > 25.0 && result.surface_temperature < 200.0);

    let balance = flux_balance(&problem, &k(0.05), result.surface_temperature).unwrap();
    let ri: f64 = 0.0889 / 2.0;
    let ro = ri + 0.05;
    let expected = 0.05 * (200.0 - result.surface_temperature) / (ro * (ro / ri).ln());
    assert!((balance.q_conduction - expected).abs() < 1e-9);

    // Same thickness on a flat plate conducts less per unit outer area.
    let flat = solve(
        &EquilibriumProblem::new(degc(200.0), degc(25.0), mm(50.0), Geometry::FlatPlate),
        &k(0.05),
        &EquilibriumConfig::default(),
    )
    .unwrap();
    assert!(result.surface_temperature < flat.surface_temperature);
}

#[test]
fn pipe_without_insulation_thickness_does_not_converge() {
    let pipe = Geometry::pipe(mm(88.9)).unwrap();
    for thickness in [0.0, -5.0] {
        let problem = EquilibriumProblem::new(degc(200.0), degc(25.0), mm(thickness), pipe);
        let err = solve(&problem, &k(0.05), &EquilibriumConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SolverError::NonConvergence {
                reason: NonConvergenceReason::DegenerateShell,
                ..
            }
        ));
    }
}

#[test]
fn zero_pipe_diameter_is_invalid_geometry() {
    let problem = EquilibriumProblem::new(
        degc(200.0),
        degc(25.0),
        mm(50.0),
        Geometry::Pipe { diameter: 0.0 },
    );
    assert!(matches!(
        solve(&problem, &k(0.05), &EquilibriumConfig::default()),
        Err(SolverError::InvalidGeometry { .. })
    ));
}

#[test]
fn disallowed_identifier_is_a_formula_error() {
    let err = ConductivityFunction::parse("__import__(T)").unwrap_err();
    assert!(matches!(
        err,
        FormulaError::UnknownIdentifier { .. } | FormulaError::UnknownFunction { .. }
    ));
    assert!(ConductivityFunction::parse("0.05 + x").is_err());
    assert!(ConductivityFunction::parse("__import__('os').system('ls')").is_err());
}

#[test]
fn wind_cools_the_surface() {
    let base = EquilibriumProblem::new(degc(200.0), degc(25.0), mm(50.0), Geometry::FlatPlate);
    let still = solve(&base, &k(0.05), &EquilibriumConfig::default()).unwrap();
    let windy = solve(&base.with_wind(mps(5.0)), &k(0.05), &EquilibriumConfig::default()).unwrap();
    assert!(windy.surface_temperature < still.surface_temperature);
}

#[test]
fn surface_temperature_falls_with_thickness_for_hot_process() {
    let catalog = Catalog::builtin().unwrap();
    let material = catalog.require_material("Rock Wool 64 kg/m³").unwrap();
    let problem = EquilibriumProblem::new(degc(300.0), degc(25.0), mm(10.0), Geometry::FlatPlate);
    let thicknesses = linear_thicknesses(0.01, 0.2, 20).unwrap();
    let points = thickness_sweep(
        &problem,
        &material.conductivity,
        &thicknesses,
        &EquilibriumConfig::default(),
    );

    let temps: Vec<f64> = points
        .iter()
        .map(|p| p.converged().unwrap().surface_temperature)
        .collect();
    for pair in temps.windows(2) {
        assert!(pair[1] < pair[0], "not decreasing: {temps:?}");
    }
}

#[test]
fn dew_point_scenario_and_both_margins() {
    let problem = CondensationProblem::new(degc(5.0), degc(30.0), Geometry::FlatPlate, percent(80.0));
    let config = EquilibriumConfig::default();

    let exact = min_thickness(&problem, &k(0.04), &config).unwrap();
    assert!((exact.dew_point - 26.2).abs() < 0.05);
    assert!(exact.surface_temperature >= exact.dew_point);

    let margin = min_thickness(
        &problem.with_margin(DewPointMargin::HEAT_LOSS),
        &k(0.04),
        &config,
    )
    .unwrap();
    assert!(margin.surface_temperature >= margin.dew_point + 2.0);
    assert!(margin.thickness_mm > exact.thickness_mm);
}

#[test]
fn condensation_acceptance_is_monotone_in_thickness() {
    let problem = CondensationProblem::new(degc(2.0), degc(30.0), Geometry::FlatPlate, percent(80.0));
    let config = EquilibriumConfig::default();
    let found = min_thickness(&problem, &k(0.04), &config).unwrap();
    let dew = found.dew_point;

    for thickness_mm in found.thickness_mm..found.thickness_mm + 30 {
        let result = solve(&problem.candidate(thickness_mm), &k(0.04), &config).unwrap();
        assert!(result.surface_temperature >= dew, "{thickness_mm} mm rejected");
    }
    if found.thickness_mm > 1 {
        let below = solve(&problem.candidate(found.thickness_mm - 1), &k(0.04), &config).unwrap();
        assert!(below.surface_temperature < dew);
    }
}

#[test]
fn unreachable_dew_point_reports_not_found() {
    // Saturated air: the surface can never reach ambient through finite insulation.
    let problem = CondensationProblem::new(degc(5.0), degc(30.0), Geometry::FlatPlate, percent(100.0))
        .with_max_thickness_mm(50);
    match min_thickness(&problem, &k(0.04), &EquilibriumConfig::default()) {
        Err(SolverError::NotFound { dew_point }) => assert!((dew_point - 30.0).abs() < 1e-9),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
