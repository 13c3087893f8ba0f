//! Plain-text reports.
//!
//! Rendering only formats values already in the report; nothing is
//! recomputed. Temperatures are shown with 1 decimal, fluxes with 3 and
//! money with 2.

use chrono::{DateTime, Utc};
use tc_core::round_to;

use crate::condensation::CondensationReport;
use crate::heat_loss::HeatLossReport;
use crate::request::GeometryKind;
use crate::sweep::SweepReport;

fn geometry_line(geometry: GeometryKind, pipe_diameter: Option<f64>) -> String {
    match (geometry, pipe_diameter) {
        (GeometryKind::Pipe, Some(d)) => format!("Geometry:              pipe, {d} mm outer diameter"),
        (GeometryKind::Pipe, None) => "Geometry:              pipe".to_string(),
        (GeometryKind::Flat, _) => "Geometry:              flat surface".to_string(),
    }
}

fn header(title: &str, generated_at: DateTime<Utc>) -> Vec<String> {
    vec![
        title.to_string(),
        "=".repeat(title.chars().count()),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
    ]
}

pub fn render_heat_loss_text(report: &HeatLossReport, generated_at: DateTime<Utc>) -> String {
    let mut lines = header("Thermal insulation report", generated_at);

    lines.push(format!("Material:              {}", report.material));
    lines.push(format!(
        "Finish:                {} (emissivity {})",
        report.finish, report.emissivity
    ));
    lines.push(geometry_line(report.geometry, report.pipe_diameter));
    lines.push(format!(
        "Hot face / ambient:    {:.1} °C / {:.1} °C",
        report.hot_temperature, report.ambient_temperature
    ));
    if report.wind_speed > 0.0 {
        lines.push(format!("Wind speed:            {:.1} m/s", report.wind_speed));
    }
    let layers: Vec<String> = report
        .layer_thicknesses
        .iter()
        .map(|t| format!("{t} mm"))
        .collect();
    lines.push(format!(
        "Layers:                {} (total {} mm)",
        layers.join(" + "),
        report.total_thickness
    ));
    if !report.layer_diameters.is_empty() {
        let diameters: Vec<String> = report
            .layer_diameters
            .iter()
            .map(|d| format!("{:.1}", d))
            .collect();
        lines.push(format!("Layer diameters:       {} mm", diameters.join(" / ")));
    }

    lines.push(String::new());
    lines.push("Results".to_string());
    lines.push("-------".to_string());
    lines.push(format!(
        "Surface temperature:   {:.1} °C",
        round_to(report.surface_temperature, 1)
    ));
    lines.push(format!(
        "Loss with insulation:  {:.3} kW/m²",
        round_to(report.heat_loss_with_insulation, 3)
    ));
    lines.push(format!(
        "Loss bare surface:     {:.3} kW/m²",
        round_to(report.heat_loss_without_insulation, 3)
    ));
    lines.push(format!(
        "Loss reduction:        {:.1} %",
        round_to(report.reduction_percent, 1)
    ));
    if !report.layer_temperatures.is_empty() {
        let temps: Vec<String> = report
            .layer_temperatures
            .iter()
            .map(|t| format!("{:.1} °C", round_to(*t, 1)))
            .collect();
        lines.push(format!("Layer interfaces:      {}", temps.join(", ")));
    }

    if let Some(check) = &report.condensation {
        lines.push(String::new());
        lines.push("Condensation".to_string());
        lines.push("------------".to_string());
        lines.push(format!(
            "Dew point:             {:.1} °C at {} % RH",
            round_to(check.dew_point, 1),
            check.relative_humidity
        ));
        lines.push(format!(
            "Surface clears dew point by {} K: {}",
            check.margin,
            if check.surface_clears { "yes" } else { "no" }
        ));
    }

    if let Some(savings) = &report.savings {
        lines.push(String::new());
        lines.push("Savings".to_string());
        lines.push("-------".to_string());
        lines.push(format!(
            "Fuel:                  {} at {:.2} per unit",
            savings.fuel, savings.unit_cost
        ));
        lines.push(format!(
            "Energy saved:          {:.0} kWh/year",
            savings.kwh_year
        ));
        lines.push(format!(
            "Monthly savings:       {:.2}",
            round_to(savings.monthly_savings, 2)
        ));
        lines.push(format!(
            "Annual savings:        {:.2}",
            round_to(savings.annual_savings, 2)
        ));
        lines.push(format!(
            "CO2 avoided:           {:.2} t/year",
            round_to(savings.co2_tonnes_year, 2)
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

pub fn render_condensation_text(report: &CondensationReport, generated_at: DateTime<Utc>) -> String {
    let mut lines = header("Condensation control report", generated_at);

    lines.push(format!("Material:              {}", report.material));
    lines.push(geometry_line(report.geometry, report.pipe_diameter));
    lines.push(format!(
        "Internal / ambient:    {:.1} °C / {:.1} °C",
        report.internal_temperature, report.ambient_temperature
    ));
    lines.push(format!(
        "Relative humidity:     {} %",
        report.relative_humidity
    ));
    if report.wind_speed > 0.0 {
        lines.push(format!("Wind speed:            {:.1} m/s", report.wind_speed));
    }
    lines.push(String::new());
    lines.push(format!(
        "Dew point:             {:.1} °C",
        round_to(report.dew_point, 1)
    ));
    lines.push(format!("Required clearance:    {} K", report.margin));
    lines.push(format!("Minimum thickness:     {} mm", report.min_thickness));
    lines.push(format!(
        "Surface temperature:   {:.1} °C",
        round_to(report.surface_temperature, 1)
    ));
    lines.push(String::new());
    lines.join("\n")
}

pub fn render_sweep_text(report: &SweepReport) -> String {
    let mut lines = vec![
        format!(
            "{} / {}: {:.1} °C to {:.1} °C ambient",
            report.material, report.finish, report.hot_temperature, report.ambient_temperature
        ),
        format!("{:>12}  {:>12}  {:>12}", "thickness mm", "surface °C", "loss kW/m²"),
    ];
    for row in &report.rows {
        match (row.surface_temperature, row.heat_loss) {
            (Some(t), Some(q)) => lines.push(format!(
                "{:>12.1}  {:>12.1}  {:>12.3}",
                row.thickness_mm, t, q
            )),
            _ => lines.push(format!(
                "{:>12.1}  {}",
                row.thickness_mm,
                row.error.as_deref().unwrap_or("no result")
            )),
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MarginPolicy;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn condensation_report_text() {
        let report = CondensationReport {
            material: "Elastomeric Foam 50 kg/m³".into(),
            geometry: GeometryKind::Pipe,
            pipe_diameter: Some(88.9),
            internal_temperature: 5.0,
            ambient_temperature: 30.0,
            relative_humidity: 80.0,
            wind_speed: 0.0,
            dew_point: 26.1647,
            margin_policy: MarginPolicy::HeatLoss,
            margin: 2.0,
            min_thickness: 23,
            surface_temperature: 26.2391,
        };
        let text = render_condensation_text(&report, timestamp());
        assert!(text.contains("Generated: 2026-03-14 09:30:00 UTC"));
        assert!(text.contains("Dew point:             26.2 °C"));
        assert!(text.contains("Required clearance:    2 K"));
        assert!(text.contains("Minimum thickness:     23 mm"));
        assert!(text.contains("pipe, 88.9 mm"));
        assert!(!text.contains("Wind speed"));
    }

    #[test]
    fn sweep_rows_show_failures() {
        let report = SweepReport {
            material: "m".into(),
            finish: "f".into(),
            hot_temperature: 200.0,
            ambient_temperature: 25.0,
            rows: vec![
                crate::sweep::SweepRow {
                    thickness_mm: 10.0,
                    surface_temperature: Some(80.04),
                    heat_loss: Some(0.41234),
                    error: None,
                },
                crate::sweep::SweepRow {
                    thickness_mm: 20.0,
                    surface_temperature: None,
                    heat_loss: None,
                    error: Some("did not converge".into()),
                },
            ],
        };
        let text = render_sweep_text(&report);
        assert!(text.contains("80.0"));
        assert!(text.contains("0.412"));
        assert!(text.contains("did not converge"));
    }
}
