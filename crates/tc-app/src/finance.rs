//! Energy, money and CO2 saved by insulating.

use serde::{Deserialize, Serialize};
use tc_materials::FuelProfile;

/// Average weeks per month.
const WEEKS_PER_MONTH: f64 = 4.33;

/// Operating schedule of the insulated surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// m²
    pub area: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub fuel: String,
    pub unit_cost: f64,
    /// Power saved over the whole area, kW.
    pub saved_kw: f64,
    pub kwh_month: f64,
    pub kwh_year: f64,
    /// Fuel units saved.
    pub fuel_month: f64,
    pub fuel_year: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Tonnes of CO2 avoided per year.
    pub co2_tonnes_year: f64,
    pub reduction_percent: f64,
}

/// Percentage of the bare loss removed by insulation; 0 when there is no bare loss.
pub fn reduction_percent(loss_with_kw: f64, loss_without_kw: f64) -> f64 {
    if loss_without_kw > 0.0 {
        (loss_without_kw - loss_with_kw) / loss_without_kw * 100.0
    } else {
        0.0
    }
}

/// Savings from per-area losses in kW/m² with and without insulation.
pub fn compute_savings(
    loss_with_kw: f64,
    loss_without_kw: f64,
    fuel: &FuelProfile,
    schedule: &Schedule,
    unit_cost: f64,
) -> Savings {
    let saved_kw = (loss_without_kw - loss_with_kw) * schedule.area;
    let kwh_month = saved_kw * schedule.hours_per_day * schedule.days_per_week * WEEKS_PER_MONTH;
    let kwh_year = kwh_month * 12.0;

    let useful_per_unit = fuel.heating_value_kwh * fuel.efficiency;
    let fuel_month = kwh_month / useful_per_unit;
    let fuel_year = kwh_year / useful_per_unit;

    Savings {
        fuel: fuel.name.clone(),
        unit_cost,
        saved_kw,
        kwh_month,
        kwh_year,
        fuel_month,
        fuel_year,
        monthly_savings: fuel_month * unit_cost,
        annual_savings: fuel_year * unit_cost,
        co2_tonnes_year: fuel_year * fuel.emission_factor_kg / 1000.0,
        reduction_percent: reduction_percent(loss_with_kw, loss_without_kw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas() -> FuelProfile {
        FuelProfile {
            name: "Natural Gas (m³)".into(),
            unit_cost: 3.60,
            heating_value_kwh: 9.65,
            efficiency: 0.75,
            emission_factor_kg: 2.0,
        }
    }

    const SCHEDULE: Schedule = Schedule {
        area: 10.0,
        hours_per_day: 8.0,
        days_per_week: 5.0,
    };

    #[test]
    fn savings_arithmetic() {
        let s = compute_savings(0.1, 1.1, &gas(), &SCHEDULE, 3.60);
        assert!((s.saved_kw - 10.0).abs() < 1e-12);
        assert!((s.kwh_month - 1732.0).abs() < 1e-9);
        assert!((s.kwh_year - 20784.0).abs() < 1e-9);

        let fuel_year = 20784.0 / (9.65 * 0.75);
        assert!((s.fuel_year - fuel_year).abs() < 1e-9);
        assert!((s.annual_savings - fuel_year * 3.60).abs() < 1e-9);
        assert!((s.monthly_savings * 12.0 - s.annual_savings).abs() < 1e-9);
        assert!((s.co2_tonnes_year - fuel_year * 2.0 / 1000.0).abs() < 1e-12);
        assert!((s.reduction_percent - 100.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn unit_cost_override_scales_money_only() {
        let base = compute_savings(0.1, 1.1, &gas(), &SCHEDULE, 3.60);
        let cheap = compute_savings(0.1, 1.1, &gas(), &SCHEDULE, 1.80);
        assert!((cheap.annual_savings * 2.0 - base.annual_savings).abs() < 1e-9);
        assert_eq!(cheap.co2_tonnes_year, base.co2_tonnes_year);
    }

    #[test]
    fn no_bare_loss_means_no_reduction() {
        assert_eq!(reduction_percent(0.0, 0.0), 0.0);
        assert_eq!(reduction_percent(0.1, -0.5), 0.0);
    }
}
