#![warn(missing_docs)]

//! Print cost estimation for keyforge.
//!
//! Combines filament length and estimated print time with economic
//! parameters (material price, electricity, depreciation, labor) into a
//! [`CostBreakdown`]. Defaults model a Prusa MK3 printing PLA.
//!
//! Two asymmetries are deliberate:
//!
//! - The cost formulas use the *unmargined* print time, while the reported
//!   duration carries a ×1.5 safety margin. Both values are exposed so
//!   callers can test them independently.
//! - `update_price_per_kg` / `update_electricity_rate` bound any change to
//!   ±50% of the ORIGINAL reference constants, not the last-applied value,
//!   so repeated small updates cannot walk the price arbitrarily far.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// Safety margin applied to the *reported* print duration.
pub const TIME_SAFETY_MARGIN: f64 = 1.5;

/// Reference PLA price used as the anchor for bounded updates (USD/kg).
pub const REFERENCE_PRICE_PER_KG: f64 = 25.0;

/// Reference electricity rate used as the anchor for bounded updates (USD/kWh).
pub const REFERENCE_ELECTRICITY_PER_KWH: f64 = 0.20;

/// Maximum relative deviation from a reference value an update may apply.
const UPDATE_TOLERANCE: f64 = 0.5;

/// Errors for invalid economic parameters.
#[derive(Error, Debug)]
pub enum CostError {
    /// A parameter is out of its valid range.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for cost operations.
pub type Result<T> = std::result::Result<T, CostError>;

/// Economic parameters for the cost model.
///
/// An owned configuration value: each caller receives its own instance and
/// passes it by reference into [`estimate_cost`]. The bounded update
/// methods take `&mut self`; concurrent callers must provide their own
/// synchronization around a shared instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicParameters {
    /// Printer purchase price (USD).
    pub printer_price: f64,
    /// Expected printer lifetime (hours).
    pub depreciation_hours: f64,
    /// Printer power draw (W).
    pub power_w: f64,
    /// Filament density (g/cm³).
    pub density_g_cm3: f64,
    /// Filament price (USD/kg).
    pub price_per_kg: f64,
    /// Filament diameter (mm).
    pub filament_diameter_mm: f64,
    /// Electricity rate (USD/kWh).
    pub electricity_per_kwh: f64,
    /// Labor rate (USD/hour).
    pub labor_per_hour: f64,
}

impl Default for EconomicParameters {
    /// Prusa MK3 printing PLA.
    fn default() -> Self {
        Self {
            printer_price: 750.0,
            depreciation_hours: 10_000.0,
            power_w: 100.0,
            density_g_cm3: 1.24,
            price_per_kg: REFERENCE_PRICE_PER_KG,
            filament_diameter_mm: 1.75,
            electricity_per_kwh: REFERENCE_ELECTRICITY_PER_KWH,
            labor_per_hour: 10.0,
        }
    }
}

/// Outcome of a bounded parameter update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateOutcome {
    /// The new value was applied.
    Applied {
        /// The value that was replaced.
        previous: f64,
    },
    /// The update deviated too far from the reference value; the
    /// configuration is unchanged.
    Rejected {
        /// Human-readable explanation of the rejection.
        reason: String,
    },
}

impl UpdateOutcome {
    /// True if the update was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

impl EconomicParameters {
    /// Validate that all parameters are physically sensible.
    pub fn validate(&self) -> Result<()> {
        if self.depreciation_hours <= 0.0 {
            return Err(CostError::InvalidParameters(
                "depreciation_hours must be positive".into(),
            ));
        }
        if self.filament_diameter_mm <= 0.0 {
            return Err(CostError::InvalidParameters(
                "filament_diameter_mm must be positive".into(),
            ));
        }
        if self.density_g_cm3 <= 0.0 {
            return Err(CostError::InvalidParameters(
                "density_g_cm3 must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Update the filament price, bounded to ±50% of
    /// [`REFERENCE_PRICE_PER_KG`]. Out-of-bounds updates are a no-op.
    pub fn update_price_per_kg(&mut self, new_value: f64) -> UpdateOutcome {
        Self::bounded_update(
            &mut self.price_per_kg,
            new_value,
            REFERENCE_PRICE_PER_KG,
            "price_per_kg",
        )
    }

    /// Update the electricity rate, bounded to ±50% of
    /// [`REFERENCE_ELECTRICITY_PER_KWH`]. Out-of-bounds updates are a no-op.
    pub fn update_electricity_rate(&mut self, new_value: f64) -> UpdateOutcome {
        Self::bounded_update(
            &mut self.electricity_per_kwh,
            new_value,
            REFERENCE_ELECTRICITY_PER_KWH,
            "electricity_per_kwh",
        )
    }

    fn bounded_update(slot: &mut f64, new_value: f64, reference: f64, name: &str) -> UpdateOutcome {
        // The bound is anchored to the original reference, never to the
        // last-applied value.
        if (new_value - reference).abs() > UPDATE_TOLERANCE * reference {
            let reason = format!(
                "{name} update to {new_value} rejected: deviates more than {:.0}% \
                 from the reference value {reference}",
                UPDATE_TOLERANCE * 100.0
            );
            log::warn!("{reason}");
            return UpdateOutcome::Rejected { reason };
        }
        let previous = *slot;
        *slot = new_value;
        UpdateOutcome::Applied { previous }
    }
}

/// Itemized cost of one print job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Filament material cost (USD).
    pub material_cost: f64,
    /// Electricity cost (USD).
    pub electricity_cost: f64,
    /// Printer depreciation cost (USD).
    pub depreciation_cost: f64,
    /// Labor cost (USD).
    pub labor_cost: f64,
    /// Sum of the four components (USD).
    pub total_cost: f64,
    /// Unmargined print time used by the cost formulas (hours).
    pub time_hours: f64,
    /// Reported duration with the ×1.5 safety margin applied (hours).
    pub margined_time_hours: f64,
}

/// Estimate the cost of a print from filament length and print time.
///
/// `time_hours` is the raw kinematic estimate; the returned
/// [`CostBreakdown::margined_time_hours`] multiplies it by
/// [`TIME_SAFETY_MARGIN`] while the cost components use the raw value.
pub fn estimate_cost(
    filament_mm: f64,
    time_hours: f64,
    params: &EconomicParameters,
) -> CostBreakdown {
    let radius_mm = params.filament_diameter_mm / 2.0;
    let volume_mm3 = PI * radius_mm * radius_mm * filament_mm;
    let volume_cm3 = volume_mm3 / 1000.0;
    let weight_kg = volume_cm3 * params.density_g_cm3 / 1000.0;
    let material_cost = weight_kg * params.price_per_kg;

    let electricity_cost = (params.power_w / 1000.0) * time_hours * params.electricity_per_kwh;
    let depreciation_cost = (params.printer_price / params.depreciation_hours) * time_hours;
    let labor_cost = time_hours * params.labor_per_hour;

    CostBreakdown {
        material_cost,
        electricity_cost,
        depreciation_cost,
        labor_cost,
        total_cost: material_cost + electricity_cost + depreciation_cost + labor_cost,
        time_hours,
        margined_time_hours: time_hours * TIME_SAFETY_MARGIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_material_cost_formula() {
        let params = EconomicParameters::default();
        // 1000mm of 1.75mm filament.
        let breakdown = estimate_cost(1000.0, 0.0, &params);
        let expected_volume_cm3 = PI * 0.875 * 0.875 * 1000.0 / 1000.0;
        let expected = expected_volume_cm3 * 1.24 / 1000.0 * 25.0;
        assert_relative_eq!(breakdown.material_cost, expected);
        assert_relative_eq!(breakdown.electricity_cost, 0.0);
    }

    #[test]
    fn test_cost_linear_in_time() {
        let params = EconomicParameters::default();
        let one = estimate_cost(0.0, 1.0, &params);
        let two = estimate_cost(0.0, 2.0, &params);
        assert_relative_eq!(two.electricity_cost, 2.0 * one.electricity_cost);
        assert_relative_eq!(two.depreciation_cost, 2.0 * one.depreciation_cost);
        assert_relative_eq!(two.labor_cost, 2.0 * one.labor_cost);
        assert_relative_eq!(two.total_cost, 2.0 * one.total_cost);
    }

    #[test]
    fn test_cost_linear_in_filament() {
        let params = EconomicParameters::default();
        let one = estimate_cost(500.0, 0.0, &params);
        let two = estimate_cost(1000.0, 0.0, &params);
        assert_relative_eq!(two.material_cost, 2.0 * one.material_cost);
    }

    #[test]
    fn test_doubling_labor_rate_doubles_labor_cost() {
        let params = EconomicParameters::default();
        let doubled = EconomicParameters {
            labor_per_hour: params.labor_per_hour * 2.0,
            ..params.clone()
        };
        let a = estimate_cost(100.0, 2.0, &params);
        let b = estimate_cost(100.0, 2.0, &doubled);
        assert_relative_eq!(b.labor_cost, 2.0 * a.labor_cost);
    }

    #[test]
    fn test_margin_asymmetry_preserved() {
        // Costs use the raw time; only the reported duration is margined.
        let params = EconomicParameters::default();
        let breakdown = estimate_cost(0.0, 2.0, &params);
        assert_relative_eq!(breakdown.time_hours, 2.0);
        assert_relative_eq!(breakdown.margined_time_hours, 3.0);
        assert_relative_eq!(breakdown.labor_cost, 20.0);
    }

    #[test]
    fn test_bounded_update_accepts_within_50_percent() {
        let mut params = EconomicParameters::default();
        let outcome = params.update_price_per_kg(30.0);
        assert!(outcome.is_applied());
        assert_relative_eq!(params.price_per_kg, 30.0);
    }

    #[test]
    fn test_bounded_update_rejects_beyond_50_percent() {
        let mut params = EconomicParameters::default();
        let outcome = params.update_price_per_kg(40.0);
        assert!(!outcome.is_applied());
        assert_relative_eq!(params.price_per_kg, REFERENCE_PRICE_PER_KG);
    }

    #[test]
    fn test_bound_anchored_to_reference_not_current() {
        let mut params = EconomicParameters::default();
        assert!(params.update_price_per_kg(35.0).is_applied());
        // 47 is within 50% of 35 but not of the original 25 — rejected.
        assert!(!params.update_price_per_kg(47.0).is_applied());
        assert_relative_eq!(params.price_per_kg, 35.0);
    }

    #[test]
    fn test_electricity_update_bounds() {
        let mut params = EconomicParameters::default();
        assert!(params.update_electricity_rate(0.25).is_applied());
        assert!(!params.update_electricity_rate(0.50).is_applied());
        assert_relative_eq!(params.electricity_per_kwh, 0.25);
    }

    #[test]
    fn test_validate() {
        let params = EconomicParameters {
            depreciation_hours: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(EconomicParameters::default().validate().is_ok());
    }
}
