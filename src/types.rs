use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack for float comparisons against the tolerance window, so decimal
/// sums like 0.1 + 0.2 do not fall just outside an inclusive bound.
pub const EPS: f64 = 1e-9;

/// A distinct stock length within one diameter's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Bar length in meters.
    pub length: f64,
    /// Pieces currently available. Depleted in place by the solver.
    #[serde(alias = "pieces", deserialize_with = "deserialize_u32_from_number")]
    pub available: u32,
}

impl StockItem {
    pub fn new(length: f64, available: u32) -> Self {
        Self { length, available }
    }
}

impl std::fmt::Display for StockItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m x{}", self.length, self.available)
    }
}

/// One applied combination: a multiset of stock pieces reproducing a target
/// length, applied `quantity` times before its limiting piece ran out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub quantity: u32,
    /// Piece count per stock item, parallel to the inventory order.
    pub combination: Vec<u32>,
    /// Resolved lengths of the non-zero entries.
    pub lengths: Vec<f64>,
    pub combined_length: f64,
    pub target: f64,
    /// Signed delta: combined_length - target.
    pub waste: f64,
    /// Inventory snapshot after this combination was applied.
    pub remaining_pieces: Vec<u32>,
}

impl Combination {
    /// Total pieces consumed per application.
    pub fn piece_count(&self) -> u32 {
        self.combination.iter().sum()
    }
}

/// Result for one diameter: the ordered applied combinations plus
/// aggregate weight metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterResult {
    pub diameter: f64,
    pub results: Vec<Combination>,
    /// Inventory state after the depletion loop finished.
    pub remaining_stock: Vec<StockItem>,
    pub total_waste_percentage: f64,
    pub total_utilized_weight: f64,
    pub total_commercial_weight: f64,
    pub total_waste_weight: f64,
}

/// Linear-density model for converting bar length to weight.
///
/// Weight per meter is `π/4 · density · (d/1000)²` for a diameter in mm.
/// The density is configurable because it varies by material standard;
/// the default is carbon steel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    /// Material density in kg/m³.
    pub density: f64,
}

impl Default for WeightSpec {
    fn default() -> Self {
        Self { density: 7850.0 }
    }
}

impl WeightSpec {
    /// Weight in kg of one meter of bar with the given diameter in mm.
    pub fn weight_per_meter(&self, diameter_mm: f64) -> f64 {
        std::f64::consts::FRAC_PI_4 * self.density * (diameter_mm / 1000.0).powi(2)
    }
}

/// Tuning knobs for the solver. The defaults suit typical site inventories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub weight: WeightSpec,
    /// Cap on DFS nodes visited per combination search. An attempt that
    /// exhausts the budget is treated as infeasible, not as a fatal error.
    pub search_budget: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            weight: WeightSpec::default(),
            search_budget: 2_000_000,
        }
    }
}

/// Accepts JSON numbers like `100.0` where an integer piece count is
/// expected, since spreadsheet exports routinely emit counts as floats.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "invalid piece count {value}"
        )));
    }
    Ok(value as u32)
}

/// Input rejected before any search begins. Infeasibility is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("diameter must be positive, got {0}")]
    InvalidDiameter(f64),
    #[error("tolerance must be within [0, 1], got {0}")]
    InvalidTolerance(f64),
    #[error("stock list is empty")]
    EmptyStock,
    #[error("target list is empty")]
    EmptyTargets,
    #[error("stock length must be positive, got {0}")]
    InvalidStockLength(f64),
    #[error("target length must be positive, got {0}")]
    InvalidTargetLength(f64),
    #[error("duplicate stock length {0} (merge duplicate entries before calling)")]
    DuplicateStockLength(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_per_meter_16mm() {
        // 16mm carbon steel rebar is ~1.58 kg/m.
        let w = WeightSpec::default().weight_per_meter(16.0);
        assert!((w - 1.578).abs() < 0.01, "got {w}");
    }

    #[test]
    fn test_weight_scales_with_density() {
        let steel = WeightSpec::default();
        let half = WeightSpec { density: 3925.0 };
        let d = 20.0;
        assert!((steel.weight_per_meter(d) - 2.0 * half.weight_per_meter(d)).abs() < EPS);
    }

    #[test]
    fn test_stock_item_accepts_float_piece_count() {
        let item: StockItem = serde_json::from_str(r#"{"length": 12, "pieces": 100.0}"#).unwrap();
        assert_eq!(item, StockItem::new(12.0, 100));

        let bad: Result<StockItem, _> = serde_json::from_str(r#"{"length": 12, "pieces": 1.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_piece_count() {
        let c = Combination {
            quantity: 1,
            combination: vec![2, 0, 1],
            lengths: vec![6.0, 4.0],
            combined_length: 16.0,
            target: 16.0,
            waste: 0.0,
            remaining_pieces: vec![0, 3, 0],
        };
        assert_eq!(c.piece_count(), 3);
    }
}
