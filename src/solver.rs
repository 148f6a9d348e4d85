use crate::search::{SearchOutcome, find_best_combination};
use crate::types::{
    Combination, DiameterResult, EPS, EngineError, SolverConfig, StockItem,
};

/// Solves one diameter's cutting-stock problem: validates the input, runs
/// the depletion loop against a private copy of the inventory, and rolls the
/// applied combinations up into weight metrics.
pub struct Solver {
    diameter: f64,
    tolerance: f64,
    stock: Vec<StockItem>,
    targets: Vec<f64>,
    config: SolverConfig,
}

impl Solver {
    pub fn new(diameter: f64, tolerance: f64, stock: Vec<StockItem>, targets: Vec<f64>) -> Self {
        Self::with_config(diameter, tolerance, stock, targets, SolverConfig::default())
    }

    pub fn with_config(
        diameter: f64,
        tolerance: f64,
        stock: Vec<StockItem>,
        targets: Vec<f64>,
        config: SolverConfig,
    ) -> Self {
        Self {
            diameter,
            tolerance,
            stock,
            targets,
            config,
        }
    }

    pub fn solve(&self) -> Result<DiameterResult, EngineError> {
        self.validate()?;

        let mut stock = self.stock.clone();
        let results = self.deplete(&mut stock);
        Ok(self.aggregate(results, stock))
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.diameter <= 0.0 {
            return Err(EngineError::InvalidDiameter(self.diameter));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(EngineError::InvalidTolerance(self.tolerance));
        }
        if self.stock.is_empty() {
            return Err(EngineError::EmptyStock);
        }
        if self.targets.is_empty() {
            return Err(EngineError::EmptyTargets);
        }
        for item in &self.stock {
            if item.length <= 0.0 {
                return Err(EngineError::InvalidStockLength(item.length));
            }
        }
        for (i, a) in self.stock.iter().enumerate() {
            if self.stock[..i].iter().any(|b| (a.length - b.length).abs() < EPS) {
                return Err(EngineError::DuplicateStockLength(a.length));
            }
        }
        for &target in &self.targets {
            if target <= 0.0 {
                return Err(EngineError::InvalidTargetLength(target));
            }
        }
        Ok(())
    }

    /// Round-robin over the target list, applying the best combination per
    /// target and decrementing the inventory, until a full pass applies
    /// nothing or the inventory is empty. The no-progress guard is what
    /// terminates the loop when stock remains but no target is feasible.
    fn deplete(&self, stock: &mut [StockItem]) -> Vec<Combination> {
        let mut results = Vec::new();

        loop {
            let mut progressed = false;

            for &target in &self.targets {
                if stock.iter().all(|s| s.available == 0) {
                    return results;
                }
                let found = match find_best_combination(
                    stock,
                    target,
                    self.tolerance,
                    self.config.search_budget,
                ) {
                    SearchOutcome::Found(c) => c,
                    // Infeasible for this attempt: skip to the next target
                    // without consuming inventory.
                    SearchOutcome::NotFound | SearchOutcome::BudgetExceeded => continue,
                };

                // Repeat the same pattern until its limiting piece runs out.
                let quantity = found
                    .counts
                    .iter()
                    .zip(stock.iter())
                    .filter(|&(&count, _)| count > 0)
                    .map(|(&count, item)| item.available / count)
                    .min()
                    .unwrap_or(0);
                debug_assert!(quantity >= 1, "search returned an unapplicable combination");

                for (&count, item) in found.counts.iter().zip(stock.iter_mut()) {
                    item.available -= count * quantity;
                }

                let lengths = found
                    .counts
                    .iter()
                    .zip(stock.iter())
                    .filter(|&(&count, _)| count > 0)
                    .map(|(_, item)| item.length)
                    .collect();

                results.push(Combination {
                    quantity,
                    combination: found.counts,
                    lengths,
                    combined_length: found.combined_length,
                    target,
                    waste: found.waste,
                    remaining_pieces: stock.iter().map(|s| s.available).collect(),
                });
                progressed = true;
            }

            if !progressed {
                return results;
            }
        }
    }

    fn aggregate(&self, results: Vec<Combination>, stock: Vec<StockItem>) -> DiameterResult {
        let weight = self.config.weight.weight_per_meter(self.diameter);

        let utilized_length: f64 = results.iter().map(|r| r.target * r.quantity as f64).sum();
        let commercial_length: f64 = results
            .iter()
            .map(|r| r.combined_length * r.quantity as f64)
            .sum();

        let total_utilized_weight = utilized_length * weight;
        let total_commercial_weight = commercial_length * weight;
        // Single derivation path keeps the weight identity exact.
        let total_waste_weight = total_commercial_weight - total_utilized_weight;
        let total_waste_percentage = if total_commercial_weight == 0.0 {
            0.0
        } else {
            100.0 * total_waste_weight / total_commercial_weight
        };

        DiameterResult {
            diameter: self.diameter,
            results,
            remaining_stock: stock,
            total_waste_percentage,
            total_utilized_weight,
            total_commercial_weight,
            total_waste_weight,
        }
    }
}
