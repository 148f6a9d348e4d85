use crate::types::{EPS, StockItem};

/// Outcome of one combination search. Infeasibility and budget exhaustion
/// are ordinary outcomes, not errors; the depletion loop treats both as
/// "nothing found for this attempt".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Candidate),
    NotFound,
    BudgetExceeded,
}

/// Best feasible combination for one target against an inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Piece count per stock item, parallel to the full inventory.
    pub counts: Vec<u32>,
    pub combined_length: f64,
    /// Signed delta: combined_length - target.
    pub waste: f64,
}

impl Candidate {
    pub fn piece_count(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Finds the best feasible combination of stock pieces whose summed length
/// falls within `[target·(1−tolerance), target·(1+tolerance)]`.
///
/// Enumerates piece counts per stock item depth-first, pruning branches that
/// overshoot the upper bound, exceed the piece cap, or can no longer reach
/// the lower bound. Among feasible leaves the ranking is deterministic:
/// smallest |waste|, then fewest pieces, then longest pieces first, then
/// lexicographically smallest count vector.
///
/// `budget` caps the number of nodes visited; exhausting it abandons the
/// attempt entirely so the result never depends on where the budget fell.
pub fn find_best_combination(
    stock: &[StockItem],
    target: f64,
    tolerance: f64,
    budget: u64,
) -> SearchOutcome {
    let lower = target * (1.0 - tolerance);
    let upper = target * (1.0 + tolerance);

    // Items with no pieces left are out of the search space for this call.
    let items: Vec<(usize, f64, u32)> = stock
        .iter()
        .enumerate()
        .filter(|(_, s)| s.available > 0)
        .map(|(i, s)| (i, s.length, s.available))
        .collect();
    if items.is_empty() {
        return SearchOutcome::NotFound;
    }

    let min_length = items
        .iter()
        .map(|&(_, len, _)| len)
        .fold(f64::INFINITY, f64::min);
    let piece_cap = ((upper + EPS) / min_length).ceil().max(1.0) as u32;

    // suffix_max[i] = the most length items[i..] can still contribute,
    // used to prune branches that can no longer reach the lower bound.
    let mut suffix_max = vec![0.0; items.len() + 1];
    for i in (0..items.len()).rev() {
        let (_, len, avail) = items[i];
        suffix_max[i] = suffix_max[i + 1] + len * avail as f64;
    }

    let mut dfs = Dfs {
        items: &items,
        target,
        lower,
        upper,
        piece_cap,
        suffix_max,
        budget,
        exhausted: false,
        counts: vec![0; items.len()],
        best: None,
    };
    dfs.recurse(0, 0.0, 0);

    if dfs.exhausted {
        return SearchOutcome::BudgetExceeded;
    }
    match dfs.best {
        Some(found) => {
            let mut counts = vec![0u32; stock.len()];
            for (slot, &(idx, _, _)) in found.counts.iter().zip(&items) {
                counts[idx] = *slot;
            }
            SearchOutcome::Found(Candidate {
                counts,
                combined_length: found.combined_length,
                waste: found.combined_length - target,
            })
        }
        None => SearchOutcome::NotFound,
    }
}

/// A feasible leaf kept during the search, with the fields the ranking needs.
#[derive(Debug, Clone)]
struct Found {
    counts: Vec<u32>,
    combined_length: f64,
    pieces: u32,
    /// Used piece lengths, multiplicity included, sorted descending.
    lengths_desc: Vec<f64>,
}

struct Dfs<'a> {
    items: &'a [(usize, f64, u32)],
    target: f64,
    lower: f64,
    upper: f64,
    piece_cap: u32,
    suffix_max: Vec<f64>,
    budget: u64,
    exhausted: bool,
    counts: Vec<u32>,
    best: Option<Found>,
}

impl Dfs<'_> {
    fn recurse(&mut self, idx: usize, sum: f64, pieces: u32) {
        if self.exhausted {
            return;
        }
        if self.budget == 0 {
            self.exhausted = true;
            return;
        }
        self.budget -= 1;

        if idx == self.items.len() {
            // The empty multiset is never a combination, even when the
            // lower bound is zero (tolerance == 1).
            if pieces > 0 && sum >= self.lower - EPS {
                self.consider_leaf(sum, pieces);
            }
            return;
        }

        // This branch can no longer reach the lower bound.
        if sum + self.suffix_max[idx] < self.lower - EPS {
            return;
        }

        let (_, length, available) = self.items[idx];
        let by_length = ((self.upper + EPS - sum) / length).floor().max(0.0) as u32;
        let by_pieces = self.piece_cap - pieces;
        let cap = available.min(by_length).min(by_pieces);

        for count in 0..=cap {
            self.counts[idx] = count;
            self.recurse(idx + 1, sum + count as f64 * length, pieces + count);
            if self.exhausted {
                return;
            }
        }
        self.counts[idx] = 0;
    }

    fn consider_leaf(&mut self, sum: f64, pieces: u32) {
        let mut lengths_desc = Vec::with_capacity(pieces as usize);
        for (&count, &(_, length, _)) in self.counts.iter().zip(self.items) {
            for _ in 0..count {
                lengths_desc.push(length);
            }
        }
        lengths_desc.sort_by(|a, b| b.partial_cmp(a).unwrap());

        let leaf = Found {
            counts: self.counts.clone(),
            combined_length: sum,
            pieces,
            lengths_desc,
        };
        let replace = match &self.best {
            Some(best) => ranks_higher(&leaf, best, self.target),
            None => true,
        };
        if replace {
            self.best = Some(leaf);
        }
    }
}

/// True when `a` outranks `b`. On a full tie `b` (found earlier) is kept;
/// enumeration order makes the earlier leaf the lexicographically smallest
/// count vector.
fn ranks_higher(a: &Found, b: &Found, target: f64) -> bool {
    let a_waste = (a.combined_length - target).abs();
    let b_waste = (b.combined_length - target).abs();
    if (a_waste - b_waste).abs() > EPS {
        return a_waste < b_waste;
    }
    if a.pieces != b.pieces {
        return a.pieces < b.pieces;
    }
    // Equal piece counts, so the length vectors have equal length.
    for (la, lb) in a.lengths_desc.iter().zip(&b.lengths_desc) {
        if (la - lb).abs() > EPS {
            return la > lb;
        }
    }
    false
}
