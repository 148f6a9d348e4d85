use crate::types::Combination;

const MAX_WIDTH: f64 = 72.0;

/// Renders one combination as a proportional segment bar, e.g.
/// `|==== 6 ====|== 4 ==|`.
pub fn render_plan(combination: &Combination) -> String {
    let pieces = expand_pieces(combination);
    if pieces.is_empty() || combination.combined_length <= 0.0 {
        return String::new();
    }

    let scale = MAX_WIDTH / combination.combined_length;
    let mut out = String::from("|");
    for length in pieces {
        out.push_str(&segment(length, scale));
        out.push('|');
    }
    out.push('\n');
    out
}

/// Piece lengths with multiplicity, in inventory order.
fn expand_pieces(combination: &Combination) -> Vec<f64> {
    let mut pieces = Vec::new();
    let mut li = 0;
    for &count in &combination.combination {
        if count == 0 {
            continue;
        }
        for _ in 0..count {
            pieces.push(combination.lengths[li]);
        }
        li += 1;
    }
    pieces
}

fn segment(length: f64, scale: f64) -> String {
    let label = format!(" {length} ");
    let width = ((length * scale).round() as usize).max(label.len());
    let mut cells = vec!['='; width];

    let start = (width - label.len()) / 2;
    for (i, ch) in label.chars().enumerate() {
        cells[start + i] = ch;
    }
    cells.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(counts: Vec<u32>, lengths: Vec<f64>, combined: f64) -> Combination {
        Combination {
            quantity: 1,
            combination: counts,
            lengths,
            combined_length: combined,
            target: combined,
            waste: 0.0,
            remaining_pieces: vec![],
        }
    }

    #[test]
    fn test_segment_per_piece() {
        let plan = render_plan(&combo(vec![1, 1], vec![6.0, 4.0], 10.0));
        assert!(plan.starts_with('|'));
        assert!(plan.contains(" 6 "));
        assert!(plan.contains(" 4 "));
        // Two segments means three separators.
        assert_eq!(plan.matches('|').count(), 3);
    }

    #[test]
    fn test_multiplicity_repeats_segments() {
        let plan = render_plan(&combo(vec![3], vec![2.0], 6.0));
        assert_eq!(plan.matches(" 2 ").count(), 3);
    }

    #[test]
    fn test_empty_combination() {
        assert_eq!(render_plan(&combo(vec![0], vec![], 0.0)), "");
    }
}
