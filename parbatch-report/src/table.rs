//! Table Formatting
//!
//! Terminal-friendly rendering of scored batches: a three-column table
//! (label, sub-label, score) for heterogeneous batches and a per-fold
//! listing with the average for homogeneous batches.

use crate::report::ScoreRow;

const RULE_WIDTH: usize = 53;

/// Format a three-column score table.
///
/// One line per row with a left-padded label and sub-label and the score
/// printed to three decimals; failed rows print a dash in the score column.
pub fn format_score_table(title: &str, rows: &[ScoreRow]) -> String {
    let mut output = String::new();

    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<20} {:<15} {:>12}\n",
        "Label", "Method", "Score"
    ));
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');

    for row in rows {
        match row.score {
            Some(score) => output.push_str(&format!(
                "{:<20} {:<15} {:>12.3}\n",
                row.label, row.detail, score
            )),
            None => output.push_str(&format!(
                "{:<20} {:<15} {:>12}\n",
                row.label, row.detail, "-"
            )),
        }
    }

    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    output
}

/// Format a per-fold score listing followed by the average.
///
/// `scores[i]` is the score of fold `i`, `None` for a failed fold. The
/// average covers successful folds only; with no successful fold the
/// average line reports "n/a".
pub fn format_fold_listing(scores: &[Option<f64>], mean: Option<f64>) -> String {
    let mut output = String::new();

    for (fold, score) in scores.iter().enumerate() {
        match score {
            Some(score) => output.push_str(&format!("Fold {:>3} score : {:.6}\n", fold, score)),
            None => output.push_str(&format!("Fold {:>3} score : failed\n", fold)),
        }
    }

    match mean {
        Some(mean) => output.push_str(&format!("Average score : {:.6}\n", mean)),
        None => output.push_str("Average score : n/a\n"),
    }

    output
}
