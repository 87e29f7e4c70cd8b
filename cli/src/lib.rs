//! Output formatting for the `rigsmith build` command.

use rigsmith::{BuildOutcome, Category};

/// Plain-text report: one line per category, then total, budget and deviation, then the
/// provider narration.
pub fn format_outcome(outcome: &BuildOutcome) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        if !outcome.bundle.contains(category) {
            continue;
        }
        match outcome.bundle.get(category) {
            Some(listing) => lines.push(format!(
                "{:<12} {:>10}  {}  {}",
                category.label(),
                listing.price,
                listing.name,
                listing.url
            )),
            None => lines.push(format!("{:<12} {:>10}  (not found)", category.label(), "-")),
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "total {} / budget {} (deviation {:.1}%){}",
        outcome.bundle.total(),
        outcome.budget,
        outcome.deviation * 100.0,
        if outcome.acceptable { "" } else { ", outside tolerance" }
    ));
    if outcome.adjusted {
        lines.push("adjusted once after marketplace feedback".to_string());
    }
    lines.push(String::new());
    lines.push(outcome.narration.trim().to_string());
    lines.join("\n")
}

/// JSON report in the same shape as the HTTP API's success body.
pub fn outcome_json(outcome: &BuildOutcome) -> serde_json::Value {
    serde_json::json!({
        "response": outcome.narration,
        "products": outcome.bundle.products(),
        "missing": outcome.bundle.missing(),
        "total": outcome.bundle.total(),
        "deviation": outcome.deviation,
        "acceptable": outcome.acceptable,
        "adjusted": outcome.adjusted,
    })
}
