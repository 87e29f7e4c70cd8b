//! Prompt texts for the two generation calls.

use std::fmt::Write;

use crate::bundle::Bundle;

/// System framing sent first with every generation call.
pub const SYSTEM_PROMPT: &str = "You are a PC building assistant. \
Given a purchase request and a budget, choose one concrete, currently sold product for each \
of these categories: CPU, GPU, Motherboard, RAM, PSU, CPU Cooler, FAN, PC case. \
Make sure the parts are compatible (socket, memory type, form factor, power) and that the \
total price stays close to the budget. \
Answer with a single JSON object whose keys are exactly those category labels and whose \
values are product names as they would appear in a store search, for example \
{\"CPU\": \"AMD Ryzen 5 7600\", \"GPU\": \"MSI GeForce RTX 4060 VENTUS 2X\", ...}. \
When asked to revise a selection, answer with a JSON object containing only the categories \
you want to replace.";

/// User message of the first call.
pub fn initial_request(prompt: &str, budget: u64) -> String {
    format!(
        "{}\n\nBudget: {}. Keep the total within 10% of the budget.",
        prompt.trim(),
        budget
    )
}

/// User message of the adjustment call: what is missing, what was picked, and how far the
/// total is from the budget.
pub fn adjustment_feedback(bundle: &Bundle, budget: u64) -> String {
    let missing = bundle.missing();
    let mut out = String::from("The previous selection could not be bought as proposed.\n");

    if missing.is_empty() {
        out.push_str("Missing categories: none.\n");
    } else {
        let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        let _ = writeln!(
            out,
            "Missing categories (not found on the marketplace): {}.",
            labels.join(", ")
        );
    }

    out.push_str("Currently selected:\n");
    let mut any = false;
    for (category, listing) in bundle.resolved() {
        any = true;
        let _ = writeln!(out, "- {}: {} ({})", category, listing.name, listing.price);
    }
    if !any {
        out.push_str("- nothing\n");
    }

    let _ = writeln!(
        out,
        "Current total: {}. Target budget: {}.",
        bundle.total(),
        budget
    );
    out.push_str(
        "Replace the missing parts and adjust others so the total lands within 10% of the \
         budget. Reply with a JSON object mapping only the categories you change to new \
         product names.",
    );
    out
}
