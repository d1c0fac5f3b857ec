//! Text rendering of a usage snapshot

use super::record::UsageSnapshot;
use std::fmt::Write;

/// Format a snapshot as a plain-text report
#[must_use]
pub fn format_snapshot(snapshot: &UsageSnapshot) -> String {
    let mut output = String::new();

    output.push_str("Usage Report\n\n");
    let _ = writeln!(
        output,
        "Requests: {} ({} from cache, {:.1}% hit rate)",
        snapshot.total_requests,
        snapshot.cache_hits,
        snapshot.cache_hit_rate * 100.0
    );
    let _ = writeln!(
        output,
        "Tokens: {} input, {} output",
        snapshot.total_input_tokens, snapshot.total_output_tokens
    );
    let _ = writeln!(output, "Total Cost: ${:.4}", snapshot.total_cost);
    let _ = writeln!(output, "Estimated Savings: ${:.4}", snapshot.estimated_savings);

    if !snapshot.by_tier.is_empty() {
        output.push_str("\nBy Tier:\n");
        for (tier, stats) in &snapshot.by_tier {
            let _ = writeln!(
                output,
                "  {}: {} requests, {} tokens, ${:.4}",
                tier,
                stats.requests,
                stats.input_tokens + stats.output_tokens,
                stats.cost
            );
        }
    }

    output
}
