//! Lead Scoring
//!
//! Additive point model over the capture form:
//! - base score plus brand, quantity, timeline, source, category and city signals
//! - every comparison is case-insensitive; empty fields contribute nothing extra
//! - the total is clamped to 0..=100
//!
//! Priority and display band are derived from the total with fixed cut points.

use serde::{Deserialize, Serialize};

use leaddesk_core::{LeadScoreInput, Priority, ScoreBand};

use crate::matching::contains_any;

/// Starting score for every lead
pub const BASE_SCORE: u32 = 25;
/// Lowest score classified HOT
pub const HOT_THRESHOLD: u32 = 80;
/// Lowest score classified WARM
pub const WARM_THRESHOLD: u32 = 45;
/// Upper bound of the score range
pub const MAX_SCORE: u32 = 100;

/// Quantity tiers, highest first; only the first matching tier counts
const QUANTITY_TIERS: [(u32, u32); 5] = [(250, 24), (100, 18), (30, 12), (10, 8), (1, 4)];

const URGENT_TIMELINE: &[&str] = &["today", "urgent"];
const SOURCE_KEYWORDS: &[&str] = &["google", "ads", "bark"];
const CATEGORY_KEYWORDS: &[&str] = &["enterprise", "security"];
const TRICITY: &[&str] = &["chandigarh", "mohali", "panchkula"];

/// Per-signal contributions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub brand: u32,
    pub quantity: u32,
    pub timeline: u32,
    pub source: u32,
    pub category: u32,
    pub city: u32,
}

impl ScoreBreakdown {
    /// Clamped total
    pub fn total(&self) -> u32 {
        let sum = self.base
            + self.brand
            + self.quantity
            + self.timeline
            + self.source
            + self.category
            + self.city;
        sum.min(MAX_SCORE)
    }
}

/// Score a lead, 0..=100
pub fn score(input: &LeadScoreInput<'_>) -> u32 {
    score_breakdown(input).total()
}

/// Score a lead and keep the per-signal contributions
pub fn score_breakdown(input: &LeadScoreInput<'_>) -> ScoreBreakdown {
    let timeline = input.timeline.to_lowercase();
    let source = input.source.to_lowercase();
    let category = input.category.to_lowercase();
    let city = input.city.to_lowercase();

    ScoreBreakdown {
        base: BASE_SCORE,
        brand: brand_points(input.brand),
        quantity: quantity_points(input.qty),
        timeline: timeline_points(&timeline),
        source: if contains_any(&source, SOURCE_KEYWORDS) { 8 } else { 0 },
        category: if contains_any(&category, CATEGORY_KEYWORDS) { 6 } else { 0 },
        city: if contains_any(&city, TRICITY) { 5 } else { 0 },
    }
}

fn brand_points(brand: &str) -> u32 {
    match brand.to_lowercase().as_str() {
        "microsoft" | "seqrite" => 20,
        "cisco" => 14,
        _ => 8,
    }
}

fn quantity_points(qty: u32) -> u32 {
    QUANTITY_TIERS
        .iter()
        .find(|(min, _)| qty >= *min)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn timeline_points(timeline: &str) -> u32 {
    if contains_any(timeline, URGENT_TIMELINE) {
        16
    } else if timeline.contains("week") {
        11
    } else if timeline.contains("month") {
        7
    } else if !timeline.is_empty() {
        4
    } else {
        0
    }
}

/// Priority for a score
pub fn classify_priority(score: u32) -> Priority {
    if score >= HOT_THRESHOLD {
        Priority::Hot
    } else if score >= WARM_THRESHOLD {
        Priority::Warm
    } else {
        Priority::Cold
    }
}

/// Lowercase display band for a score
pub fn score_band(score: u32) -> ScoreBand {
    classify_priority(score).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_lead_example() {
        let input = LeadScoreInput {
            brand: "Microsoft",
            qty: 120,
            timeline: "This Week",
            source: "google ads",
            category: "Enterprise",
            city: "Chandigarh",
        };
        let breakdown = score_breakdown(&input);
        assert_eq!(breakdown.brand, 20);
        assert_eq!(breakdown.quantity, 18);
        assert_eq!(breakdown.timeline, 11);
        assert_eq!(breakdown.source, 8);
        assert_eq!(breakdown.category, 6);
        assert_eq!(breakdown.city, 5);
        assert_eq!(score(&input), 93);
        assert_eq!(classify_priority(93), Priority::Hot);
    }

    #[test]
    fn test_cold_lead_example() {
        let input = LeadScoreInput {
            brand: "Other",
            ..Default::default()
        };
        assert_eq!(score(&input), 33);
        assert_eq!(classify_priority(33), Priority::Cold);
    }

    #[test]
    fn test_empty_input_gets_base_and_default_brand() {
        assert_eq!(score(&LeadScoreInput::default()), 33);
    }

    #[test]
    fn test_brand_weights() {
        assert_eq!(brand_points("SEQRITE"), 20);
        assert_eq!(brand_points(" cisco "), 14);
        assert_eq!(brand_points("microsoft 365"), 8);
        assert_eq!(brand_points(""), 8);
    }

    #[test]
    fn test_quantity_tiers() {
        let cases = [
            (0, 0),
            (1, 4),
            (9, 4),
            (10, 8),
            (29, 8),
            (30, 12),
            (99, 12),
            (100, 18),
            (249, 18),
            (250, 24),
            (u32::MAX, 24),
        ];
        for (qty, expected) in cases {
            assert_eq!(quantity_points(qty), expected, "qty {}", qty);
        }
    }

    #[test]
    fn test_timeline_weights() {
        assert_eq!(timeline_points("urgent requirement"), 16);
        assert_eq!(timeline_points("need it today"), 16);
        assert_eq!(timeline_points("within a week"), 11);
        assert_eq!(timeline_points("next month"), 7);
        assert_eq!(timeline_points("q3"), 4);
        assert_eq!(timeline_points(""), 0);
    }

    #[test]
    fn test_values_compared_as_given() {
        let input = LeadScoreInput {
            timeline: "   ",
            brand: " Microsoft ",
            ..Default::default()
        };
        let breakdown = score_breakdown(&input);
        assert_eq!(breakdown.timeline, 4);
        assert_eq!(breakdown.brand, 8);
    }

    #[test]
    fn test_source_weight_not_cumulative() {
        let input = LeadScoreInput {
            source: "Google Ads via Bark",
            ..Default::default()
        };
        assert_eq!(score_breakdown(&input).source, 8);
    }

    #[test]
    fn test_score_clamped_to_max() {
        let input = LeadScoreInput {
            brand: "seqrite",
            qty: 500,
            timeline: "urgent",
            source: "bark",
            category: "endpoint security",
            city: "Mohali",
        };
        // 25 + 20 + 24 + 16 + 8 + 6 + 5 = 104
        assert_eq!(score(&input), MAX_SCORE);
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(classify_priority(0), Priority::Cold);
        assert_eq!(classify_priority(44), Priority::Cold);
        assert_eq!(classify_priority(45), Priority::Warm);
        assert_eq!(classify_priority(79), Priority::Warm);
        assert_eq!(classify_priority(80), Priority::Hot);
        assert_eq!(classify_priority(100), Priority::Hot);
    }

    #[test]
    fn test_band_matches_priority() {
        for s in 0..=MAX_SCORE {
            assert_eq!(
                score_band(s).as_str(),
                classify_priority(s).as_str().to_lowercase(),
                "score {}",
                s
            );
        }
    }
}
