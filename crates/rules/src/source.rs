//! Acquisition source bucketing
//!
//! Maps the free-text source/UTM/referrer fields of a lead onto a fixed set
//! of report buckets. Every lead lands in exactly one bucket.

use serde::{Deserialize, Serialize};

use leaddesk_core::{Lead, SourceBucket, SourceFields};

use crate::matching::{first_match, joined_lowercase, KeywordRule};

const SOURCE_RULES: [KeywordRule<SourceBucket>; 6] = [
    KeywordRule::new(&["bark"], SourceBucket::Bark),
    KeywordRule::new(
        &["gclid", "google ads", "adwords", "cpc", "ppc", "paid"],
        SourceBucket::GoogleAds,
    ),
    KeywordRule::new(&["whatsapp", "wa.me"], SourceBucket::WhatsApp),
    KeywordRule::with_words(
        &["facebook", "instagram", "linkedin", "social"],
        &["fb", "ig"],
        SourceBucket::Social,
    ),
    KeywordRule::new(&["google", "bing", "organic", "seo"], SourceBucket::OrganicSearch),
    KeywordRule::new(&["email", "newsletter", "mailchimp"], SourceBucket::Email),
];

const REFERRAL_KEYWORDS: &[&str] = &["referral", "partner"];
const DIRECT_KEYWORDS: &[&str] = &["direct", "website", "walk-in"];

/// Bucket a lead's acquisition channel
pub fn classify_source(fields: &SourceFields<'_>) -> SourceBucket {
    let text = joined_lowercase(&[
        fields.source,
        fields.utm_source,
        fields.utm_medium,
        fields.utm_campaign,
        fields.campaign,
        fields.referrer,
    ]);

    if let Some(bucket) = first_match(&text, &SOURCE_RULES) {
        return bucket;
    }
    if REFERRAL_KEYWORDS.iter().any(|k| text.contains(k)) || !fields.referrer.trim().is_empty() {
        return SourceBucket::Referral;
    }
    if text.is_empty() || DIRECT_KEYWORDS.iter().any(|k| text.contains(k)) {
        return SourceBucket::Direct;
    }
    SourceBucket::Other
}

/// Count for one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub bucket: SourceBucket,
    pub count: usize,
}

/// "By source" aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Every bucket in report order, zero counts included
    pub buckets: Vec<SourceCount>,
    pub total: usize,
}

impl SourceReport {
    pub fn count(&self, bucket: SourceBucket) -> usize {
        self.buckets
            .iter()
            .find(|c| c.bucket == bucket)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Group leads by their stored source bucket
pub fn source_report<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> SourceReport {
    let mut counts = [0usize; SourceBucket::ALL.len()];
    let mut total = 0;
    for lead in leads {
        if let Some(i) = SourceBucket::ALL.iter().position(|b| *b == lead.source_bucket) {
            counts[i] += 1;
        }
        total += 1;
    }

    SourceReport {
        buckets: SourceBucket::ALL
            .iter()
            .zip(counts)
            .map(|(bucket, count)| SourceCount {
                bucket: *bucket,
                count,
            })
            .collect(),
        total,
    }
}
