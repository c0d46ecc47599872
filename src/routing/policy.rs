//! Confidence thresholds gating how a recognized intent is acted on

/// Tier a provider confidence score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    /// Candidate for automatic execution
    High,
    /// Ask the user to confirm before executing
    Medium,
    /// Too uncertain to act; ask the user to rephrase
    Low,
}

/// Read-only threshold configuration. A score exactly at a threshold
/// classifies into the upper tier (0.8 is High, 0.6 is Medium).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    pub high: f32,
    pub medium: f32,
}

impl ConfidencePolicy {
    pub fn new(high: f32, medium: f32) -> Self {
        Self { high, medium }
    }

    pub fn classify(&self, confidence: f32) -> ConfidenceTier {
        if confidence >= self.high {
            ConfidenceTier::High
        } else if confidence >= self.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.6,
        }
    }
}
