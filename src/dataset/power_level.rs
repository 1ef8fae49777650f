//! Power level estimation from free-text power descriptions
//!
//! Ordered keyword matching: the HIGH set is checked before the MEDIUM set,
//! so a description containing keywords from both buckets always lands in
//! High. Matching is case-insensitive substring containment and the first
//! matching keyword short-circuits.

use crate::models::PowerLevel;

/// Keywords that place a character in the High bucket
const HIGH_POWER_KEYWORDS: [&str; 7] = [
    "cosmic",
    "reality",
    "god",
    "manipulation",
    "telekinesis",
    "magic",
    "energy projection",
];

/// Keywords that place a character in the Medium bucket
const MEDIUM_POWER_KEYWORDS: [&str; 6] = [
    "superhuman strength",
    "regeneration",
    "flight",
    "enhanced",
    "super",
    "control",
];

/// Classify a powers description into Low/Medium/High.
///
/// Total and deterministic: every input, including empty text, yields
/// exactly one bucket. Empty or whitespace-only text is Low.
pub fn estimate_power_level(powers_text: &str) -> PowerLevel {
    if powers_text.trim().is_empty() {
        return PowerLevel::Low;
    }

    let lower = powers_text.to_lowercase();

    for keyword in HIGH_POWER_KEYWORDS {
        if lower.contains(keyword) {
            return PowerLevel::High;
        }
    }

    for keyword in MEDIUM_POWER_KEYWORDS {
        if lower.contains(keyword) {
            return PowerLevel::Medium;
        }
    }

    PowerLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_keywords() {
        assert_eq!(estimate_power_level("Cosmic awareness"), PowerLevel::High);
        assert_eq!(estimate_power_level("reality warping"), PowerLevel::High);
        assert_eq!(estimate_power_level("God of Thunder"), PowerLevel::High);
        assert_eq!(estimate_power_level("Telekinesis and telepathy"), PowerLevel::High);
    }

    #[test]
    fn test_medium_keywords() {
        assert_eq!(
            estimate_power_level("Superhuman strength and agility"),
            PowerLevel::Medium
        );
        assert_eq!(estimate_power_level("Flight, armor"), PowerLevel::Medium);
        assert_eq!(estimate_power_level("enhanced senses"), PowerLevel::Medium);
    }

    #[test]
    fn test_default_low() {
        assert_eq!(estimate_power_level("Expert archer"), PowerLevel::Low);
        assert_eq!(estimate_power_level(""), PowerLevel::Low);
        assert_eq!(estimate_power_level("   "), PowerLevel::Low);
    }

    #[test]
    fn test_high_beats_medium() {
        // Contains "flight" (medium) and "cosmic" (high); high wins.
        assert_eq!(
            estimate_power_level("Flight and cosmic energy"),
            PowerLevel::High
        );
        // Order of appearance in the text does not matter.
        assert_eq!(
            estimate_power_level("magic, superhuman strength"),
            PowerLevel::High
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(estimate_power_level("COSMIC"), PowerLevel::High);
        assert_eq!(estimate_power_level("ReGeNeRaTiOn"), PowerLevel::Medium);
    }

    #[test]
    fn test_substring_containment() {
        // "super" matches inside "superhuman durability"
        assert_eq!(
            estimate_power_level("superhuman durability"),
            PowerLevel::Medium
        );
    }
}
