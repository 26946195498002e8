use super::{Rule, RuleSet};
use crate::config::PolicyConfig;
use strum::Display;

/// Build the stock credential rule set from policy configuration.
///
/// Rule names are stable identifiers ("length", "letter", "number",
/// "special"); descriptions are display text and follow the configured
/// thresholds. Character classes are ASCII on purpose: the matching server
/// policy counts ASCII letters and digits only, so a multibyte letter must
/// not satisfy "letter" here and then fail on submit.
pub fn credential_policy(config: &PolicyConfig) -> RuleSet {
    let min_length = config.min_length;
    let mut rules = vec![Rule::new(
        "length",
        format!("At least {min_length} characters"),
        move |input: &str| input.chars().count() >= min_length,
    )];

    if config.require_letter {
        rules.push(Rule::new("letter", "Contains a letter", |input: &str| {
            input.chars().any(|c| c.is_ascii_alphabetic())
        }));
    }
    if config.require_digit {
        rules.push(Rule::new("number", "Contains a number", |input: &str| {
            input.chars().any(|c| c.is_ascii_digit())
        }));
    }
    if config.require_special {
        let special = config.special_chars.clone();
        rules.push(Rule::new(
            "special",
            format!("Contains a special character ({})", config.special_chars),
            move |input: &str| input.chars().any(|c| special.contains(c)),
        ));
    }

    RuleSet { rules }
}

/// Coarse strength heuristic, 0..=5.
///
/// Independent of the rule set: strength is advisory display state and never
/// gates submission. One point each for length >= 8, length >= 12, a
/// lowercase letter, an uppercase letter, a digit, and a non-alphanumeric
/// character, capped at 5.
pub fn strength_score(input: &str) -> u8 {
    let length = input.chars().count();
    let mut score = 0u8;
    if length >= 8 {
        score += 1;
    }
    if length >= 12 {
        score += 1;
    }
    if input.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if input.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if input.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if input.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score.min(5)
}

/// Display band for a strength score. Score 0 has no band: an empty field
/// shows nothing rather than "Very Weak".
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthBand {
    #[strum(serialize = "Very Weak")]
    VeryWeak,
    Weak,
    Medium,
    Strong,
    #[strum(serialize = "Very Strong")]
    VeryStrong,
}

impl StrengthBand {
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            0 => None,
            1 => Some(Self::VeryWeak),
            2 => Some(Self::Weak),
            3 => Some(Self::Medium),
            4 => Some(Self::Strong),
            _ => Some(Self::VeryStrong),
        }
    }

    pub fn rate(input: &str) -> Option<Self> {
        Self::from_score(strength_score(input))
    }
}
