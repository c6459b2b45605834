use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a scenario: the model that produced it and the pathway name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioId {
    pub model: String,
    pub scenario: String,
}

impl ScenarioId {
    pub fn new(model: &str, scenario: &str) -> Self {
        Self {
            model: model.to_string(),
            scenario: scenario.to_string(),
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.model, self.scenario)
    }
}

/// Match `value` against a pattern where `*` stands for any run of characters
///
/// Matching is case-sensitive, and a pattern without wildcards must match exactly.
pub fn pattern_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, last) = (parts[0], parts[parts.len() - 1]);
    let Some(mut remaining) = value.strip_prefix(first) else {
        return false;
    };

    for part in &parts[1..parts.len() - 1] {
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let id = ScenarioId::new("MESSAGE-GLOBIOM 1.0", "SSP2-19");
        assert_eq!(id.to_string(), "MESSAGE-GLOBIOM 1.0 / SSP2-19");
    }

    #[test]
    fn ordering_is_by_model_then_scenario() {
        let mut ids = vec![
            ScenarioId::new("REMIND", "b"),
            ScenarioId::new("AIM", "z"),
            ScenarioId::new("REMIND", "a"),
        ];
        ids.sort();
        assert_eq!(ids[0], ScenarioId::new("AIM", "z"));
        assert_eq!(ids[1], ScenarioId::new("REMIND", "a"));
    }

    #[test]
    fn exact_patterns() {
        assert!(pattern_match("SSP1-19", "SSP1-19"));
        assert!(!pattern_match("SSP1-19", "SSP1-26"));
    }

    #[test]
    fn wildcard_patterns() {
        assert!(pattern_match("SSP*", "SSP1-19"));
        assert!(pattern_match("*-19", "SSP1-19"));
        assert!(pattern_match("ADVANCE_2020_*", "ADVANCE_2020_1.5C-2100"));
        assert!(pattern_match("CD-LINKS_*Budg*", "CD-LINKS_NPi2020_400Budg"));
        assert!(pattern_match("*", ""));
        assert!(!pattern_match("SSP*-26", "SSP1-19"));
        // the suffix must not overlap the consumed prefix
        assert!(!pattern_match("ab*ba", "aba"));
    }
}
