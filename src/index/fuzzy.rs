use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA};

/// Largest edit distance the automaton is built for
pub const MAX_EDIT_DISTANCE: u8 = 2;

/// Automaton for fuzzy matching with edit distance
pub struct FuzzyAutomaton {
    /// The target term to match
    term: String,

    /// Maximum allowed edit distance, clamped to `MAX_EDIT_DISTANCE`
    max_edit_distance: u8,

    /// Accept any candidate that starts with a string within distance
    prefix: bool,

    dfa: DFA,
}

impl FuzzyAutomaton {
    pub fn new(term: &str, max_edit_distance: u8, prefix: bool) -> Self {
        let max_edit_distance = max_edit_distance.min(MAX_EDIT_DISTANCE);
        // Transpositions count as one edit (teh -> the)
        let lev_builder = LevenshteinAutomatonBuilder::new(max_edit_distance, true);

        let dfa = if prefix {
            lev_builder.build_prefix_dfa(term)
        } else {
            lev_builder.build_dfa(term)
        };

        Self {
            term: term.to_string(),
            max_edit_distance,
            prefix,
            dfa,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Check if a candidate matches within edit distance
    pub fn matches(&self, candidate: &str) -> bool {
        let mut state = self.dfa.initial_state();

        for &byte in candidate.as_bytes() {
            state = self.dfa.transition(state, byte);
        }

        match self.dfa.distance(state) {
            Distance::Exact(d) => d <= self.max_edit_distance,
            Distance::AtLeast(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_distance() {
        let automaton = FuzzyAutomaton::new("trade", 1, false);
        assert!(automaton.matches("trade"));
        assert!(automaton.matches("trado"));
        assert!(automaton.matches("rtade"));
        assert!(!automaton.matches("tirade2"));
        assert!(!automaton.matches("trader_s"));
    }

    #[test]
    fn test_prefix_distance_zero_is_plain_prefix() {
        let automaton = FuzzyAutomaton::new("fur", 0, true);
        assert!(automaton.matches("fur"));
        assert!(automaton.matches("furniture"));
        assert!(!automaton.matches("fir"));
        assert!(!automaton.matches("fu"));
    }

    #[test]
    fn test_distance_is_clamped() {
        let automaton = FuzzyAutomaton::new("emma", 9, false);
        assert!(automaton.matches("amma"));
        assert!(!automaton.matches("xxxxxxx"));
    }
}
