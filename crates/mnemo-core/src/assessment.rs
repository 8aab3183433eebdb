//! Folding tutoring assessments into mastery records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{BloomLevel, ConceptMastery};

/// Weight kept from the previous mastery score when a new assessment lands.
const HISTORY_WEIGHT: f64 = 0.7;

impl ConceptMastery {
    /// Record one assessed practice.
    ///
    /// The first practice takes the confidence as the score outright; later
    /// ones blend it in with weight 0.3. Level and misconceptions are
    /// replaced, not merged. `confidence` is clamped to [0, 1].
    pub fn apply_assessment(
        &mut self,
        level: BloomLevel,
        confidence: f64,
        misconceptions: Vec<String>,
    ) {
        let confidence = confidence.clamp(0.0, 1.0);
        self.times_practiced += 1;
        self.mastery_score = if self.times_practiced == 1 {
            confidence
        } else {
            HISTORY_WEIGHT * self.mastery_score + (1.0 - HISTORY_WEIGHT) * confidence
        };
        self.current_level = level;
        self.misconceptions = misconceptions;
        self.days_since_practice = 0;
    }
}

/// What a tutor should do next given the learner's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorMove {
    /// Explain from the ground up.
    Teach,
    /// Lead with hints and questions.
    Guide,
    /// Probe with harder problems.
    Challenge,
    /// Move to applications and connections.
    Extend,
}

impl TutorMove {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence < 0.3 {
            TutorMove::Teach
        } else if confidence < 0.6 {
            TutorMove::Guide
        } else if confidence < 0.8 {
            TutorMove::Challenge
        } else {
            TutorMove::Extend
        }
    }
}

impl fmt::Display for TutorMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TutorMove::Teach => write!(f, "teach"),
            TutorMove::Guide => write!(f, "guide"),
            TutorMove::Challenge => write!(f, "challenge"),
            TutorMove::Extend => write!(f, "extend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_assessment_sets_score() {
        let mut m = ConceptMastery::new(1, 1);
        m.days_since_practice = 12;
        m.apply_assessment(BloomLevel::Remember, 0.4, vec!["sign error".into()]);
        assert_eq!(m.times_practiced, 1);
        assert_eq!(m.mastery_score, 0.4);
        assert_eq!(m.current_level, BloomLevel::Remember);
        assert_eq!(m.misconceptions, vec!["sign error".to_string()]);
        assert_eq!(m.days_since_practice, 0);
    }

    #[test]
    fn later_assessments_blend() {
        let mut m = ConceptMastery::new(1, 1);
        m.apply_assessment(BloomLevel::Remember, 0.5, vec!["a".into()]);
        m.apply_assessment(BloomLevel::Apply, 1.0, vec![]);
        assert_eq!(m.times_practiced, 2);
        assert!((m.mastery_score - 0.65).abs() < 1e-9);
        assert_eq!(m.current_level, BloomLevel::Apply);
        assert!(m.misconceptions.is_empty());
    }

    #[test]
    fn confidence_is_clamped() {
        let mut m = ConceptMastery::new(1, 1);
        m.apply_assessment(BloomLevel::Create, 1.7, vec![]);
        assert_eq!(m.mastery_score, 1.0);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn tutor_move_bands() {
        assert_eq!(TutorMove::for_confidence(0.0), TutorMove::Teach);
        assert_eq!(TutorMove::for_confidence(0.29), TutorMove::Teach);
        assert_eq!(TutorMove::for_confidence(0.3), TutorMove::Guide);
        assert_eq!(TutorMove::for_confidence(0.6), TutorMove::Challenge);
        assert_eq!(TutorMove::for_confidence(0.8), TutorMove::Extend);
        assert_eq!(TutorMove::Challenge.to_string(), "challenge");
    }
}
