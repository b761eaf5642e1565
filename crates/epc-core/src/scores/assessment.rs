//! Onboarding assessment: Likert answers to initial scores.

use serde::{Deserialize, Serialize};

use super::{Battery, EpcScores};
use crate::error::ValidationError;

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Answers to the onboarding questionnaire, grouped by battery.
///
/// Each answer is on a 1-5 scale where 5 is the healthiest response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assessment {
    pub energy: Vec<u8>,
    pub purpose: Vec<u8>,
    pub connection: Vec<u8>,
}

impl Assessment {
    fn answers(&self, battery: Battery) -> &[u8] {
        match battery {
            Battery::Energy => &self.energy,
            Battery::Purpose => &self.purpose,
            Battery::Connection => &self.connection,
        }
    }

    fn battery_score(&self, battery: Battery) -> Result<f64, ValidationError> {
        let answers = self.answers(battery);
        if answers.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("assessment.{}", battery.name()),
                message: "at least one answer is required".to_string(),
            });
        }
        if let Some(bad) = answers
            .iter()
            .find(|a| !(LIKERT_MIN..=LIKERT_MAX).contains(*a))
        {
            return Err(ValidationError::InvalidValue {
                field: format!("assessment.{}", battery.name()),
                message: format!("answer {bad} outside {LIKERT_MIN}-{LIKERT_MAX}"),
            });
        }
        let mean = answers.iter().map(|a| *a as f64).sum::<f64>() / answers.len() as f64;
        let span = (LIKERT_MAX - LIKERT_MIN) as f64;
        Ok(((mean - LIKERT_MIN as f64) / span * 100.0).round())
    }

    /// Derive initial scores.
    pub fn to_scores(&self) -> Result<EpcScores, ValidationError> {
        EpcScores::new(
            self.battery_score(Battery::Energy)?,
            self.battery_score(Battery::Purpose)?,
            self.battery_score(Battery::Connection)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_likert_mean_onto_score_range() {
        let assessment = Assessment {
            energy: vec![5, 5],
            purpose: vec![1],
            connection: vec![3, 4],
        };
        let scores = assessment.to_scores().unwrap();
        assert_eq!(scores.energy, 100.0);
        assert_eq!(scores.purpose, 0.0);
        // mean 3.5 -> 62.5 -> 63
        assert_eq!(scores.connection, 63.0);
    }

    #[test]
    fn rejects_empty_battery() {
        let assessment = Assessment {
            energy: vec![3],
            purpose: vec![],
            connection: vec![3],
        };
        assert!(assessment.to_scores().is_err());
    }

    #[test]
    fn rejects_out_of_scale_answer() {
        let assessment = Assessment {
            energy: vec![3, 6],
            purpose: vec![3],
            connection: vec![3],
        };
        let err = assessment.to_scores().unwrap_err();
        assert!(err.to_string().contains("answer 6"));
    }
}
