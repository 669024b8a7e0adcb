//! Likert-style evaluation panel for generated stories.

use thiserror::Error;

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Criteria offered when the caller does not supply its own.
pub const DEFAULT_CRITERIA: [&str; 4] = ["Coherence", "Creativity", "Fluency", "Interest"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("unknown criterion {0:?}")]
    UnknownCriterion(String),

    #[error("rating {0} is outside the 1-5 scale")]
    OutOfScale(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub name: String,
    pub rating: Option<u8>,
}

/// Ratings for one story, one optional score per criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPanel {
    criteria: Vec<Criterion>,
}

impl Default for EvaluationPanel {
    fn default() -> Self {
        Self::new(DEFAULT_CRITERIA)
    }
}

impl EvaluationPanel {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            criteria: names
                .into_iter()
                .map(|name| Criterion {
                    name: name.into(),
                    rating: None,
                })
                .collect(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Rate a criterion; `None` clears it.
    pub fn rate(&mut self, name: &str, rating: Option<u8>) -> Result<(), EvaluationError> {
        if let Some(value) = rating {
            if !(LIKERT_MIN..=LIKERT_MAX).contains(&value) {
                return Err(EvaluationError::OutOfScale(value));
            }
        }
        let criterion = self
            .criteria
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| EvaluationError::UnknownCriterion(name.to_string()))?;
        criterion.rating = rating;
        Ok(())
    }

    /// Mean of the rated criteria, `None` when nothing is rated.
    pub fn average(&self) -> Option<f64> {
        let rated: Vec<u8> = self.criteria.iter().filter_map(|c| c.rating).collect();
        if rated.is_empty() {
            return None;
        }
        let sum: u32 = rated.iter().map(|&r| u32::from(r)).sum();
        Some(f64::from(sum) / rated.len() as f64)
    }

    pub fn is_complete(&self) -> bool {
        self.criteria.iter().all(|c| c.rating.is_some())
    }

    pub fn reset(&mut self) {
        for criterion in &mut self.criteria {
            criterion.rating = None;
        }
    }
}

/// Average formatted to two decimals, `-` when unrated.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{:.2}", value),
        None => "-".to_string(),
    }
}
