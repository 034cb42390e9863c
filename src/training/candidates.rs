//! Named candidate estimators evaluated by the training loop

use super::models::EstimatorSpec;
use serde::{Deserialize, Serialize};

/// A named estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub estimator: EstimatorSpec,
}

impl Candidate {
    pub fn new(name: impl Into<String>, estimator: EstimatorSpec) -> Self {
        Self {
            name: name.into(),
            estimator,
        }
    }
}

/// Ordered candidate list. Declaration order breaks RMSE ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::standard(42)
    }
}

impl CandidateSet {
    /// The three fixed candidates: OLS, ridge with alpha 1 and a 300-tree forest
    pub fn standard(random_state: u64) -> Self {
        Self {
            candidates: vec![
                Candidate::new("LinearRegression", EstimatorSpec::LinearRegression),
                Candidate::new("Ridge(alpha=1.0)", EstimatorSpec::Ridge { alpha: 1.0 }),
                Candidate::new(
                    "RandomForest(n=300)",
                    EstimatorSpec::RandomForest {
                        n_estimators: 300,
                        random_state,
                    },
                ),
            ],
        }
    }

    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_candidates_in_declaration_order() {
        let set = CandidateSet::default();
        assert_eq!(set.names(), vec!["LinearRegression", "Ridge(alpha=1.0)", "RandomForest(n=300)"]);
        assert_eq!(
            set.iter().last().map(|c| c.estimator.clone()),
            Some(EstimatorSpec::RandomForest { n_estimators: 300, random_state: 42 })
        );
    }

    #[test]
    fn test_custom_set() {
        let set = CandidateSet::from_candidates(vec![Candidate::new("ols", EstimatorSpec::LinearRegression)]);
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
