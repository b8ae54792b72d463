//! Scoring rubric: category name → weight
//!
//! The rubric's key set is the closed set of categories a judge may assign.

use crate::error::RubricError;
use std::collections::BTreeMap;

/// Mapping from classification category to a numeric weight
///
/// Always holds at least one category, and every weight is finite. Weights may
/// be negative to penalize categories such as contradicted claims.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRubric {
    weights: BTreeMap<String, f64>,
}

impl ScoringRubric {
    /// Build a rubric from category weights
    ///
    /// # Errors
    ///
    /// Returns an error if no categories are given, a category name is blank,
    /// or a weight is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::ScoringRubric;
    ///
    /// let rubric = ScoringRubric::new([("true", 1.0), ("false", 0.0)]).unwrap();
    /// assert_eq!(rubric.weight("true"), 1.0);
    /// assert_eq!(rubric.weight("missing"), 0.0);
    /// ```
    pub fn new<I, K>(weights: I) -> Result<Self, RubricError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (category, weight) in weights {
            let category = category.into();
            if category.trim().is_empty() {
                return Err(RubricError::BlankCategory);
            }
            if !weight.is_finite() {
                return Err(RubricError::InvalidWeight { category, weight });
            }
            map.insert(category, weight);
        }

        if map.is_empty() {
            return Err(RubricError::Empty);
        }

        Ok(Self { weights: map })
    }

    /// Two-category rubric: relevant (1.0) and irrelevant (0.0)
    pub fn binary() -> Self {
        Self::from_static(&[("relevant", 1.0), ("irrelevant", 0.0)])
    }

    /// Five-category rubric that penalizes contradicted and misleading claims
    ///
    /// Aggregate scores produced with this rubric can fall below zero.
    pub fn penalizing() -> Self {
        Self::from_static(&[
            ("fully_supported", 1.0),
            ("partially_supported", 0.6),
            ("no_evidence", 0.3),
            ("contradicted", -1.0),
            ("misleading", -0.5),
        ])
    }

    fn from_static(weights: &[(&str, f64)]) -> Self {
        Self {
            weights: weights
                .iter()
                .map(|(category, weight)| (category.to_string(), *weight))
                .collect(),
        }
    }

    /// Weight for a category; unknown categories weigh 0.0
    pub fn weight(&self, category: &str) -> f64 {
        self.weights.get(category).copied().unwrap_or(0.0)
    }

    /// Whether the category is part of the rubric
    pub fn contains(&self, category: &str) -> bool {
        self.weights.contains_key(category)
    }

    /// Valid category names, in sorted order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false; a rubric cannot be empty
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Borrow the underlying weights
    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }
}

impl Default for ScoringRubric {
    /// supported (1.0), unverifiable (0.5), contradicted (0.0)
    fn default() -> Self {
        Self::from_static(&[
            ("supported", 1.0),
            ("contradicted", 0.0),
            ("unverifiable", 0.5),
        ])
    }
}
