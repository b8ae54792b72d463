//! Atomic fact module - the unit every pipeline stage operates on

use std::fmt;

/// Unique identifier for an atomic fact based on UUIDv7
///
/// UUIDv7 keeps ids chronologically sortable, so facts extracted in one run
/// order the same way they were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactId(u128);

impl FactId {
    /// Generate a new UUIDv7-based FactId
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::FactId;
    ///
    /// let id = FactId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a FactId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a FactId from its hyphenated UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::FactId;
    ///
    /// let id = FactId::new();
    /// let parsed = FactId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid fact id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A single, minimal factual assertion extracted from a response
///
/// Facts are never mutated in place. Stages that change a fact (the
/// containment resolver, the relevance checker) call one of the `with_*`
/// methods and get a new value back, so earlier versions stay intact for
/// logging and diffing. `source_text` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicFact {
    id: FactId,
    text: String,
    source_text: String,
    is_self_contained: Option<bool>,
    is_relevant: Option<bool>,
}

impl AtomicFact {
    /// Create a fact with a fresh id and unknown containment/relevance
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::AtomicFact;
    ///
    /// let fact = AtomicFact::new("Paris is in France", "Paris is in France. It is big.");
    /// assert_eq!(fact.text(), "Paris is in France");
    /// assert_eq!(fact.is_self_contained(), None);
    /// ```
    pub fn new(text: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self::with_id(FactId::new(), text, source_text)
    }

    /// Create a fact with an explicit id
    pub fn with_id(id: FactId, text: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            source_text: source_text.into(),
            is_self_contained: None,
            is_relevant: None,
        }
    }

    /// Identifier, stable across every derived version of this fact
    pub fn id(&self) -> FactId {
        self.id
    }

    /// Current claim text (the one evaluated downstream)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Original response text the fact was derived from
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Self-containment status; `None` until checked
    pub fn is_self_contained(&self) -> Option<bool> {
        self.is_self_contained
    }

    /// Relevance status; `None` until checked
    pub fn is_relevant(&self) -> Option<bool> {
        self.is_relevant
    }

    /// Return a copy with replaced text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Return a copy with the given self-containment status
    pub fn with_self_contained(&self, self_contained: bool) -> Self {
        Self {
            is_self_contained: Some(self_contained),
            ..self.clone()
        }
    }

    /// Return a copy with the given relevance status
    pub fn with_relevance(&self, relevant: bool) -> Self {
        Self {
            is_relevant: Some(relevant),
            ..self.clone()
        }
    }
}
