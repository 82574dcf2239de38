//! # Filter Predicates
//!
//! A [`FilterPredicate`] is a single structured condition sent to the backend:
//! a dot-path `field` into the row shape, an [`FilterOperator`], and a [`FilterValue`].
//!
//! ## Composition Rules
//!
//! The controller never accumulates predicates blindly. Before a request leaves:
//!
//! 1. [`dedup_predicates`] keeps one predicate per `(field, operator)` pair. The
//!    last value wins; the first position is kept so the order stays stable.
//! 2. A [`FilterScope`] appends its mandatory predicates (tenant or branch scoping)
//!    *after* the user's. Any user predicate on a mandatory field is dropped, so
//!    scoping can never be shadowed or widened from the UI.

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A single comparable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Comparison applied by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Exact equality.
    Eq,
    /// Case-insensitive "contains".
    #[serde(rename = "iLike")]
    ILike,
    /// Membership in a list.
    In,
    /// Inclusive lower/upper bounds; either side may be open.
    Range,
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOperator::Eq => "eq",
            FilterOperator::ILike => "iLike",
            FilterOperator::In => "in",
            FilterOperator::Range => "range",
        };
        f.write_str(name)
    }
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Bounds {
        lower: Option<Scalar>,
        upper: Option<Scalar>,
    },
}

/// A single structured condition (field, operator, value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterPredicate {
    /// Builds a predicate and checks that the value shape matches the operator.
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: FilterValue,
    ) -> Result<Self, GridError> {
        let predicate = Self {
            field: field.into(),
            operator,
            value,
        };
        predicate.validate()?;
        Ok(predicate)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Eq,
            value: FilterValue::Scalar(value.into()),
        }
    }

    pub fn ilike(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::ILike,
            value: FilterValue::Scalar(Scalar::Text(text.into())),
        }
    }

    pub fn is_in<I>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        Self {
            field: field.into(),
            operator: FilterOperator::In,
            value: FilterValue::List(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn range(field: impl Into<String>, lower: Option<Scalar>, upper: Option<Scalar>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Range,
            value: FilterValue::Bounds { lower, upper },
        }
    }

    /// Returns true when `other` targets the same `(field, operator)` pair.
    pub fn same_key(&self, other: &FilterPredicate) -> bool {
        self.field == other.field && self.operator == other.operator
    }

    /// Checks the operator/value pairing.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.field.trim().is_empty() {
            return Err(GridError::InvalidFilter("empty field name".into()));
        }
        let ok = match (&self.operator, &self.value) {
            (FilterOperator::Eq, FilterValue::Scalar(_)) => true,
            (FilterOperator::ILike, FilterValue::Scalar(Scalar::Text(_))) => true,
            (FilterOperator::In, FilterValue::List(_)) => true,
            (FilterOperator::Range, FilterValue::Bounds { lower, upper }) => {
                lower.is_some() || upper.is_some()
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(GridError::InvalidFilter(format!(
                "operator {} does not accept {:?} on {}",
                self.operator, self.value, self.field
            )))
        }
    }
}

impl Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.field, self.operator)?;
        match &self.value {
            FilterValue::Scalar(v) => write!(f, "{v}"),
            FilterValue::List(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FilterValue::Bounds { lower, upper } => {
                let show = |b: &Option<Scalar>| b.as_ref().map(ToString::to_string).unwrap_or_default();
                write!(f, "[{}..{}]", show(lower), show(upper))
            }
        }
    }
}

/// Keeps exactly one predicate per `(field, operator)` pair.
pub fn dedup_predicates(predicates: Vec<FilterPredicate>) -> Vec<FilterPredicate> {
    let mut out: Vec<FilterPredicate> = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        match out.iter_mut().find(|existing| existing.same_key(&predicate)) {
            Some(existing) => existing.value = predicate.value,
            None => out.push(predicate),
        }
    }
    out
}

/// Appends `mandatory` after `user`, dropping user predicates on mandatory fields.
pub fn merge_mandatory(
    user: Vec<FilterPredicate>,
    mandatory: Vec<FilterPredicate>,
) -> Vec<FilterPredicate> {
    let mandatory = dedup_predicates(mandatory);
    let mut merged: Vec<FilterPredicate> = user
        .into_iter()
        .filter(|p| !mandatory.iter().any(|m| m.field == p.field))
        .collect();
    merged.extend(mandatory);
    merged
}

/// The predicate derived from the search box, or `None` for a blank term.
pub fn search_predicate(field: &str, term: &str) -> Option<FilterPredicate> {
    let term = term.trim();
    if term.is_empty() {
        None
    } else {
        Some(FilterPredicate::ilike(field, term))
    }
}

/// Default-filter provider: merges a caller's mandatory scoping into the
/// explicit filter list.
///
/// Implementors capture whatever tenant context they need; the controller only
/// ever calls [`FilterScope::scope`] when composing a request.
pub trait FilterScope: Send + Sync + 'static {
    /// Predicates that must be present on every request.
    fn mandatory(&self) -> Vec<FilterPredicate>;

    fn scope(&self, explicit: Vec<FilterPredicate>) -> Vec<FilterPredicate> {
        merge_mandatory(explicit, self.mandatory())
    }
}

/// No mandatory filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScope;

impl FilterScope for NoScope {
    fn mandatory(&self) -> Vec<FilterPredicate> {
        Vec::new()
    }
}

/// A fixed set of mandatory filters.
#[derive(Debug, Clone, Default)]
pub struct MandatoryFilters(pub Vec<FilterPredicate>);

impl FilterScope for MandatoryFilters {
    fn mandatory(&self) -> Vec<FilterPredicate> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_one_predicate_per_field_and_operator() {
        let filters = vec![
            FilterPredicate::ilike("title", "mil"),
            FilterPredicate::eq("status", "active"),
            FilterPredicate::ilike("title", "milk"),
            FilterPredicate::eq("status", "active"),
        ];

        let deduped = dedup_predicates(filters);

        assert_eq!(
            deduped,
            vec![
                FilterPredicate::ilike("title", "milk"),
                FilterPredicate::eq("status", "active"),
            ]
        );
    }

    #[test]
    fn test_dedup_keeps_different_operators_on_same_field() {
        let filters = vec![
            FilterPredicate::eq("price", 10),
            FilterPredicate::range("price", Some(5.into()), None),
        ];
        assert_eq!(dedup_predicates(filters).len(), 2);
    }

    #[test]
    fn test_mandatory_filter_overrides_user_filter_on_same_field() {
        let user = vec![
            FilterPredicate::eq("branchId", "b-2"),
            FilterPredicate::ilike("title", "tea"),
        ];
        let mandatory = vec![FilterPredicate::eq("branchId", "b-1")];

        let merged = merge_mandatory(user, mandatory);

        assert_eq!(
            merged,
            vec![
                FilterPredicate::ilike("title", "tea"),
                FilterPredicate::eq("branchId", "b-1"),
            ]
        );
    }

    #[test]
    fn test_blank_search_yields_no_predicate() {
        assert!(search_predicate("title", "   ").is_none());
        assert_eq!(
            search_predicate("title", " milk "),
            Some(FilterPredicate::ilike("title", "milk"))
        );
    }

    #[test]
    fn test_validate_rejects_mismatched_shapes() {
        let bad = FilterPredicate::new(
            "tags",
            FilterOperator::In,
            FilterValue::Scalar(Scalar::Text("x".into())),
        );
        assert!(matches!(bad, Err(GridError::InvalidFilter(_))));

        let open_range = FilterPredicate::range("createdAt", None, None);
        assert!(open_range.validate().is_err());

        let numeric_ilike = FilterPredicate {
            field: "title".into(),
            operator: FilterOperator::ILike,
            value: FilterValue::Scalar(Scalar::Int(3)),
        };
        assert!(numeric_ilike.validate().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(FilterOperator::ILike.to_string(), "iLike");
        assert_eq!(FilterPredicate::is_in("id", [1, 2]).to_string(), "id in [1, 2]");
    }
}
