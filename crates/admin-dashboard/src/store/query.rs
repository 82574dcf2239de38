//! # List Query Evaluation
//!
//! How the store answers a [`FetchRequest`]: every predicate is evaluated against
//! the row's JSON form, the matches are sorted on one key, then sliced into a
//! 1-based page.
//!
//! | Operator | Matches when |
//! |----------|--------------|
//! | `eq`     | the field equals the value (`3` equals `3.0`) |
//! | `iLike`  | the field is text containing the value, ignoring case |
//! | `in`     | the field equals any listed value |
//! | `range`  | the field lies within the bounds, both inclusive, either open |
//!
//! A missing or `null` field never matches, and sorts last in either direction.

use super::StoreError;
use page_controller::{
    FetchRequest, FetchResponse, FilterOperator, FilterPredicate, FilterValue, Scalar,
    SortDirection, Sorting,
};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Follows a dot path (`customer.email`) into `row`.
pub fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let value = path
        .split('.')
        .try_fold(row, |node, key| node.get(key))?;
    (!value.is_null()).then_some(value)
}

fn to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(v) => Value::Bool(*v),
        Scalar::Int(v) => Value::from(*v),
        Scalar::Float(v) => Value::from(*v),
        Scalar::Text(v) => Value::String(v.clone()),
    }
}

/// Orders two JSON leaves of the same kind; mixed kinds are incomparable.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn equals(field: &Value, scalar: &Scalar) -> bool {
    compare(field, &to_value(scalar)) == Some(Ordering::Equal)
}

fn within(field: &Value, lower: Option<&Scalar>, upper: Option<&Scalar>) -> bool {
    let above = lower.map_or(true, |l| {
        matches!(compare(field, &to_value(l)), Some(Ordering::Greater | Ordering::Equal))
    });
    let below = upper.map_or(true, |u| {
        matches!(compare(field, &to_value(u)), Some(Ordering::Less | Ordering::Equal))
    });
    above && below
}

/// Evaluates one predicate against a row.
pub fn matches(row: &Value, predicate: &FilterPredicate) -> Result<bool, StoreError> {
    let field = lookup(row, &predicate.field);
    match (predicate.operator, &predicate.value) {
        (FilterOperator::Eq, FilterValue::Scalar(value)) => {
            Ok(field.is_some_and(|f| equals(f, value)))
        }
        (FilterOperator::ILike, FilterValue::Scalar(Scalar::Text(needle))) => {
            let needle = needle.to_lowercase();
            Ok(field
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&needle)))
        }
        (FilterOperator::In, FilterValue::List(values)) => {
            Ok(field.is_some_and(|f| values.iter().any(|v| equals(f, v))))
        }
        (FilterOperator::Range, FilterValue::Bounds { lower, upper }) => {
            Ok(field.is_some_and(|f| within(f, lower.as_ref(), upper.as_ref())))
        }
        _ => Err(StoreError::UnsupportedFilter(predicate.to_string())),
    }
}

fn sort_matches<R>(rows: &mut [(Value, R)], sorting: &Sorting) {
    rows.sort_by(|(a, _), (b, _)| {
        match (lookup(a, &sorting.key), lookup(b, &sorting.key)) {
            (Some(x), Some(y)) => {
                let ord = compare(x, y).unwrap_or(Ordering::Equal);
                match sorting.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Filters, sorts and pages `rows`. The page echo is always set.
pub fn run_list<'a, R, I>(rows: I, request: &FetchRequest) -> Result<FetchResponse<R>, StoreError>
where
    R: Clone + Serialize + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut matched: Vec<(Value, R)> = Vec::new();
    for row in rows {
        let json = serde_json::to_value(row)?;
        let mut keep = true;
        for predicate in &request.filters {
            if !matches(&json, predicate)? {
                keep = false;
                break;
            }
        }
        if keep {
            matched.push((json, row.clone()));
        }
    }

    if let Some(sorting) = &request.sorting {
        sort_matches(&mut matched, sorting);
    }

    let total_count = matched.len() as u64;
    let page: Vec<R> = matched
        .into_iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .map(|(_, row)| row)
        .collect();

    Ok(FetchResponse::new(page, total_count).with_page_echo(request.page_number, request.page_size))
}
