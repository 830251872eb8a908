use super::Document;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    ArrayContains { field: String, value: Value },
}

/// Equality / array-membership filters, one sort key and a limit, the
/// subset of document queries the app issues. Field names may be dotted
/// paths into nested objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn where_array_contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::ArrayContains {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq { field, value } => lookup(data, field) == Some(value),
            Filter::ArrayContains { field, value } => lookup(data, field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }

    /// Filter, sort (stable) and truncate a scanned collection.
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(&d.data)).collect();

        if let Some((field, direction)) = &self.order_by {
            out.sort_by(|a, b| {
                let ord = compare_values(lookup(&a.data, field), lookup(&b.data, field));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |current, key| current.get(key))
}

// Missing and null sort first; mixed types order by type rank.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = |v: Option<&Value>| match v {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    };

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
