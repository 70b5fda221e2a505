use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::domain::error::{AppError, Result};

/// Body of a column statistics call. The client resubmits the table rows
/// with every call.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub column: String,
    pub rows: Vec<Map<String, Value>>,
}

impl StatsRequest {
    /// Validate a decoded JSON body. Checks run in a fixed order and the
    /// first failure wins.
    pub fn from_json(body: Option<Value>) -> Result<Self> {
        let mut body = match body {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(invalid("Request data is empty or not JSON")),
        };

        let column = match body.remove("column") {
            Some(Value::String(column)) if !column.is_empty() => column,
            _ => return Err(invalid("Column is required")),
        };

        let data = match body.remove("data") {
            Some(data) if is_present(&data) => data,
            _ => return Err(invalid("Data is required")),
        };

        let Value::Array(items) = data else {
            return Err(invalid("Data should be a list"));
        };

        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(invalid("All items in data should be dictionaries")),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { column, rows })
    }
}

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    pub mean: f64,
    pub median: f64,
    pub min: Number,
    pub max: Number,
    /// 25th, 50th and 75th percentiles.
    pub quartiles: [f64; 3],
}

/// Body of a correlation call: two sequences that should hold numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRequest {
    pub column1: Vec<Value>,
    pub column2: Vec<Value>,
}

impl CorrelationRequest {
    pub fn from_json(body: Option<Value>) -> Result<Self> {
        let Some(Value::Object(mut body)) = body else {
            return Err(invalid("Invalid input data"));
        };

        let column1 = non_empty_array(body.remove("column1"))?;
        let column2 = non_empty_array(body.remove("column2"))?;

        if column1.len() != column2.len() {
            return Err(invalid("Columns must be of the same length"));
        }

        Ok(Self { column1, column2 })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub correlation: f64,
}

fn non_empty_array(value: Option<Value>) -> Result<Vec<Value>> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items),
        _ => Err(invalid("Invalid input data")),
    }
}

/// Null, false, zero and empty containers all count as "not provided".
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn invalid(msg: &str) -> AppError {
    AppError::ValidationError(msg.to_string())
}
