use serde_json::{Number, Value};

use super::statistics::{mean, percentile};
use crate::domain::analytics::{StatsRequest, StatsResult};
use crate::domain::error::{AppError, Result};

/// Descriptive statistics over one column of a client supplied table.
#[derive(Debug, Default, Clone)]
pub struct ColumnStatsUseCase;

impl ColumnStatsUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, request: &StatsRequest) -> Result<StatsResult> {
        // Only JSON numbers count; strings, booleans, nulls and missing keys are skipped.
        let numbers: Vec<&Number> = request
            .rows
            .iter()
            .filter_map(|row| match row.get(&request.column) {
                Some(Value::Number(n)) => Some(n),
                _ => None,
            })
            .collect();

        if numbers.is_empty() {
            return Err(AppError::NotFound(
                "Column not found in data or contains no valid numeric data".to_string(),
            ));
        }

        let mut sorted: Vec<f64> = numbers.iter().filter_map(|n| n.as_f64()).collect();
        sorted.sort_by(f64::total_cmp);

        let computed = || -> Option<StatsResult> {
            let all_integers = numbers.iter().all(|n| n.is_i64() || n.is_u64());
            let (min, max) = if all_integers {
                integer_extremes(&numbers)?
            } else {
                (
                    Number::from_f64(*sorted.first()?)?,
                    Number::from_f64(*sorted.last()?)?,
                )
            };

            Some(StatsResult {
                mean: mean(&sorted)?,
                median: percentile(&sorted, 50.0)?,
                min,
                max,
                quartiles: [
                    percentile(&sorted, 25.0)?,
                    percentile(&sorted, 50.0)?,
                    percentile(&sorted, 75.0)?,
                ],
            })
        };

        computed().ok_or_else(|| {
            AppError::Computation(format!(
                "An error occurred: could not summarize column '{}'",
                request.column
            ))
        })
    }
}

/// Smallest and largest integer, keeping the original JSON representation.
fn integer_extremes(numbers: &[&Number]) -> Option<(Number, Number)> {
    let key = |n: &&&Number| -> i128 {
        n.as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .unwrap_or_default()
    };

    let min = numbers.iter().min_by_key(key)?;
    let max = numbers.iter().max_by_key(key)?;
    Some(((*min).clone(), (*max).clone()))
}
