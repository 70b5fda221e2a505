use serde_json::Value;

use super::statistics::pearson;
use crate::domain::analytics::{CorrelationRequest, CorrelationResult};
use crate::domain::error::{AppError, Result};

/// Pearson correlation between two client supplied sequences.
#[derive(Debug, Default, Clone)]
pub struct CorrelationUseCase;

impl CorrelationUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, request: &CorrelationRequest) -> Result<CorrelationResult> {
        let x = numeric_sequence("column1", &request.column1)?;
        let y = numeric_sequence("column2", &request.column2)?;

        let correlation = pearson(&x, &y)?;
        Ok(CorrelationResult { correlation })
    }
}

fn numeric_sequence(name: &str, values: &[Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            value.as_f64().ok_or_else(|| {
                AppError::Computation(format!(
                    "{} contains a non-numeric value at index {}",
                    name, idx
                ))
            })
        })
        .collect()
}
