//! Execution adapter that hands target weights to the optimizer as a CSV file.
//!
//! Output rows are `kind,code,value`: one `weight` row per code followed by
//! one row per constraint.

use crate::domain::allocation::{Constraint, OptimizerRequest};
use crate::domain::error::QualmomError;
use crate::ports::execution_port::ExecutionPort;
use std::path::PathBuf;

pub struct CsvTargetWriter {
    output_path: PathBuf,
}

impl CsvTargetWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }
}

fn csv_error(e: csv::Error) -> QualmomError {
    QualmomError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl ExecutionPort for CsvTargetWriter {
    fn submit(&self, request: &OptimizerRequest) -> Result<(), QualmomError> {
        let mut wtr = csv::Writer::from_path(&self.output_path).map_err(csv_error)?;
        wtr.write_record(["kind", "code", "value"]).map_err(csv_error)?;

        for (code, weight) in request.weights.iter() {
            let value = weight.to_string();
            wtr.write_record(["weight", code, value.as_str()])
                .map_err(csv_error)?;
        }

        for constraint in &request.constraints {
            match constraint {
                Constraint::NetExposure { min, max } => {
                    let (min, max) = (min.to_string(), max.to_string());
                    wtr.write_record(["net_exposure_min", "", min.as_str()])
                        .map_err(csv_error)?;
                    wtr.write_record(["net_exposure_max", "", max.as_str()])
                        .map_err(csv_error)?;
                }
            }
        }

        wtr.flush()?;
        Ok(())
    }
}
