//! Writes plans in the classic `sas_plan` format.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::PlanIoError;

/// Buffers plan steps and writes them as one `(name)` line each,
/// followed by a `; cost = N (unit cost|general cost)` trailer.
pub struct PlanWriter {
    steps: Vec<String>,
    output_path: PathBuf,
}

impl PlanWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            steps: Vec::new(),
            output_path,
        }
    }

    pub fn record(&mut self, step: &str) {
        self.steps.push(step.to_string());
    }

    pub fn record_all<I, S>(&mut self, steps: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.steps
            .extend(steps.into_iter().map(|s| s.as_ref().to_string()));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Write the buffered plan and return the output path.
    pub fn finish(self, cost: i64, unit_cost: bool) -> Result<PathBuf, PlanIoError> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(&self.output_path)?);
        write_plan(&mut file, &self.steps, cost, unit_cost)?;
        file.flush()?;
        tracing::info!(
            steps = self.steps.len(),
            cost,
            path = %self.output_path.display(),
            "Wrote plan"
        );
        Ok(self.output_path)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Render a plan to any writer.
pub fn write_plan<W: Write>(
    out: &mut W,
    steps: &[String],
    cost: i64,
    unit_cost: bool,
) -> Result<(), PlanIoError> {
    for step in steps {
        writeln!(out, "({step})")?;
    }
    let kind = if unit_cost { "unit cost" } else { "general cost" };
    writeln!(out, "; cost = {cost} ({kind})")?;
    Ok(())
}
