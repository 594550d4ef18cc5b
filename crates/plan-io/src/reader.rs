//! Reads plans written by [`PlanWriter`](crate::PlanWriter).

use std::path::Path;

use crate::types::PlanIoError;

/// Static methods for reading plan files.
pub struct PlanReader;

impl PlanReader {
    /// Read the operator names of a plan file, in order.
    pub fn read(path: &Path) -> Result<Vec<String>, PlanIoError> {
        let contents = std::fs::read_to_string(path)?;
        let steps = Self::parse(&contents)?;
        tracing::debug!(steps = steps.len(), path = %path.display(), "Read plan");
        Ok(steps)
    }

    /// Parse plan text. Blank lines and `;` comments are skipped.
    pub fn parse(text: &str) -> Result<Vec<String>, PlanIoError> {
        let mut steps = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let inner = line
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| PlanIoError::Malformed {
                    line: i + 1,
                    text: line.to_string(),
                })?;
            steps.push(inner.trim().to_string());
        }
        Ok(steps)
    }
}
