//! Report generation port trait.

use std::path::Path;

use crate::domain::engine::RunResult;
use crate::domain::error::ReportError;

/// Port for writing a completed run out to some downstream format. The
/// [`RunResult`] is a plain value; adapters never reach back into the
/// engine.
pub trait ReportPort {
    fn write(&self, result: &RunResult, output_path: &Path) -> Result<(), ReportError>;
}
