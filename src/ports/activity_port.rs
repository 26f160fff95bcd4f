//! Activity import port trait.
//!
//! The importer side of the system: adapters behind this trait own column
//! mapping, type coercion, and rejection of structurally malformed rows.
//! Records that come out of an `ActivityPort` already satisfy the
//! [`TransactionRecord`] invariants; the engine does not re-validate.

use std::path::Path;

use crate::domain::error::ReportError;
use crate::domain::transaction::TransactionRecord;

pub trait ActivityPort {
    fn load_activities(&self, path: &Path) -> Result<Vec<TransactionRecord>, ReportError>;
}
