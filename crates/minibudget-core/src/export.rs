//! CSV export

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;

pub const EXPORT_HEADER: [&str; 5] = ["ID", "Description", "Amount", "Category", "Date"];

/// Render the collection as CSV in file order, `\n` line endings
pub fn export_csv(transactions: &[Transaction]) -> CoreResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let write_err = |e: csv::Error| CoreError::InternalError { message: format!("CSV export failed: {}", e) };

    writer.write_record(EXPORT_HEADER).map_err(write_err)?;
    for tx in transactions {
        writer
            .write_record([
                tx.id.as_str(),
                tx.description.as_str(),
                tx.amount.to_string().as_str(),
                tx.category.as_str(),
                tx.date.as_str(),
            ])
            .map_err(write_err)?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::InternalError {
        message: format!("CSV export failed: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| CoreError::InternalError { message: e.to_string() })
}
