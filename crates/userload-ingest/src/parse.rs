//! Raw row to candidate record parsing.

use thiserror::Error;

use userload_model::CandidateRecord;

/// Row had fewer than three usable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed row: expected at least 3 fields, found {found}")]
pub struct MalformedRow {
    pub found: usize,
}

/// Build a [`CandidateRecord`] from the fields of one row.
///
/// The first three fields are taken verbatim (untrimmed); trailing fields
/// beyond the third are ignored. No side effects.
pub fn parse_row(fields: &[String]) -> Result<CandidateRecord, MalformedRow> {
    if fields.len() < 3 {
        return Err(MalformedRow {
            found: fields.len(),
        });
    }
    Ok(CandidateRecord {
        name: fields[0].clone(),
        surname: fields[1].clone(),
        email: fields[2].clone(),
    })
}
