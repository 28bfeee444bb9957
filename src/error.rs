use thiserror::Error;

/// Decode-side failure: the encoded stream does not parse as a run
/// sequence. The offset always points at the offending control byte.
///
/// Encoding has no error path; any finite byte sequence encodes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleError {
    #[error(
        "truncated stream: control byte at offset {offset} declares \
         {expected} payload byte(s) but only {remaining} remain"
    )]
    Truncated {
        offset: usize,
        expected: usize,
        remaining: usize,
    },

    #[error("zero-length run at offset {offset}")]
    ZeroLengthRun { offset: usize },
}
