use crate::derle::{Run, Runs};
use crate::error::RleError;

/// Render an encoded stream as a human-readable annotation, one bracketed
/// tag per run: `[r<len>]<value>` for a repeat, `[s<len>]<bytes>` for a
/// literal. Payload bytes are shown as chars, one-to-one.
///
/// This is the decoder's parse loop minus the reconstruction, so it is the
/// test oracle for the encoder: same runs, same lengths, same payloads.
pub fn describe(encoded: &[u8]) -> Result<String, RleError> {
    let mut out = String::new();
    for run in Runs::new(encoded) {
        match run? {
            Run::Repeat { count, value } => {
                out.push_str(&format!("[r{count}]"));
                out.push(char::from(value));
            }
            Run::Literal(bytes) => {
                out.push_str(&format!("[s{}]", bytes.len()));
                out.extend(bytes.iter().copied().map(char::from));
            }
        }
    }
    Ok(out)
}
