use crate::error::RleError;
use crate::{CONTROL_BIT, MAX_RUN_LEN};

/// One parsed run, borrowing its payload from the encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    /// `count` occurrences of `value`.
    Repeat { count: u8, value: u8 },
    /// Bytes copied verbatim.
    Literal(&'a [u8]),
}

/// Iterator over the runs of an encoded stream.
///
/// Yields `Err` once and then fuses when the stream is malformed: a control
/// byte declaring more payload than the buffer holds, or a zero length
/// field. Both [`decode`] and [`crate::describe`] parse through here, so
/// there is exactly one run parser in the crate.
pub struct Runs<'a> {
    rest: &'a [u8],
    offset: usize,
}

impl<'a> Runs<'a> {
    pub fn new(encoded: &'a [u8]) -> Self {
        Runs {
            rest: encoded,
            offset: 0,
        }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Result<Run<'a>, RleError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&control, rest) = self.rest.split_first()?;
        let count = control & MAX_RUN_LEN;
        trace!(
            "control 0x{control:02X} at offset {}: repeat={} len={count}",
            self.offset,
            control & CONTROL_BIT != 0
        );
        if count == 0 {
            self.rest = &[];
            return Some(Err(RleError::ZeroLengthRun {
                offset: self.offset,
            }));
        }
        let expected = if control & CONTROL_BIT != 0 {
            1
        } else {
            count as usize
        };
        if rest.len() < expected {
            let err = RleError::Truncated {
                offset: self.offset,
                expected,
                remaining: rest.len(),
            };
            self.rest = &[];
            return Some(Err(err));
        }
        let (payload, rest) = rest.split_at(expected);
        self.offset += 1 + expected;
        self.rest = rest;
        Some(Ok(if control & CONTROL_BIT != 0 {
            Run::Repeat {
                count,
                value: payload[0],
            }
        } else {
            Run::Literal(payload)
        }))
    }
}

/// Decode an encoded stream back into the original bytes.
///
/// Either the whole stream parses and the full original is returned, or a
/// [`RleError`] says where parsing ran out; there is no partial output.
pub fn decode(encoded: &[u8]) -> Result<Vec<u8>, RleError> {
    let mut out = Vec::with_capacity(encoded.len());
    for run in Runs::new(encoded) {
        match run? {
            Run::Repeat { count, value } => {
                out.resize(out.len() + count as usize, value);
            }
            Run::Literal(bytes) => out.extend_from_slice(bytes),
        }
    }
    Ok(out)
}
