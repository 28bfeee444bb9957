use crate::{CONTROL_BIT, MAX_RUN_LEN};
use std::fmt::Debug;
use std::{fmt, io, mem};

/// Streaming run-length encoder writing the encoded stream to `W`.
///
/// Feed input bytes with [`update`](Rle::update) (or through the
/// [`io::Write`] impl) and close the stream with [`finalize`](Rle::finalize);
/// the last open run is only flushed on finalize.
pub struct Rle<W> {
    status: RleStatus,
    writer: W,
}

#[derive(Clone)]
enum RleStatus {
    /// Nothing buffered.
    Wait,
    /// `count` consecutive occurrences of `value`. `count == 1` is still
    /// mode-undecided: a following different byte turns it into a literal.
    Repeat { value: u8, count: u8 },
    /// Buffered non-repeating bytes; no two adjacent bytes in `buf` are
    /// equal, otherwise the tail would already have become a repeat.
    Literal { buf: Vec<u8> },
}

impl<W: io::Write> Rle<W> {
    pub fn new(writer: W) -> Self {
        Rle {
            status: RleStatus::Wait,
            writer,
        }
    }

    #[inline(always)]
    pub fn update(&mut self, byte: u8) -> io::Result<()> {
        trace!("update byte 0x{byte:02X}");
        trace!("current status {:?}", self.status);
        match mem::replace(&mut self.status, RleStatus::Wait) {
            RleStatus::Wait => {
                self.status = RleStatus::Repeat {
                    value: byte,
                    count: 1,
                };
            }
            RleStatus::Repeat { value, count } if value == byte => {
                let count = count + 1;
                if count == MAX_RUN_LEN {
                    // length field is full, the next byte opens a fresh run
                    emit_repeat(&mut self.writer, value, count)?;
                } else {
                    self.status = RleStatus::Repeat { value, count };
                }
            }
            RleStatus::Repeat { value, count: 1 } => {
                // a lone byte followed by a different one builds a literal
                self.status = RleStatus::Literal {
                    buf: vec![value, byte],
                };
            }
            RleStatus::Repeat { value, count } => {
                emit_repeat(&mut self.writer, value, count)?;
                self.status = RleStatus::Repeat {
                    value: byte,
                    count: 1,
                };
            }
            RleStatus::Literal { mut buf } => {
                if buf.last() == Some(&byte) {
                    // the boundary byte opens the repeat, not the literal
                    // before it
                    buf.pop();
                    if !buf.is_empty() {
                        emit_literal(&mut self.writer, &buf)?;
                    }
                    self.status = RleStatus::Repeat {
                        value: byte,
                        count: 2,
                    };
                } else {
                    buf.push(byte);
                    if buf.len() == MAX_RUN_LEN as usize {
                        emit_literal(&mut self.writer, &buf)?;
                    } else {
                        self.status = RleStatus::Literal { buf };
                    }
                }
            }
        }
        trace!("transit to {:?}", self.status);
        Ok(())
    }

    pub fn finalize(mut self) -> io::Result<()> {
        trace!("last block: {:?}", self.status);
        match mem::replace(&mut self.status, RleStatus::Wait) {
            RleStatus::Wait => {}
            // a lone trailing byte is a literal of length 1, so a singleton
            // has exactly one encoding
            RleStatus::Repeat { value, count: 1 } => emit_literal(&mut self.writer, &[value])?,
            RleStatus::Repeat { value, count } => emit_repeat(&mut self.writer, value, count)?,
            RleStatus::Literal { buf } => emit_literal(&mut self.writer, &buf)?,
        }
        self.writer.flush()
    }
}

#[inline(always)]
fn emit_repeat<W: io::Write>(writer: &mut W, value: u8, count: u8) -> io::Result<()> {
    debug_assert!(count >= 2);
    debug_assert!(count <= MAX_RUN_LEN);
    trace!("emit repeat len={count} value=0x{value:02X}");
    writer.write_all(&[CONTROL_BIT | count, value])
}

#[inline(always)]
fn emit_literal<W: io::Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    debug_assert!(!bytes.is_empty());
    debug_assert!(bytes.len() <= MAX_RUN_LEN as usize);
    trace!("emit literal len={}", bytes.len());
    writer.write_all(&[bytes.len() as u8])?;
    writer.write_all(bytes)
}

impl Debug for RleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RleStatus::Repeat { value, count } => f
                .debug_struct("Repeat")
                .field("value", &format!("0x{value:02X}"))
                .field("count", &count)
                .finish(),
            RleStatus::Literal { buf } => {
                f.debug_struct("Literal").field("len", &buf.len()).finish()
            }
            RleStatus::Wait => f.write_str("Wait"),
        }
    }
}

impl<W: io::Write> io::Write for Rle<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for byte in buf.iter() {
            self.update(*byte)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encode `data` into a freshly allocated byte stream.
///
/// Total: every input has an encoding, empty in gives empty out.
pub fn encode(data: &[u8]) -> Vec<u8> {
    // worst case adds one control byte per 127 input bytes
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_RUN_LEN as usize + 1);
    let mut rle = Rle::new(&mut out);
    for byte in data.iter() {
        rle.update(*byte).expect("writing to a Vec does not fail");
    }
    rle.finalize().expect("writing to a Vec does not fail");
    out
}

#[cfg(test)]
mod tests {
    use super::{encode, Rle};
    use crate::{describe, setup, TEST_VECTOR};
    use std::io::Write;

    #[test]
    fn test_encode_vectors() {
        setup();
        for (input, expected) in TEST_VECTOR.into_iter() {
            let encoded = encode(input.as_bytes());
            assert_eq!(expected, describe(&encoded).unwrap(), "input {input:?}");
        }
    }

    #[test]
    fn test_encode_wire_bytes() {
        setup();
        // [r4]a [s6]bcbcbc [r4]d
        let expected = hex::decode("8461066263626362638464").unwrap();
        assert_eq!(expected, encode(b"aaaabcbcbcdddd"));
        // [r3]a [r3]q [r2]s [s2]rt [r2]p
        let expected = hex::decode("8361837182730272748270").unwrap();
        assert_eq!(expected, encode(b"aaaqqqssrtpp"));
    }

    #[test]
    fn test_encode_empty() {
        setup();
        assert!(encode(b"").is_empty());
    }

    #[test]
    fn test_encode_singleton_is_literal() {
        setup();
        for byte in [0x00, b'a', 0x7F, 0x80, 0xFF] {
            assert_eq!(vec![0x01, byte], encode(&[byte]));
        }
    }

    #[test]
    fn test_repeat_cap_split() {
        setup();
        assert_eq!(vec![0xFF, b'a'], encode(&[b'a'; 127]));
        assert_eq!(vec![0xFF, b'a', 0x01, b'a'], encode(&[b'a'; 128]));
        assert_eq!(vec![0xFF, b'a', 0x82, b'a'], encode(&[b'a'; 129]));
        assert_eq!(vec![0xFF, b'a', 0xFF, b'a'], encode(&[b'a'; 254]));
    }

    #[test]
    fn test_literal_cap_split() {
        setup();
        // 130 alternating bytes, no two adjacent equal
        let input: Vec<u8> = (0..130u32)
            .map(|i| if i % 2 == 0 { b'a' } else { b'b' })
            .collect();
        let encoded = encode(&input);
        assert_eq!(0x7F, encoded[0]);
        assert_eq!(input[..127], encoded[1..128]);
        assert_eq!(0x03, encoded[128]);
        assert_eq!(input[127..], encoded[129..]);
        assert_eq!(1 + 127 + 1 + 3, encoded.len());
    }

    #[test]
    fn test_trailing_pair_is_repeat() {
        setup();
        assert_eq!("[s1]x[r2]a", describe(&encode(b"xaa")).unwrap());
        assert_eq!("[s3]xya[r2]b", describe(&encode(b"xyabb")).unwrap());
    }

    #[test]
    fn test_streaming_matches_slice_encode() {
        setup();
        let input = b"aaaabcbcbcddddxyzzzz";
        for chunk in [1, 2, 3, 7, input.len()] {
            let mut out = vec![];
            let mut rle = Rle::new(&mut out);
            for piece in input.chunks(chunk) {
                rle.write_all(piece).unwrap();
            }
            rle.finalize().unwrap();
            assert_eq!(encode(input), out, "chunk size {chunk}");
        }
    }
}
