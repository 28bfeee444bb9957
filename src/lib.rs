//! # Byte RLE Encoding Scheme
//!
//! PackBits-style: the stream is a sequence of runs, each introduced by a
//! one-byte control header.
//!
//! ```text
//!         MSB    LSB
//!          │      │
//!          ▼      ▼
//!         1LLL LLLL  VVVV VVVV
//!         ▲          ▲
//! REPEAT──┘          └─ the value, repeated L times on decode
//! ```
//!
//! A repeat run is always 2 bytes on the wire, no matter how long the
//! repeated stretch is.
//!
//! ```text
//!         MSB    LSB
//!          │      │
//!          ▼      ▼
//!         0LLL LLLL  <L payload bytes, copied verbatim>
//!         ▲
//! LITERAL─┘
//! ```
//!
//! L is a 7-bit unsigned length in `1..=127`; 127 is the hard cap on any
//! single run, so a longer stretch splits into several runs. Thus, in best
//! case, 2 bytes encode 127 input bytes (efficiency ~63.5); in worst case,
//! 128 bytes encode 127 input bytes (efficiency ~0.99).
//!
//! The encoding does not include size. There is no magic number, length
//! prefix, or checksum; the decoder parses runs until the buffer is
//! exhausted, and the caller MUST know where the stream ends (an outer
//! framing layer, if any, is the caller's business).
//!
//! Encoding is canonical: a single buffered byte always encodes as a
//! literal of length 1, never a repeat of length 1, so every input has
//! exactly one encoding.

#[macro_use]
extern crate log;

mod derle;
mod dump;
mod error;
mod rle;

pub use derle::{decode, Run, Runs};
pub use dump::describe;
pub use error::RleError;
pub use rle::{encode, Rle};

/// Control-byte flag: set for a repeat run, clear for a literal run.
const CONTROL_BIT: u8 = 0x80;
/// Largest run length the 7-bit length field can hold.
const MAX_RUN_LEN: u8 = 0x7F;

#[cfg(test)]
static INIT: std::sync::Once = std::sync::Once::new();

/// Setup function that is only run once, even if called multiple times.
///
/// Shared by every test module; the logger can only be installed once per
/// process, so the guarding `Once` has to live at the crate level.
#[cfg(test)]
pub(crate) fn setup() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

/// (input, expected annotation) pairs shared by the codec test modules.
#[cfg(test)]
const TEST_VECTOR: [(&str, &str); 8] = [
    ("", ""),
    ("a", "[s1]a"),
    ("aa", "[r2]a"),
    ("ba", "[s2]ba"),
    ("abc", "[s3]abc"),
    ("xaa", "[s1]x[r2]a"),
    ("aaaabcbcbcdddd", "[r4]a[s6]bcbcbc[r4]d"),
    ("aaaqqqssrtpp", "[r3]a[r3]q[r2]s[s2]rt[r2]p"),
];
