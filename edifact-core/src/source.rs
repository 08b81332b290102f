//! Input sources and incremental character decoding.
//!
//! Bytes are decoded chunk by chunk with `encoding_rs`, so a large
//! interchange never needs to sit in memory as a whole. Characters can be
//! pushed back, which the transcoder uses to rewind after peeking at the
//! leading tag.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

use crate::error::{Error, Result};

const CHUNK_SIZE: usize = 8 * 1024;

/// Where an interchange comes from.
pub enum Source<'r> {
    /// Already decoded text.
    Text(&'r str),
    /// A byte stream, decoded with the given encoding label (for example
    /// `"iso-8859-1"`). UTF-8 when no label is given.
    Bytes {
        reader: Box<dyn Read + 'r>,
        encoding: Option<String>,
    },
    /// A file on disk, decoded like [`Source::Bytes`].
    Path {
        path: PathBuf,
        encoding: Option<String>,
    },
}

impl<'r> Source<'r> {
    /// Byte stream in UTF-8.
    pub fn reader(reader: impl Read + 'r) -> Self {
        Source::Bytes {
            reader: Box::new(reader),
            encoding: None,
        }
    }

    /// Byte stream with a declared encoding label.
    pub fn reader_with_encoding(reader: impl Read + 'r, encoding: impl Into<String>) -> Self {
        Source::Bytes {
            reader: Box::new(reader),
            encoding: Some(encoding.into()),
        }
    }

    /// File path, UTF-8.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path {
            path: path.into(),
            encoding: None,
        }
    }

    /// Open the source as a decoding character reader.
    pub fn open(self) -> Result<CharSource<'r>> {
        match self {
            Source::Text(text) => Ok(CharSource::new(Box::new(text.as_bytes()), UTF_8)),
            Source::Bytes { reader, encoding } => {
                Ok(CharSource::new(reader, resolve_encoding(encoding.as_deref())?))
            }
            Source::Path { path, encoding } => {
                let encoding = resolve_encoding(encoding.as_deref())?;
                let file = File::open(&path)?;
                Ok(CharSource::new(Box::new(BufReader::new(file)), encoding))
            }
        }
    }
}

impl<'r> From<&'r str> for Source<'r> {
    fn from(text: &'r str) -> Self {
        Source::Text(text)
    }
}

impl<'r> From<&'r [u8]> for Source<'r> {
    fn from(bytes: &'r [u8]) -> Self {
        Source::reader(bytes)
    }
}

fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        None => Ok(UTF_8),
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::stream_format(format!("unknown encoding `{}`", label))),
    }
}

/// Decodes a byte reader into characters on demand.
pub struct CharSource<'r> {
    reader: Box<dyn Read + 'r>,
    decoder: Decoder,
    bytes: Box<[u8]>,
    chars: VecDeque<char>,
    finished: bool,
}

impl<'r> CharSource<'r> {
    pub(crate) fn new(reader: Box<dyn Read + 'r>, encoding: &'static Encoding) -> Self {
        Self {
            reader,
            decoder: encoding.new_decoder(),
            bytes: vec![0; CHUNK_SIZE].into_boxed_slice(),
            chars: VecDeque::new(),
            finished: false,
        }
    }

    /// Next decoded character, `None` at end of input.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        while self.chars.is_empty() && !self.finished {
            self.fill()?;
        }
        Ok(self.chars.pop_front())
    }

    /// Push characters back so they are returned again, in order, before
    /// anything not yet read.
    pub fn unread(&mut self, chars: &[char]) {
        for &c in chars.iter().rev() {
            self.chars.push_front(c);
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.reader.read(&mut self.bytes) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let last = n == 0;
        let mut consumed = 0;
        loop {
            let capacity = self
                .decoder
                .max_utf8_buffer_length(n - consumed)
                .unwrap_or(CHUNK_SIZE * 4);
            let mut text = String::with_capacity(capacity.max(4));
            let (result, read, _) =
                self.decoder
                    .decode_to_string(&self.bytes[consumed..n], &mut text, last);
            consumed += read;
            self.chars.extend(text.chars());
            if matches!(result, CoderResult::InputEmpty) {
                break;
            }
        }
        if last {
            self.finished = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut CharSource<'_>) -> String {
        let mut out = String::new();
        while let Some(c) = source.next_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_text_source() {
        let mut source = Source::from("UNH+1'").open().unwrap();
        assert_eq!(drain(&mut source), "UNH+1'");
    }

    #[test]
    fn test_latin1_bytes() {
        let bytes: &[u8] = b"FTX+AAA+++M\xfcller'";
        let mut source = Source::reader_with_encoding(bytes, "iso-8859-1").open().unwrap();
        assert_eq!(drain(&mut source), "FTX+AAA+++Müller'");
    }

    #[test]
    fn test_unknown_encoding() {
        let bytes: &[u8] = b"UNB'";
        let err = Source::reader_with_encoding(bytes, "no-such-charset").open().err().unwrap();
        assert!(matches!(err, Error::StreamFormat(_)));
    }

    #[test]
    fn test_unread_restores_order() {
        let mut source = Source::from("ABCD").open().unwrap();
        let a = source.next_char().unwrap().unwrap();
        let b = source.next_char().unwrap().unwrap();
        source.unread(&[a, b]);
        assert_eq!(drain(&mut source), "ABCD");
    }

    #[test]
    fn test_multibyte_across_chunks() {
        let mut text = "A".repeat(CHUNK_SIZE - 1);
        text.push('é');
        text.push_str("Z'");
        let mut source = Source::reader(text.as_bytes()).open().unwrap();
        assert_eq!(drain(&mut source), text);
    }
}
