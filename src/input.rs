//! Input reader: an ordered queue of byte sources, drained front to back,
//! tracking line position for diagnostics. Grounded in the teacher's
//! `FileHandle`/`reader: Vec<FileHandle>` stack (`reader.last()`,
//! `reader.pop()` on EOF) but generalized to any byte source rather than
//! files/stdin specifically, since this spec treats both the embedded THIRD
//! bootstrap text and stdin as the same kind of queued source.

use crate::error::{FirstError, FirstResult};
use std::collections::VecDeque;
use std::io::Read;

struct Source {
    name: String,
    reader: Box<dyn Read>,
}

pub struct InputReader {
    queue: VecDeque<Source>,
    line: String,
    line_no: u64,
    prev_line: String,
    prev_line_no: u64,
    current_name: String,
}

impl InputReader {
    pub fn new() -> Self {
        InputReader {
            queue: VecDeque::new(),
            line: String::new(),
            line_no: 1,
            prev_line: String::new(),
            prev_line_no: 0,
            current_name: String::new(),
        }
    }

    pub fn push_bytes(&mut self, name: &str, bytes: Vec<u8>) {
        self.queue.push_back(Source {
            name: name.to_string(),
            reader: Box::new(std::io::Cursor::new(bytes)),
        });
    }

    pub fn push_stdin(&mut self) {
        self.queue.push_back(Source {
            name: "<stdin>".to_string(),
            reader: Box::new(std::io::stdin()),
        });
    }

    fn next_byte(&mut self) -> FirstResult<Option<u8>> {
        loop {
            let source = match self.queue.front_mut() {
                Some(s) => s,
                None => return Ok(None),
            };
            self.current_name = source.name.clone();
            let mut buf = [0u8; 1];
            match source.reader.read(&mut buf) {
                Ok(0) => {
                    self.queue.pop_front();
                    continue;
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) => return Err(FirstError::IoFailure(e.to_string())),
            }
        }
    }

    /// Read one rune, tracking line position. EOF is a distinct failure, not
    /// a halt — the caller decides what that means.
    pub fn read_rune(&mut self) -> FirstResult<i64> {
        loop {
            match self.next_byte()? {
                None => return Err(FirstError::Eof),
                Some(0) => continue,
                Some(b) => {
                    if b == b'\n' {
                        self.prev_line = std::mem::take(&mut self.line);
                        self.prev_line_no = self.line_no;
                        self.line.clear();
                        self.line_no += 1;
                    } else {
                        self.line.push(b as char);
                    }
                    return Ok(b as i64);
                }
            }
        }
    }

    pub fn current_line(&self) -> (&str, u64, &str) {
        (&self.current_name, self.line_no, &self.line)
    }

    pub fn previous_line(&self) -> (u64, &str) {
        (self.prev_line_no, &self.prev_line)
    }
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rune_across_sources() {
        let mut r = InputReader::new();
        r.push_bytes("a", b"ab".to_vec());
        r.push_bytes("b", b"c".to_vec());
        assert_eq!(r.read_rune().unwrap(), b'a' as i64);
        assert_eq!(r.read_rune().unwrap(), b'b' as i64);
        assert_eq!(r.read_rune().unwrap(), b'c' as i64);
        assert!(matches!(r.read_rune(), Err(FirstError::Eof)));
    }

    #[test]
    fn test_null_rune_skipped() {
        let mut r = InputReader::new();
        r.push_bytes("a", vec![0, b'x']);
        assert_eq!(r.read_rune().unwrap(), b'x' as i64);
    }

    #[test]
    fn test_newline_tracks_lines() {
        let mut r = InputReader::new();
        r.push_bytes("a", b"ab\ncd".to_vec());
        for _ in 0..3 {
            r.read_rune().unwrap();
        }
        let (_, line_no, line) = r.current_line();
        assert_eq!(line_no, 2);
        assert_eq!(line, "");
        let (prev_no, prev) = r.previous_line();
        assert_eq!(prev_no, 1);
        assert_eq!(prev, "ab");
    }
}
