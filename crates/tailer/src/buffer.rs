//! Bounded console buffer

use labconsole_common::LogChunk;
use std::collections::VecDeque;

/// What a chunk did to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferUpdate {
    /// Lines were added after the existing content.
    Appended(Vec<String>),
    /// The chunk held at least a full buffer of lines; all prior content was dropped.
    Replaced(Vec<String>),
}

impl BufferUpdate {
    pub fn lines(&self) -> &[String] {
        match self {
            BufferUpdate::Appended(lines) | BufferUpdate::Replaced(lines) => lines,
        }
    }
}

/// Console lines plus the cursor for the next fetch
#[derive(Debug, Clone)]
pub struct ConsoleBuffer {
    lines: VecDeque<String>,
    offset: Option<u64>,
    max_lines: usize,
}

impl ConsoleBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            offset: None,
            max_lines: max_lines.max(1),
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Resume cursor; `None` means fetch from the beginning.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Drop all lines and forget the resume cursor.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.offset = None;
    }

    /// Apply a fetched chunk.
    ///
    /// The first line of every chunk repeats the last line already delivered
    /// and is discarded.
    pub fn apply(&mut self, chunk: &LogChunk) -> BufferUpdate {
        let fresh: Vec<String> = chunk.lines.iter().skip(1).cloned().collect();

        let update = if fresh.len() >= self.max_lines {
            let tail = fresh[fresh.len() - self.max_lines..].to_vec();
            self.lines = tail.iter().cloned().collect();
            BufferUpdate::Replaced(tail)
        } else {
            self.lines.extend(fresh.iter().cloned());
            while self.lines.len() > self.max_lines {
                self.lines.pop_front();
            }
            BufferUpdate::Appended(fresh)
        };

        // Points at the last consumed byte so the next chunk re-sends that line.
        self.offset = Some(chunk.offset.saturating_add(chunk.length).saturating_sub(1));
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(lines: &[&str], offset: u64, length: u64) -> LogChunk {
        LogChunk {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            offset,
            length,
        }
    }

    fn numbered(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_first_line_dropped() {
        let mut buffer = ConsoleBuffer::new(200);
        let update = buffer.apply(&chunk(&["x", "hello"], 0, 10));

        assert_eq!(update, BufferUpdate::Appended(vec!["hello".to_string()]));
        assert_eq!(buffer.to_vec(), vec!["hello"]);
        assert_eq!(buffer.offset(), Some(9));
    }

    #[test]
    fn test_sentinel_not_duplicated() {
        let mut buffer = ConsoleBuffer::new(200);
        buffer.apply(&chunk(&["x", "hello"], 0, 10));
        buffer.apply(&chunk(&["hello", "world"], 9, 6));

        assert_eq!(buffer.to_vec(), vec!["hello", "world"]);
        assert_eq!(buffer.offset(), Some(14));
    }

    #[test]
    fn test_append_truncates_oldest() {
        let mut buffer = ConsoleBuffer::new(5);
        let mut first = vec!["sentinel".to_string()];
        first.extend(numbered("a", 4));
        buffer.apply(&LogChunk { lines: first, offset: 0, length: 40 });

        let mut second = vec!["a3".to_string()];
        second.extend(numbered("b", 3));
        let update = buffer.apply(&LogChunk { lines: second, offset: 39, length: 30 });

        assert!(matches!(update, BufferUpdate::Appended(ref l) if l.len() == 3));
        assert_eq!(buffer.to_vec(), vec!["a2", "a3", "b0", "b1", "b2"]);
    }

    #[test]
    fn test_full_chunk_replaces_history() {
        let mut buffer = ConsoleBuffer::new(5);
        buffer.apply(&chunk(&["s", "old1", "old2"], 0, 10));

        let mut big = vec!["old2".to_string()];
        big.extend(numbered("n", 8));
        let update = buffer.apply(&LogChunk { lines: big, offset: 9, length: 100 });

        let expected: Vec<String> = numbered("n", 8)[3..].to_vec();
        assert_eq!(update, BufferUpdate::Replaced(expected.clone()));
        assert_eq!(buffer.to_vec(), expected);
    }

    #[test]
    fn test_exactly_max_lines_replaces() {
        let mut buffer = ConsoleBuffer::new(3);
        buffer.apply(&chunk(&["s", "keep?"], 0, 5));

        let update = buffer.apply(&chunk(&["keep?", "1", "2", "3"], 4, 6));
        assert!(matches!(update, BufferUpdate::Replaced(_)));
        assert_eq!(buffer.to_vec(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_bounded_over_many_appends() {
        let mut buffer = ConsoleBuffer::new(7);
        let mut offset = 0;
        for round in 0..50 {
            let n = (round % 9) + 1;
            let mut lines = vec!["sentinel".to_string()];
            lines.extend(numbered(&format!("r{round}-"), n));
            buffer.apply(&LogChunk { lines, offset, length: 10 });
            offset += 9;
            assert!(buffer.len() <= buffer.max_lines());
        }
    }

    #[test]
    fn test_empty_chunk() {
        let mut buffer = ConsoleBuffer::new(10);
        buffer.apply(&chunk(&["s", "a"], 0, 3));

        let update = buffer.apply(&chunk(&[], 2, 0));
        assert_eq!(update, BufferUpdate::Appended(Vec::new()));
        assert_eq!(buffer.to_vec(), vec!["a"]);
        assert_eq!(buffer.offset(), Some(1));
    }

    #[test]
    fn test_offset_saturates_at_zero() {
        let mut buffer = ConsoleBuffer::new(10);
        buffer.apply(&chunk(&[], 0, 0));
        assert_eq!(buffer.offset(), Some(0));
    }

    #[test]
    fn test_offset_saturates_at_max() {
        let mut buffer = ConsoleBuffer::new(10);
        let update = buffer.apply(&chunk(&["s", "a"], u64::MAX, 2));

        assert_eq!(update, BufferUpdate::Appended(vec!["a".to_string()]));
        assert_eq!(buffer.offset(), Some(u64::MAX - 1));
    }

    #[test]
    fn test_large_limit_allocates_lazily() {
        let mut buffer = ConsoleBuffer::new(usize::MAX / 2);
        assert!(buffer.is_empty());

        buffer.apply(&chunk(&["s", "a", "b"], 0, 5));
        assert_eq!(buffer.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear_resets_offset() {
        let mut buffer = ConsoleBuffer::new(10);
        buffer.apply(&chunk(&["s", "a"], 0, 3));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.offset(), None);
    }
}
