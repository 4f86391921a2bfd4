use bstr::ByteSlice;

/// A zero-based line/character location in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Maps byte offsets (such as [`crate::ParseError::offset`]) to
/// line/character positions. Lines are delimited by the ECMAScript
/// line terminators: LF, CRLF, CR, U+2028 and U+2029.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    line_starts: Vec<usize>,
}

impl SourceLocator {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < source.len() {
            match source[i] {
                b'\n' => {
                    i += 1;
                    line_starts.push(i);
                }
                b'\r' => {
                    i += if source.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_starts.push(i);
                }
                0xe2 if source.get(i + 1) == Some(&0x80)
                    && matches!(source.get(i + 2), Some(0xa8) | Some(0xa9)) =>
                {
                    i += 3;
                    line_starts.push(i);
                }
                _ => i += 1,
            }
        }
        SourceLocator { line_starts }
    }

    fn position_general<F>(&self, source: &[u8], offset: usize, counter: F) -> Position
    where
        F: FnOnce(&[u8]) -> u32,
    {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = counter(&source[self.line_starts[line]..offset]);
        Position {
            line: line as u32,
            character,
        }
    }

    /// Position with the character measured in bytes.
    pub fn position_utf8(&self, source: &[u8], offset: usize) -> Position {
        self.position_general(source, offset, |line| line.len() as u32)
    }

    /// Position with the character measured in UTF-16 code units.
    pub fn position_utf16(&self, source: &[u8], offset: usize) -> Position {
        self.position_general(source, offset, |line| {
            line.chars()
                .map(|ch| if (ch as u32) < 0x10000 { 1 } else { 2 })
                .sum()
        })
    }
}
