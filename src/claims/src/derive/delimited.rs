//! Delimited-text splitting
//!
//! Splits a free-text claim value (e.g., `"Engineer, Manager ,  , Lead"`) on a
//! single delimiter in one left-to-right pass. Segments are borrowed slices of
//! the source value; nothing is allocated until a segment survives trimming.

/// Upper bound on the number of segments in `value`: `count(delimiter) + 1`
pub fn segment_bound(value: &str, delimiter: char) -> usize {
    value.matches(delimiter).count() + 1
}

/// Iterator over the raw (untrimmed) segments of a delimited value
///
/// Always yields `segment_bound(value, delimiter)` items, including empty
/// segments between adjacent delimiters and the trailing segment after the
/// last delimiter.
#[derive(Debug, Clone)]
pub struct DelimitedSegments<'a> {
    value: &'a str,
    delimiter: char,
    start: usize,
    finished: bool,
}

impl<'a> DelimitedSegments<'a> {
    pub fn new(value: &'a str, delimiter: char) -> Self {
        Self {
            value,
            delimiter,
            start: 0,
            finished: false,
        }
    }

    /// Trimmed, non-empty segments only
    pub fn trimmed(self) -> impl Iterator<Item = &'a str> {
        self.map(str::trim).filter(|segment| !segment.is_empty())
    }
}

impl<'a> Iterator for DelimitedSegments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let rest = &self.value[self.start..];
        match rest.find(self.delimiter) {
            Some(offset) => {
                let segment = &rest[..offset];
                self.start += offset + self.delimiter.len_utf8();
                Some(segment)
            }
            None => {
                // Flush the trailing segment, empty if the value ends on a delimiter
                self.finished = true;
                self.start = self.value.len();
                Some(rest)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (1, Some(self.value.len() - self.start + 1))
        }
    }
}

impl std::iter::FusedIterator for DelimitedSegments<'_> {}
