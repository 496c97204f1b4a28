//! Byte/substring search helpers used by the tokenizer.
//!
//! Replaces the teacher's hand-rolled `strpos`/`stripos` loops
//! (`str_fns.rs`) with `memchr`, which is both correct at the boundary (the
//! teacher's `offset..(s.len() - p_len)` range excludes the last valid
//! match position) and faster.

use memchr::memchr;
use memchr::memmem;

/// Finds the first occurrence of `needle` at or after `offset`.
pub fn find_byte(haystack: &[u8], needle: u8, offset: usize) -> Option<usize> {
    if offset > haystack.len() {
        return None;
    }
    memchr(needle, &haystack[offset..]).map(|pos| pos + offset)
}

/// Finds the first occurrence of the byte string `pattern` at or after
/// `offset`, case-sensitively.
pub fn find_subslice(haystack: &[u8], pattern: &[u8], offset: usize) -> Option<usize> {
    if offset > haystack.len() {
        return None;
    }
    memmem::find(&haystack[offset..], pattern).map(|pos| pos + offset)
}

/// Finds the first occurrence of `pattern` at or after `offset`, treating
/// ASCII letters case-insensitively. `pattern` must already be one fixed
/// case; this scans byte-by-byte since `memchr` has no case-folding mode.
pub fn find_subslice_ci(haystack: &[u8], pattern: &[u8], offset: usize) -> Option<usize> {
    let p_len = pattern.len();
    if p_len == 0 {
        return Some(offset);
    }
    if offset + p_len > haystack.len() {
        return None;
    }

    let first = pattern[0].to_ascii_lowercase();
    let mut at = offset;
    loop {
        let candidate = memchr(first, &haystack[at..])
            .or_else(|| memchr(first.to_ascii_uppercase(), &haystack[at..]));
        let candidate = match candidate {
            Some(pos) => at + pos,
            None => return None,
        };

        if candidate + p_len > haystack.len() {
            return None;
        }

        if haystack[candidate..candidate + p_len].eq_ignore_ascii_case(pattern) {
            return Some(candidate);
        }

        at = candidate + 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn find_byte_basic() {
        assert_eq!(find_byte(b"abc", b'c', 0), Some(2));
        assert_eq!(find_byte(b"abc", b'z', 0), None);
        assert_eq!(find_byte(b"abcabc", b'a', 1), Some(3));
    }

    #[test]
    fn find_subslice_matches_at_end() {
        // The teacher's strpos has an off-by-one that misses a match whose
        // start is the last valid position; this must not reproduce it.
        assert_eq!(find_subslice(b"xy--", b"--", 0), Some(2));
        assert_eq!(find_subslice(b"--", b"--", 0), Some(0));
    }

    #[test]
    fn find_subslice_ci_basic() {
        assert_eq!(find_subslice_ci(b"<SCRIPT>", b"<script", 0), Some(0));
        assert_eq!(find_subslice_ci(b"text</Script>", b"</script", 0), Some(4));
        assert_eq!(find_subslice_ci(b"nope", b"</script", 0), None);
    }
}
