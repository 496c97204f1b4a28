//! Sorted tag-name lookup tables, searched with `binary_search` as
//! `spec.md` §4.2.5 requires.
//!
//! Matches `original_source/DomTree.h`'s `self_closing_tags` /
//! `non_valid_tags` `constexpr` arrays exactly: same 16 void tags, same
//! 1-entry blacklist, same alphabetical order.

/// Tags with no closing counterpart; their nodes never get children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Tag names that are dropped on sight, along with the rest of their tag
/// syntax.
const INVALID_TAGS: &[&str] = &["align"];

pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.binary_search(&name).is_ok()
}

pub fn is_invalid_tag(name: &str) -> bool {
    INVALID_TAGS.binary_search(&name).is_ok()
}

/// The three raw-text elements whose contents are scanned verbatim until a
/// matching closing tag, never re-parsed as markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTextMode {
    None,
    Script,
    Style,
    Svg,
}

impl RawTextMode {
    pub fn for_tag(name: &str) -> Self {
        match name {
            "script" => RawTextMode::Script,
            "style" => RawTextMode::Style,
            "svg" => RawTextMode::Svg,
            _ => RawTextMode::None,
        }
    }

    pub fn closing_tag(self) -> Option<&'static [u8]> {
        match self {
            RawTextMode::Script => Some(b"</script"),
            RawTextMode::Style => Some(b"</style"),
            RawTextMode::Svg => Some(b"</svg"),
            RawTextMode::None => None,
        }
    }
}

/// Tags whose open/close triggers the misnesting-recovery rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedTag {
    P,
    A,
    Label,
    Td,
    Tr,
    Table,
}

impl WatchedTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "p" => Some(WatchedTag::P),
            "a" => Some(WatchedTag::A),
            "label" => Some(WatchedTag::Label),
            "td" => Some(WatchedTag::Td),
            "tr" => Some(WatchedTag::Tr),
            "table" => Some(WatchedTag::Table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn void_tags_sorted_and_found() {
        let mut sorted = VOID_TAGS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, VOID_TAGS);
        assert!(is_void_tag("br"));
        assert!(is_void_tag("wbr"));
        assert!(!is_void_tag("div"));
    }

    #[test]
    fn invalid_tags_found() {
        assert!(is_invalid_tag("align"));
        assert!(!is_invalid_tag("a"));
    }

    #[test]
    fn raw_text_mode_for_tag() {
        assert_eq!(RawTextMode::for_tag("script"), RawTextMode::Script);
        assert_eq!(RawTextMode::for_tag("div"), RawTextMode::None);
    }
}
