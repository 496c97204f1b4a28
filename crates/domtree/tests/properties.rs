//! Property tests for the invariants and round-trip laws of `spec.md` §8.

use domtree::{Document, Forest, NodeCategory, NodeId};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// Small vocabulary of markup fragments, biased toward the constructs the
/// correctness rules actually react to (watched tags, raw-text openers,
/// unterminated closers, comments, a blacklisted tag) rather than uniformly
/// random bytes, which mostly produce inert text nodes.
const FRAGMENTS: &[&str] = &[
    "<p>", "</p>", "<a href=\"x\">", "</a>", "<label>", "</label>", "<table>", "</table>", "<tr>",
    "</tr>", "<td>", "</td>", "<div class='y'>", "</div>", "<br>", "<img src=x>", "<hr/>",
    "<script>", "</script>", "<style>", "</style>", "<svg>", "</svg>", "<!-- c -->",
    "<!doctype html>", "<?pi?>", "text ", " ", "\n", "\t", "<align>", "<unterminated", "a=b",
];

#[derive(Clone, Debug)]
struct HtmlIsh(Vec<u8>);

impl Arbitrary for HtmlIsh {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 32;
        let mut out = Vec::new();
        for _ in 0..len {
            let idx = usize::arbitrary(g) % FRAGMENTS.len();
            out.extend_from_slice(FRAGMENTS[idx].as_bytes());
        }
        HtmlIsh(out)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let bytes = self.0.clone();
        Box::new(bytes.shrink().map(HtmlIsh))
    }
}

fn invariants_hold_at(forest: &Forest, id: NodeId) -> bool {
    let node = forest.node(id);
    let self_ok = match node.category() {
        NodeCategory::Text => node.attributes.is_empty() && node.children.is_empty(),
        NodeCategory::Element => node.name == node.name.to_ascii_lowercase(),
        NodeCategory::Special => true,
    };
    self_ok
        && node
            .children
            .iter()
            .all(|&child| forest.node(child).parent == Some(id) && invariants_hold_at(forest, child))
}

#[quickcheck]
fn tree_invariants_hold(input: HtmlIsh) -> bool {
    let mut doc = Document::new();
    doc.parse(input.0);
    let forest = doc.forest();
    forest
        .roots()
        .iter()
        .all(|&root| invariants_hold_at(forest, root))
}

#[quickcheck]
fn serialize_is_deterministic(input: HtmlIsh) -> bool {
    let mut doc = Document::new();
    doc.parse(input.0);
    doc.serialize() == doc.serialize()
}

/// Re-parsing the serializer's canonical output and serializing again must
/// be a no-op: the first pass has already collapsed whitespace into the
/// canonical form, so a second round trip cannot change it further.
#[quickcheck]
fn reparse_of_serialized_output_is_idempotent(input: HtmlIsh) -> bool {
    let mut first = Document::new();
    first.parse(input.0);
    let canonical = first.serialize();

    let mut second = Document::new();
    second.parse(canonical.clone());
    let reserialized = second.serialize();

    canonical == reserialized
}

#[test]
fn empty_input_yields_empty_forest() {
    let mut doc = Document::new();
    doc.parse(Vec::new());
    assert!(doc.tags().is_empty());
}

#[test]
fn whitespace_only_input_yields_empty_forest() {
    let mut doc = Document::new();
    doc.parse(b" \n\t\r  ".to_vec());
    assert!(doc.tags().is_empty());
}

#[test]
fn doctype_then_html_is_two_root_nodes() {
    let mut doc = Document::new();
    doc.parse(b"<!doctype html><html></html>".to_vec());
    assert_eq!(doc.tags().len(), 2);
    assert_eq!(doc.forest().node(doc.tags()[1]).name, "html");
}
