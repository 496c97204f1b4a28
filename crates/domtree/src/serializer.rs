//! Pretty-printer: walks a [`Forest`] depth-first and renders it back to
//! bytes, per `spec.md` §4.3.
//!
//! Restructured from `original_source/DomTree.h`'s `PrintData`/`PrintName`/
//! `PrintValue`/`PrintClose` member functions into one recursive function
//! over `Forest`/`NodeId`, since there is no `shared_ptr<Tag>` to hang
//! methods off of here.

use crate::node::{Forest, NodeCategory, NodeId};
use crate::tables;

const WS: [char; 4] = [' ', '\n', '\r', '\t'];

pub fn serialize(forest: &Forest) -> Vec<u8> {
    let mut out = String::new();
    for &root in forest.roots() {
        render_node(forest, root, 0, &mut out);
    }
    out.push('\n');
    out.into_bytes()
}

fn render_node(forest: &Forest, id: NodeId, depth: usize, out: &mut String) {
    let node = forest.node(id);
    match node.category() {
        NodeCategory::Special => render_special(&node.name, depth, out),
        NodeCategory::Element => render_element(forest, id, depth, out),
        NodeCategory::Text => {}
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn render_special(name: &str, depth: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    indent(depth, out);
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn render_element(forest: &Forest, id: NodeId, depth: usize, out: &mut String) {
    let node = forest.node(id);
    let void = tables::is_void_tag(&node.name);
    let raw_text_like = matches!(node.name.as_str(), "script" | "style" | "svg");

    if !out.is_empty() {
        out.push('\n');
    }
    indent(depth, out);
    out.push('<');
    out.push_str(&node.name);
    for attr in &node.attributes {
        out.push(' ');
        out.push_str(&attr.key);
        out.push('=');
        out.push(attr.quote);
        out.push_str(&attr.value);
        out.push(attr.quote);
    }

    if void {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if !raw_text_like && node.children.len() == 1 {
        let only = forest.node(node.children[0]);
        if only.category() == NodeCategory::Text {
            out.push_str(only.value.trim_end_matches(WS));
            out.push_str("</");
            out.push_str(&node.name);
            out.push('>');
            return;
        }
    }

    for &child in &node.children {
        let child_node = forest.node(child);
        if child_node.category() == NodeCategory::Text {
            out.push('\n');
            indent(depth + 1, out);
            out.push_str(child_node.value.trim_end_matches(WS));
        } else {
            render_node(forest, child, depth + 1, out);
        }
    }

    let needs_break = raw_text_like
        || node.children.len() > 1
        || node
            .children
            .first()
            .is_some_and(|&c| forest.node(c).category() != NodeCategory::Text);
    if needs_break {
        out.push('\n');
        indent(depth, out);
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
}
