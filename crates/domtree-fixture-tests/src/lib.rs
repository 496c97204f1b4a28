//! Fixture-file-driven integration tests for `domtree`, asserting the exact
//! tree shapes named by the six end-to-end scenarios this parser is built
//! to recover: self-closing-tag runs, well-formed and misnested nested
//! tables, a `<style>` body containing comment-shaped text, and a
//! comment/doctype prologue. See `tests/fixtures.rs`.
