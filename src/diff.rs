//! Tree diff between two canonical documents.
//!
//! The pipeline only depends on the [`DiffEngine`] trait; [`TreeDiffEngine`]
//! is the implementation the binary uses. It walks both trees top-down:
//!
//! - Sibling lists are aligned by a match key (element name according to the
//!   namespace flags plus the `name` attribute, or the node kind for text,
//!   comments and processing instructions). Ordered alignment is delegated to
//!   `similar`; with `ignore_child_order` the siblings are matched as a
//!   multiset instead, pairing identical subtrees first.
//! - Matched elements are compared attribute by attribute and then recursively.
//! - Unmatched nodes become deletions and insertions. A deleted subtree and an
//!   inserted subtree with the same content are folded into one move.
//!
//! Comments and processing instructions are excluded from matching when the
//! corresponding ignore flag is set; they still show up in the view, greyed
//! out.
//!
//! # Examples
//!
//! ```
//! use xmldiff_rs::canonical::canonicalize;
//! use xmldiff_rs::diff::{ComparisonResult, DiffEngine, EditKind, TreeDiffEngine};
//! use xmldiff_rs::options::{AlgorithmChoice, DiffOptions};
//! use xmldiff_rs::parser::parse_str;
//!
//! let old = canonicalize(parse_str(r#"<s><e name="id" type="int"/></s>"#, false).unwrap());
//! let new = canonicalize(parse_str(r#"<s><e name="id" type="long"/></s>"#, false).unwrap());
//!
//! let result = TreeDiffEngine.diff(&old, &new, &DiffOptions::default(), AlgorithmChoice::Auto);
//! let ComparisonResult::Different(script) = result else { panic!("expected a difference") };
//! assert_eq!(script.ops[0].kind, EditKind::Change);
//! assert_eq!(script.ops[0].path, "/s/e[@name='id']/@type");
//! ```

use crate::canonical::CanonicalDocument;
use crate::options::{AlgorithmChoice, DiffOptions};
use crate::tree::{Attribute, Element, Node, QName};
use serde::Serialize;
use similar::{Algorithm, DiffOp};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Above this product of sibling counts `Auto` switches from LCS to Myers.
const AUTO_LCS_LIMIT: usize = 10_000;

/// The kind of an edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Node exists in new but not old
    Insert,
    /// Node exists in old but not new
    Delete,
    /// Node exists in both with a different value
    Change,
    /// Subtree removed at `path` and inserted unchanged at `target_path`
    Move,
}

/// A single edit operation of a diff script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOp {
    pub kind: EditKind,
    /// Path of the affected node, e.g. `/xs:schema/xs:element[@name='a']/@type`
    pub path: String,
    /// Destination of a move
    pub target_path: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Counts per edit kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub moved: usize,
}

impl DiffStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.changed + self.moved
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    fn from_ops(ops: &[EditOp]) -> Self {
        let mut stats = Self::new();
        for op in ops {
            match op.kind {
                EditKind::Insert => stats.added += 1,
                EditKind::Delete => stats.removed += 1,
                EditKind::Change => stats.changed += 1,
                EditKind::Move => stats.moved += 1,
            }
        }
        stats
    }
}

/// Ordered edit operations turning the old tree into the new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffScript {
    pub ops: Vec<EditOp>,
    pub stats: DiffStats,
}

impl DiffScript {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    Equal,
    Different(DiffScript),
}

impl ComparisonResult {
    pub fn is_equal(&self) -> bool {
        matches!(self, ComparisonResult::Equal)
    }
}

/// How a line of the side-by-side view is annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Identical,
    Added,
    Removed,
    Changed,
    MovedFrom,
    MovedTo,
    Ignored,
}

/// One row of the side-by-side view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub depth: usize,
    pub kind: LineKind,
    pub left: Option<String>,
    pub right: Option<String>,
    pub path: String,
}

/// Side-by-side annotated representation of both trees, consumed by a
/// [`DiffRenderer`](crate::render::DiffRenderer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffView {
    pub lines: Vec<DiffLine>,
}

impl DiffView {
    pub fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

/// Computes differences between canonical documents.
pub trait DiffEngine {
    /// Returns `Equal` or the diff script.
    fn diff(
        &self,
        old: &CanonicalDocument,
        new: &CanonicalDocument,
        options: &DiffOptions,
        algorithm: AlgorithmChoice,
    ) -> ComparisonResult;

    /// Builds the side-by-side view used for reports.
    fn view(
        &self,
        old: &CanonicalDocument,
        new: &CanonicalDocument,
        options: &DiffOptions,
        algorithm: AlgorithmChoice,
    ) -> DiffView;
}

/// Default engine: key-aligned recursive tree walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDiffEngine;

impl DiffEngine for TreeDiffEngine {
    fn diff(
        &self,
        old: &CanonicalDocument,
        new: &CanonicalDocument,
        options: &DiffOptions,
        algorithm: AlgorithmChoice,
    ) -> ComparisonResult {
        let (ops, _) = walk(old, new, options, algorithm);
        if ops.is_empty() {
            ComparisonResult::Equal
        } else {
            let stats = DiffStats::from_ops(&ops);
            ComparisonResult::Different(DiffScript { ops, stats })
        }
    }

    fn view(
        &self,
        old: &CanonicalDocument,
        new: &CanonicalDocument,
        options: &DiffOptions,
        algorithm: AlgorithmChoice,
    ) -> DiffView {
        let (_, lines) = walk(old, new, options, algorithm);
        DiffView { lines }
    }
}

fn walk(
    old: &CanonicalDocument,
    new: &CanonicalDocument,
    options: &DiffOptions,
    algorithm: AlgorithmChoice,
) -> (Vec<EditOp>, Vec<DiffLine>) {
    let mut walker = Walker {
        options,
        algorithm,
        ops: Vec::new(),
        lines: Vec::new(),
        detached: Vec::new(),
    };
    walker.children(
        &old.document().children,
        &new.document().children,
        0,
        "",
    );
    walker.fold_moves();
    (walker.ops, walker.lines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

/// A deleted or inserted element subtree, candidate for move folding.
struct Detached {
    side: Side,
    op: usize,
    lines: Range<usize>,
    fingerprint: String,
}

enum Step {
    Pair(usize, usize),
    Delete(usize),
    Insert(usize),
}

struct Walker<'a> {
    options: &'a DiffOptions,
    algorithm: AlgorithmChoice,
    ops: Vec<EditOp>,
    lines: Vec<DiffLine>,
    detached: Vec<Detached>,
}

impl Walker<'_> {
    fn children(&mut self, old: &[Node], new: &[Node], depth: usize, parent: &str) {
        let old_paths = child_paths(parent, old);
        let new_paths = child_paths(parent, new);

        let mut old_sig = Vec::new();
        for (i, node) in old.iter().enumerate() {
            if self.significant(node) {
                old_sig.push(i);
            } else {
                self.line(depth, LineKind::Ignored, Some(label(node)), None, &old_paths[i]);
            }
        }
        let mut new_sig = Vec::new();
        for (j, node) in new.iter().enumerate() {
            if self.significant(node) {
                new_sig.push(j);
            } else {
                self.line(depth, LineKind::Ignored, None, Some(label(node)), &new_paths[j]);
            }
        }

        let old_nodes: Vec<&Node> = old_sig.iter().map(|&i| &old[i]).collect();
        let new_nodes: Vec<&Node> = new_sig.iter().map(|&j| &new[j]).collect();

        let steps = if self.options.ignore_child_order {
            self.align_unordered(&old_nodes, &new_nodes)
        } else {
            self.align_ordered(&old_nodes, &new_nodes)
        };

        for step in steps {
            match step {
                Step::Pair(i, j) => {
                    let (i, j) = (old_sig[i], new_sig[j]);
                    self.pair(&old[i], &new[j], depth, &old_paths[i], &new_paths[j]);
                }
                Step::Delete(i) => {
                    let i = old_sig[i];
                    self.detach(&old[i], depth, &old_paths[i], Side::Old);
                }
                Step::Insert(j) => {
                    let j = new_sig[j];
                    self.detach(&new[j], depth, &new_paths[j], Side::New);
                }
            }
        }
    }

    fn align_ordered(&self, old: &[&Node], new: &[&Node]) -> Vec<Step> {
        let old_keys: Vec<String> = old.iter().map(|n| match_key(n, self.options)).collect();
        let new_keys: Vec<String> = new.iter().map(|n| match_key(n, self.options)).collect();

        let algorithm = match self.algorithm {
            AlgorithmChoice::Precise => Algorithm::Lcs,
            AlgorithmChoice::Fast => Algorithm::Patience,
            AlgorithmChoice::Auto if old.len() * new.len() <= AUTO_LCS_LIMIT => Algorithm::Lcs,
            AlgorithmChoice::Auto => Algorithm::Myers,
        };

        let mut steps = Vec::new();
        for op in similar::capture_diff_slices(algorithm, &old_keys, &new_keys) {
            match op {
                DiffOp::Equal {
                    old_index,
                    new_index,
                    len,
                } => steps.extend((0..len).map(|k| Step::Pair(old_index + k, new_index + k))),
                DiffOp::Delete {
                    old_index, old_len, ..
                } => steps.extend((old_index..old_index + old_len).map(Step::Delete)),
                DiffOp::Insert {
                    new_index, new_len, ..
                } => steps.extend((new_index..new_index + new_len).map(Step::Insert)),
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    steps.extend((old_index..old_index + old_len).map(Step::Delete));
                    steps.extend((new_index..new_index + new_len).map(Step::Insert));
                }
            }
        }
        self.pair_leftovers(steps, old, new)
    }

    /// Pairs deleted and inserted elements that sit between the same aligned
    /// siblings and share a tag name, so a renamed element shows up as a
    /// changed `@name` instead of a removal plus an addition.
    fn pair_leftovers(&self, steps: Vec<Step>, old: &[&Node], new: &[&Node]) -> Vec<Step> {
        let old_tags: Vec<Option<String>> = old.iter().map(|n| tag_key(n, self.options)).collect();
        let new_tags: Vec<Option<String>> = new.iter().map(|n| tag_key(n, self.options)).collect();

        let mut out = Vec::with_capacity(steps.len());
        let mut deletes = Vec::new();
        let mut inserts = Vec::new();
        for step in steps {
            match step {
                Step::Delete(i) => deletes.push(i),
                Step::Insert(j) => inserts.push(j),
                Step::Pair(i, j) => {
                    pair_run(&deletes, &inserts, &old_tags, &new_tags, &mut out);
                    deletes.clear();
                    inserts.clear();
                    out.push(Step::Pair(i, j));
                }
            }
        }
        pair_run(&deletes, &inserts, &old_tags, &new_tags, &mut out);
        out
    }

    fn align_unordered(&self, old: &[&Node], new: &[&Node]) -> Vec<Step> {
        let old_keys: Vec<String> = old.iter().map(|n| match_key(n, self.options)).collect();
        let new_keys: Vec<String> = new.iter().map(|n| match_key(n, self.options)).collect();
        let old_prints: Vec<String> = old.iter().map(|n| fingerprint(n, self.options)).collect();
        let new_prints: Vec<String> = new.iter().map(|n| fingerprint(n, self.options)).collect();

        let mut partner: Vec<Option<usize>> = vec![None; old.len()];
        let mut taken = vec![false; new.len()];

        // Identical subtrees first, wherever they are.
        for i in 0..old.len() {
            if let Some(j) = (0..new.len()).find(|&j| !taken[j] && new_prints[j] == old_prints[i]) {
                partner[i] = Some(j);
                taken[j] = true;
            }
        }
        // Then same-key nodes in order; these differ somewhere below.
        for i in 0..old.len() {
            if partner[i].is_some() {
                continue;
            }
            if let Some(j) = (0..new.len()).find(|&j| !taken[j] && new_keys[j] == old_keys[i]) {
                partner[i] = Some(j);
                taken[j] = true;
            }
        }

        // Finally renamed elements: same tag, different `name`.
        let old_tags: Vec<Option<String>> = old.iter().map(|n| tag_key(n, self.options)).collect();
        let new_tags: Vec<Option<String>> = new.iter().map(|n| tag_key(n, self.options)).collect();
        for i in 0..old.len() {
            if partner[i].is_some() || old_tags[i].is_none() {
                continue;
            }
            if let Some(j) = (0..new.len()).find(|&j| !taken[j] && new_tags[j] == old_tags[i]) {
                partner[i] = Some(j);
                taken[j] = true;
            }
        }

        let mut steps: Vec<Step> = partner
            .iter()
            .enumerate()
            .map(|(i, p)| match p {
                Some(j) => Step::Pair(i, *j),
                None => Step::Delete(i),
            })
            .collect();
        steps.extend((0..new.len()).filter(|&j| !taken[j]).map(Step::Insert));
        steps
    }

    fn pair(&mut self, old: &Node, new: &Node, depth: usize, old_path: &str, new_path: &str) {
        match (old, new) {
            (Node::Element(a), Node::Element(b)) => {
                self.line(depth, LineKind::Identical, Some(start_tag(a)), Some(start_tag(b)), old_path);
                self.attributes(a, b, depth + 1, old_path);
                self.children(&a.children, &b.children, depth + 1, old_path);
            }
            (Node::Text(a), Node::Text(b)) | (Node::Comment(a), Node::Comment(b)) => {
                self.leaf(old, new, a, b, depth, old_path);
            }
            (
                Node::ProcessingInstruction { data: a, .. },
                Node::ProcessingInstruction { data: b, .. },
            ) => {
                let (a, b) = (a.as_deref().unwrap_or(""), b.as_deref().unwrap_or(""));
                self.leaf(old, new, a, b, depth, old_path);
            }
            _ => {
                self.detach(old, depth, old_path, Side::Old);
                self.detach(new, depth, new_path, Side::New);
            }
        }
    }

    fn leaf(&mut self, old: &Node, new: &Node, a: &str, b: &str, depth: usize, path: &str) {
        if self.values_equal(a, b) {
            self.line(depth, LineKind::Identical, Some(label(old)), Some(label(new)), path);
        } else {
            self.line(depth, LineKind::Changed, Some(label(old)), Some(label(new)), path);
            self.op(EditKind::Change, path, Some(a.to_string()), Some(b.to_string()));
        }
    }

    fn attributes(&mut self, old: &Element, new: &Element, depth: usize, path: &str) {
        let mut matched = vec![false; new.attributes.len()];

        for attr in &old.attributes {
            let attr_path = format!("{}/@{}", path, attr.name.qualified());
            let key = name_key(&attr.name, self.options);
            let partner = new
                .attributes
                .iter()
                .enumerate()
                .find(|(j, other)| !matched[*j] && name_key(&other.name, self.options) == key);

            match partner {
                Some((j, other)) => {
                    matched[j] = true;
                    if self.values_equal(&attr.value, &other.value) {
                        self.line(depth, LineKind::Identical, Some(attr_label(attr)), Some(attr_label(other)), &attr_path);
                    } else {
                        self.line(depth, LineKind::Changed, Some(attr_label(attr)), Some(attr_label(other)), &attr_path);
                        self.op(
                            EditKind::Change,
                            &attr_path,
                            Some(attr.value.clone()),
                            Some(other.value.clone()),
                        );
                    }
                }
                None => {
                    self.line(depth, LineKind::Removed, Some(attr_label(attr)), None, &attr_path);
                    self.op(EditKind::Delete, &attr_path, Some(attr.value.clone()), None);
                }
            }
        }

        for (j, attr) in new.attributes.iter().enumerate() {
            if matched[j] {
                continue;
            }
            let attr_path = format!("{}/@{}", path, attr.name.qualified());
            self.line(depth, LineKind::Added, None, Some(attr_label(attr)), &attr_path);
            self.op(EditKind::Insert, &attr_path, None, Some(attr.value.clone()));
        }
    }

    /// Records a whole subtree as deleted (old side) or inserted (new side).
    fn detach(&mut self, node: &Node, depth: usize, path: &str, side: Side) {
        let (kind, op_kind) = match side {
            Side::Old => (LineKind::Removed, EditKind::Delete),
            Side::New => (LineKind::Added, EditKind::Insert),
        };
        let value = Some(label(node));
        let op = self.ops.len();
        match side {
            Side::Old => self.op(op_kind, path, value, None),
            Side::New => self.op(op_kind, path, None, value),
        }

        let start = self.lines.len();
        self.subtree_lines(node, depth, path, kind, side);
        if matches!(node, Node::Element(_)) {
            self.detached.push(Detached {
                side,
                op,
                lines: start..self.lines.len(),
                fingerprint: fingerprint(node, self.options),
            });
        }
    }

    fn subtree_lines(&mut self, node: &Node, depth: usize, path: &str, kind: LineKind, side: Side) {
        let text = match node {
            Node::Element(e) => start_tag(e),
            other => label(other),
        };
        self.side_line(depth, kind, text, path, side);

        if let Node::Element(e) = node {
            for attr in &e.attributes {
                let attr_path = format!("{}/@{}", path, attr.name.qualified());
                self.side_line(depth + 1, kind, attr_label(attr), &attr_path, side);
            }
            let paths = child_paths(path, &e.children);
            for (child, child_path) in e.children.iter().zip(&paths) {
                self.subtree_lines(child, depth + 1, child_path, kind, side);
            }
        }
    }

    /// Folds each deleted subtree that reappears unchanged elsewhere into a
    /// single move.
    fn fold_moves(&mut self) {
        let mut dropped: HashSet<usize> = HashSet::new();
        let mut used = vec![false; self.detached.len()];

        for d in 0..self.detached.len() {
            if self.detached[d].side != Side::Old {
                continue;
            }
            let target = (0..self.detached.len()).find(|&i| {
                !used[i]
                    && self.detached[i].side == Side::New
                    && self.detached[i].fingerprint == self.detached[d].fingerprint
            });
            let Some(i) = target else { continue };
            used[i] = true;

            let (from, to) = (&self.detached[d], &self.detached[i]);
            let target_path = self.ops[to.op].path.clone();
            let new_value = self.ops[to.op].new_value.clone();
            let source = &mut self.ops[from.op];
            source.kind = EditKind::Move;
            source.target_path = Some(target_path);
            source.new_value = new_value;
            dropped.insert(to.op);

            for line in &mut self.lines[from.lines.clone()] {
                line.kind = LineKind::MovedFrom;
            }
            for line in &mut self.lines[to.lines.clone()] {
                line.kind = LineKind::MovedTo;
            }
        }

        if !dropped.is_empty() {
            let ops = std::mem::take(&mut self.ops);
            self.ops = ops
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !dropped.contains(i))
                .map(|(_, op)| op)
                .collect();
        }
    }

    fn significant(&self, node: &Node) -> bool {
        is_significant(node, self.options)
    }

    fn values_equal(&self, a: &str, b: &str) -> bool {
        normalize_value(a, self.options) == normalize_value(b, self.options)
    }

    fn op(&mut self, kind: EditKind, path: &str, old_value: Option<String>, new_value: Option<String>) {
        self.ops.push(EditOp {
            kind,
            path: path.to_string(),
            target_path: None,
            old_value,
            new_value,
        });
    }

    fn line(&mut self, depth: usize, kind: LineKind, left: Option<String>, right: Option<String>, path: &str) {
        self.lines.push(DiffLine {
            depth,
            kind,
            left,
            right,
            path: path.to_string(),
        });
    }

    fn side_line(&mut self, depth: usize, kind: LineKind, text: String, path: &str, side: Side) {
        match side {
            Side::Old => self.line(depth, kind, Some(text), None, path),
            Side::New => self.line(depth, kind, None, Some(text), path),
        }
    }
}

fn is_significant(node: &Node, options: &DiffOptions) -> bool {
    match node {
        Node::Comment(_) => !options.ignore_comments,
        Node::ProcessingInstruction { .. } => !options.ignore_processing_instructions,
        _ => true,
    }
}

/// Name used for matching, honouring the namespace flags.
fn name_key(name: &QName, options: &DiffOptions) -> String {
    if options.ignore_namespaces {
        return name.local.clone();
    }
    let uri = name.namespace.as_deref().unwrap_or("");
    if options.ignore_prefixes {
        format!("{{{}}}{}", uri, name.local)
    } else {
        format!("{{{}}}{}", uri, name.qualified())
    }
}

fn match_key(node: &Node, options: &DiffOptions) -> String {
    match node {
        Node::Element(e) => format!(
            "<{}|{}",
            name_key(&e.name, options),
            normalize_value(e.attribute("name").unwrap_or(""), options)
        ),
        Node::Text(_) => "#text".to_string(),
        Node::Comment(_) => "#comment".to_string(),
        Node::ProcessingInstruction { target, .. } => format!("?{}", target),
    }
}

/// Element name alone, without the `name` attribute. `None` for other nodes.
fn tag_key(node: &Node, options: &DiffOptions) -> Option<String> {
    node.as_element().map(|e| name_key(&e.name, options))
}

/// Emits one run of unaligned siblings, pairing deletes with the next insert
/// of the same tag while keeping both sides in order.
fn pair_run(
    deletes: &[usize],
    inserts: &[usize],
    old_tags: &[Option<String>],
    new_tags: &[Option<String>],
    out: &mut Vec<Step>,
) {
    let mut next = 0;
    for &i in deletes {
        let found = old_tags[i].as_ref().and_then(|tag| {
            inserts[next..]
                .iter()
                .position(|&j| new_tags[j].as_ref() == Some(tag))
        });
        match found {
            Some(offset) => {
                out.extend(inserts[next..next + offset].iter().map(|&j| Step::Insert(j)));
                out.push(Step::Pair(i, inserts[next + offset]));
                next += offset + 1;
            }
            None => out.push(Step::Delete(i)),
        }
    }
    out.extend(inserts[next..].iter().map(|&j| Step::Insert(j)));
}

/// Content identity of a subtree under the given options.
fn fingerprint(node: &Node, options: &DiffOptions) -> String {
    match node {
        Node::Element(e) => {
            let mut attrs: Vec<String> = e
                .attributes
                .iter()
                .map(|a| format!("{}={}", name_key(&a.name, options), normalize_value(&a.value, options)))
                .collect();
            attrs.sort();

            let mut children: Vec<String> = e
                .children
                .iter()
                .filter(|c| is_significant(c, options))
                .map(|c| fingerprint(c, options))
                .collect();
            if options.ignore_child_order {
                children.sort();
            }

            format!(
                "<{} {}>{}</>",
                name_key(&e.name, options),
                attrs.join(" "),
                children.join("")
            )
        }
        Node::Text(t) => format!("T({})", normalize_value(t, options)),
        Node::Comment(t) => format!("C({})", normalize_value(t, options)),
        Node::ProcessingInstruction { target, data } => format!(
            "P({} {})",
            target,
            normalize_value(data.as_deref().unwrap_or(""), options)
        ),
    }
}

fn normalize_value(value: &str, options: &DiffOptions) -> String {
    if options.ignore_whitespace {
        normalize_whitespace(value)
    } else {
        value.to_string()
    }
}

/// Normalizes whitespace in a string (trim and collapse runs).
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Paths of sibling nodes under `parent`. Elements are qualified by their
/// `name` attribute when they have one, otherwise by position among
/// same-named siblings when the name is not unique.
fn child_paths(parent: &str, children: &[Node]) -> Vec<String> {
    let steps: Vec<String> = children.iter().map(path_step).collect();
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for step in &steps {
        *totals.entry(step.as_str()).or_insert(0) += 1;
    }
    let mut seen: HashMap<&str, usize> = HashMap::new();

    children
        .iter()
        .zip(&steps)
        .map(|(node, step)| {
            if let Node::Element(e) = node {
                if let Some(name) = e.attribute("name") {
                    return format!("{}/{}[@name='{}']", parent, step, name);
                }
            }
            if totals.get(step.as_str()).copied().unwrap_or(0) == 1 {
                return format!("{}/{}", parent, step);
            }
            let position = seen.entry(step.as_str()).or_insert(0);
            *position += 1;
            format!("{}/{}[{}]", parent, step, position)
        })
        .collect()
}

fn path_step(node: &Node) -> String {
    match node {
        Node::Element(e) => e.name.qualified(),
        Node::Text(_) => "text()".to_string(),
        Node::Comment(_) => "comment()".to_string(),
        Node::ProcessingInstruction { target, .. } => format!("processing-instruction({})", target),
    }
}

fn start_tag(element: &Element) -> String {
    format!("<{}>", element.name.qualified())
}

fn attr_label(attr: &Attribute) -> String {
    format!("@{}=\"{}\"", attr.name.qualified(), attr.value)
}

fn label(node: &Node) -> String {
    match node {
        Node::Element(e) => start_tag(e),
        Node::Text(t) => t.clone(),
        Node::Comment(t) => format!("<!--{}-->", t),
        Node::ProcessingInstruction { target, data } => match data {
            Some(data) => format!("<?{} {}?>", target, data),
            None => format!("<?{}?>", target),
        },
    }
}
