// src/movetree.rs
// Prefix tree over move tokens. Built once from the opening catalog,
// then shared read-only across classification workers.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fallback annotation when a walk ascends to an unannotated root.
/// A catalog entry with an empty move sequence annotates the root and
/// takes precedence over this.
pub const START_ANNOTATION: &str = "Start position";

type NodeId = usize;

const ROOT: NodeId = 0;

struct Node {
    mv: String,
    annotation: Option<String>,
    parent: Option<NodeId>,
    replies: HashMap<String, NodeId>,
    traffic: AtomicU64,
}

impl Node {
    fn new(mv: String, parent: Option<NodeId>) -> Self {
        Node {
            mv,
            annotation: None,
            parent,
            replies: HashMap::new(),
            traffic: AtomicU64::new(0),
        }
    }
}

/// A catalog entry tried to re-annotate a node that already carries a
/// different name. The earlier name wins; the loser is kept here so the
/// catalog can be audited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationConflict {
    pub moves: Vec<String>,
    pub kept: String,
    pub rejected: String,
}

pub struct MoveTree {
    // Arena storage: children and parents are indices into `nodes`,
    // ownership stays strictly with the Vec.
    nodes: Vec<Node>,
    conflicts: Vec<AnnotationConflict>,
}

impl MoveTree {
    pub fn new() -> Self {
        MoveTree {
            nodes: vec![Node::new(String::new(), None)],
            conflicts: Vec::new(),
        }
    }

    /// Walk `moves` from the root, creating nodes as needed, and leave
    /// `annotation` on the final node. A second, different annotation on
    /// an already-named node is recorded as a conflict, not an error:
    /// catalogs legitimately contain transpositions.
    pub fn insert<S: AsRef<str>>(&mut self, moves: &[S], annotation: &str) {
        let mut at = ROOT;
        for mv in moves {
            at = self.get_or_insert(at, mv.as_ref());
        }
        if annotation.is_empty() {
            return;
        }
        match &self.nodes[at].annotation {
            None => self.nodes[at].annotation = Some(annotation.to_string()),
            Some(existing) if existing == annotation => {}
            Some(existing) => self.conflicts.push(AnnotationConflict {
                moves: moves.iter().map(|m| m.as_ref().to_string()).collect(),
                kept: existing.clone(),
                rejected: annotation.to_string(),
            }),
        }
    }

    fn get_or_insert(&mut self, at: NodeId, mv: &str) -> NodeId {
        if let Some(&id) = self.nodes[at].replies.get(mv) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(mv.to_string(), Some(at)));
        self.nodes[at].replies.insert(mv.to_string(), id);
        id
    }

    /// Longest known-opening prefix match. Follows the game's moves until
    /// the first one the catalog has no reply for, then ascends to the
    /// nearest annotated ancestor. Always returns a non-empty name.
    pub fn classify<S: AsRef<str>>(&self, moves: &[S]) -> &str {
        let mut at = ROOT;
        for mv in moves {
            match self.nodes[at].replies.get(mv.as_ref()) {
                Some(&next) => {
                    at = next;
                    self.nodes[at].traffic.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
        loop {
            if let Some(annotation) = &self.nodes[at].annotation {
                return annotation;
            }
            match self.nodes[at].parent {
                Some(up) => at = up,
                None => return START_ANNOTATION,
            }
        }
    }

    /// The annotation a game with no recognized moves classifies as.
    pub fn start_annotation(&self) -> &str {
        self.nodes[ROOT].annotation.as_deref().unwrap_or(START_ANNOTATION)
    }

    pub fn conflicts(&self) -> &[AnnotationConflict] {
        &self.conflicts
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn traffic(&self, id: NodeId) -> u64 {
        self.nodes[id].traffic.load(Ordering::Relaxed)
    }

    /// Copy of the tree keeping only branches some game actually walked:
    /// a node survives if it has traffic or a surviving descendant. The
    /// source tree is left untouched.
    pub fn prune(&self) -> MoveTree {
        let mut out = MoveTree::new();
        out.nodes[ROOT].annotation = self.nodes[ROOT].annotation.clone();
        out.nodes[ROOT].traffic = AtomicU64::new(self.traffic(ROOT));
        self.copy_live(ROOT, &mut out, ROOT);
        out
    }

    fn copy_live(&self, src: NodeId, out: &mut MoveTree, dst: NodeId) {
        for &child in self.nodes[src].replies.values() {
            if !self.subtree_live(child) {
                continue;
            }
            let node = &self.nodes[child];
            let id = out.nodes.len();
            out.nodes.push(Node {
                mv: node.mv.clone(),
                annotation: node.annotation.clone(),
                parent: Some(dst),
                replies: HashMap::new(),
                traffic: AtomicU64::new(self.traffic(child)),
            });
            out.nodes[dst].replies.insert(node.mv.clone(), id);
            self.copy_live(child, out, id);
        }
    }

    fn subtree_live(&self, id: NodeId) -> bool {
        self.traffic(id) > 0
            || self.nodes[id].replies.values().any(|&c| self.subtree_live(c))
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = &self.nodes[id];
        writeln!(
            f,
            "{:indent$}{} [{}] ({})",
            "",
            node.mv,
            node.annotation.as_deref().unwrap_or(""),
            self.traffic(id),
            indent = depth * 2
        )?;
        let mut moves: Vec<&String> = node.replies.keys().collect();
        moves.sort();
        for mv in moves {
            self.fmt_node(f, node.replies[mv], depth + 1)?;
        }
        Ok(())
    }
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Indented `move [annotation] (traffic)` listing, children in move
/// order. Used for the pruned-tree diagnostic.
impl fmt::Display for MoveTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, ROOT, 0)
    }
}
