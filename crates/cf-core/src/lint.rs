//! Lint diagnostics for canvas scenes.
//!
//! Reports structural issues without modifying the scene. Loaded documents
//! are not trusted, so everything the engine merely tolerates (dangling
//! references, parent cycles, repeated ids) surfaces here.

use crate::id::NodeId;
use crate::model::{Scene, index_nodes};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks an engine invariant; the engine works around it.
    Warning,
    /// Unusual but harmless.
    Info,
}

/// A single lint diagnostic for a node or edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// The node or edge this diagnostic refers to.
    pub id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-parent").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the scene and return diagnostics.
#[must_use]
pub fn lint_scene(scene: &Scene) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(scene, &mut diags);
    lint_parents(scene, &mut diags);
    lint_parent_cycles(scene, &mut diags);
    lint_dangling_edges(scene, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_duplicate_ids(scene: &Scene, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    let ids = scene
        .nodes
        .iter()
        .map(|n| n.id)
        .chain(scene.edges.iter().map(|e| e.id));
    for id in ids {
        if !seen.insert(id) {
            diags.push(LintDiagnostic {
                id,
                message: format!("Id `{id}` is used more than once."),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }
}

/// Parents that do not exist, or exist but are not groups.
fn lint_parents(scene: &Scene, diags: &mut Vec<LintDiagnostic>) {
    let index = index_nodes(&scene.nodes);
    for node in &scene.nodes {
        let Some(parent_id) = node.parent_id() else {
            continue;
        };
        match index.get(&parent_id) {
            None => diags.push(LintDiagnostic {
                id: node.id,
                message: format!(
                    "Node `{}` points at missing parent `{parent_id}`; it renders at its local offset.",
                    node.id
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-parent",
            }),
            Some(parent) if !parent.is_group() => diags.push(LintDiagnostic {
                id: node.id,
                message: format!("Node `{}` is parented to non-group `{parent_id}`.", node.id),
                severity: LintSeverity::Info,
                rule: "non-group-parent",
            }),
            Some(_) => {}
        }
    }
}

/// Strongly connected components of the child → parent relation. Any
/// component with more than one node (or a self-loop) is a cycle.
fn lint_parent_cycles(scene: &Scene, diags: &mut Vec<LintDiagnostic>) {
    let mut graph: DiGraphMap<NodeId, ()> = DiGraphMap::new();
    for node in &scene.nodes {
        graph.add_node(node.id);
        if let Some(parent) = node.parent_id() {
            graph.add_edge(node.id, parent, ());
        }
    }

    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&id| graph.contains_edge(id, id));
        if !is_cycle {
            continue;
        }
        let members: Vec<&str> = component.iter().map(|id| id.as_str()).collect();
        for &id in &component {
            diags.push(LintDiagnostic {
                id,
                message: format!("Parent cycle through [{}].", members.join(", ")),
                severity: LintSeverity::Warning,
                rule: "parent-cycle",
            });
        }
    }
}

fn lint_dangling_edges(scene: &Scene, diags: &mut Vec<LintDiagnostic>) {
    let known: HashSet<NodeId> = scene.nodes.iter().map(|n| n.id).collect();
    for edge in &scene.edges {
        let missing: Vec<&str> = [edge.source, edge.target]
            .iter()
            .filter(|id| !known.contains(*id))
            .map(|id| id.as_str())
            .collect();
        if !missing.is_empty() {
            diags.push(LintDiagnostic {
                id: edge.id,
                message: format!(
                    "Edge `{}` references missing node(s): {}.",
                    edge.id,
                    missing.join(", ")
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-edge",
            });
        }
    }
}
