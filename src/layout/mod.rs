//! Graph layouts for narrator chains
//!
//! The browser draws chains with a force-directed renderer, but positions are computed here
//! so every render of the same data looks the same:
//! - [`layout_isnad`]: one column per chain position, shared narrators drawn once
//! - [`layout_teacher_student`]: teachers, narrator and students in three columns
//! - [`layout_teacher_student_tiers`]: the same three groups stacked in rows
//!
//! The resulting [`GraphData`] is plain data recomputed on every request.

pub mod isnad;
pub mod teacher_student;
pub mod view_config;

use serde::{Deserialize, Serialize};
use crate::backend::IsnadNarrator;
use crate::model::Narrator;

pub use isnad::{layout_isnad, ChainMetrics};
pub use teacher_student::{layout_teacher_student, layout_teacher_student_tiers, TeacherStudentChain};
pub use view_config::GraphViewConfig;

/// Default canvas width used before the browser reports its viewport
pub const DEFAULT_WIDTH: f64 = 800.0;

/// How the renderer should draw a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkType {
    Straight,
    CurveSmooth,
    CurveFull,
}

/// A positioned narrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Pinned coordinates; the force simulation leaves pinned nodes in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grade: Option<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade,
            x,
            y,
            fx: None,
            fy: None,
        }
    }

    pub fn for_narrator(narrator: &Narrator, x: f64, y: f64) -> Self {
        Self::new(narrator.scholar_indx.to_string(), &narrator.name, narrator.grade.clone(), x, y)
    }

    pub fn for_isnad_narrator(narrator: &IsnadNarrator, x: f64, y: f64) -> Self {
        Self::new(&narrator.id, &narrator.name, narrator.grade.clone(), x, y)
    }

    /// Pin the node at its current position
    pub fn pinned(mut self) -> Self {
        self.fx = Some(self.x);
        self.fy = Some(self.y);
        self
    }
}

/// A directed edge from the narrator who transmitted to the one who received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl GraphLink {
    pub fn straight(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            link_type: LinkType::Straight,
        }
    }
}

/// Nodes and links handed to the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
