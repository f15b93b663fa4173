//! Teacher/student layouts around one narrator

use serde::Serialize;
use crate::model::Narrator;
use super::{GraphData, GraphLink, GraphNode};

/// A narrator with the narrators it received from and transmitted to
#[derive(Debug, Clone, Serialize)]
pub struct TeacherStudentChain {
    pub narrator: Narrator,
    pub predecessors: Vec<Narrator>,
    pub successors: Vec<Narrator>,
}

/// Vertical offset of item `index` in a column of `count` items centred on zero
fn column_offset(index: usize, count: usize, spacing: f64) -> f64 {
    let i = index as f64;
    if count % 2 == 0 {
        (i - count as f64 / 2.0 + 0.5) * spacing
    } else {
        (i - (count / 2) as f64) * spacing
    }
}

/// Three columns read right to left: teachers, the narrator, students.
pub fn layout_teacher_student(chain: &TeacherStudentChain, width: f64) -> GraphData {
    const NODE_WIDTH: f64 = 200.0;
    const VERTICAL_SPACING: f64 = 200.0;
    let horizontal_spacing = NODE_WIDTH * 1.5;
    let right_margin = width - NODE_WIDTH / 2.0;
    let root_y = width / 2.0;

    let mut graph = GraphData::default();
    let central_id = chain.narrator.scholar_indx.to_string();

    let count = chain.predecessors.len();
    for (index, teacher) in chain.predecessors.iter().enumerate() {
        let y = root_y + column_offset(index, count, VERTICAL_SPACING);
        graph.nodes.push(GraphNode::for_narrator(teacher, right_margin, y));
        graph
            .links
            .push(GraphLink::straight(teacher.scholar_indx.to_string(), &central_id));
    }

    graph.nodes.push(GraphNode::for_narrator(
        &chain.narrator,
        right_margin - horizontal_spacing,
        root_y,
    ));

    let count = chain.successors.len();
    for (index, student) in chain.successors.iter().enumerate() {
        let y = root_y + column_offset(index, count, VERTICAL_SPACING);
        graph.nodes.push(GraphNode::for_narrator(
            student,
            right_margin - 2.0 * horizontal_spacing,
            y,
        ));
        graph
            .links
            .push(GraphLink::straight(&central_id, student.scholar_indx.to_string()));
    }

    graph
}

/// Three rows: teachers on top, the narrator centred, students below.
pub fn layout_teacher_student_tiers(chain: &TeacherStudentChain) -> GraphData {
    const NODE_WIDTH: f64 = 120.0;
    const NODE_HEIGHT: f64 = 140.0;
    const ROW_STEP: f64 = 200.0;
    let vertical_spacing = NODE_HEIGHT * 1.5;
    let top_margin = NODE_HEIGHT / 2.0;
    let horizontal_offset = NODE_WIDTH;
    let root_x = super::DEFAULT_WIDTH / 2.0;

    let mut graph = GraphData::default();
    let central_id = chain.narrator.scholar_indx.to_string();

    for (index, teacher) in chain.predecessors.iter().enumerate() {
        let x = horizontal_offset + index as f64 * ROW_STEP;
        graph.nodes.push(GraphNode::for_narrator(teacher, x, top_margin));
        graph
            .links
            .push(GraphLink::straight(teacher.scholar_indx.to_string(), &central_id));
    }

    graph.nodes.push(GraphNode::for_narrator(
        &chain.narrator,
        root_x,
        top_margin + vertical_spacing,
    ));

    for (index, student) in chain.successors.iter().enumerate() {
        let x = horizontal_offset + index as f64 * ROW_STEP;
        graph.nodes.push(GraphNode::for_narrator(
            student,
            x,
            top_margin + 2.0 * vertical_spacing,
        ));
        graph
            .links
            .push(GraphLink::straight(&central_id, student.scholar_indx.to_string()));
    }

    graph
}
