//! Configuration handed to the client-side force graph together with the nodes

use serde::Serialize;
use super::LinkType;

/// Theme navy, used for highlighted links
pub const NAVY: &str = "#1b2a4a";

#[derive(Debug, Clone, Serialize)]
pub struct NodeSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub size: NodeSize,
    pub render_label: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    pub stroke_width: f64,
    pub highlight_color: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub stroke_linecap: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceConfig {
    pub gravity: f64,
    pub link_length: f64,
    pub link_strength: f64,
    pub alpha_target: f64,
}

/// Renderer settings; field names follow the renderer's camelCase options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphViewConfig {
    pub directed: bool,
    pub node_highlight_behavior: bool,
    pub link_highlight_behavior: bool,
    pub highlight_degree: u32,
    pub highlight_opacity: f64,
    pub max_zoom: f64,
    pub min_zoom: f64,
    pub node: NodeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d3: Option<ForceConfig>,
    pub width: f64,
    pub height: f64,
}

impl GraphViewConfig {
    fn base(width: f64, height: f64) -> Self {
        Self {
            directed: true,
            node_highlight_behavior: true,
            link_highlight_behavior: true,
            highlight_degree: 1,
            highlight_opacity: 0.2,
            max_zoom: 8.0,
            min_zoom: 0.1,
            node: NodeConfig {
                size: NodeSize { width: 1200, height: 1400 },
                render_label: false,
            },
            link: None,
            d3: None,
            width,
            height,
        }
    }

    /// Pinned chain graph: curved links, no gravity so nodes stay where the layout put them
    pub fn isnad(width: f64, height: f64) -> Self {
        Self {
            link: Some(LinkConfig {
                stroke_width: 2.0,
                highlight_color: NAVY.to_string(),
                link_type: LinkType::CurveSmooth,
                stroke_linecap: "round".to_string(),
            }),
            d3: Some(ForceConfig {
                gravity: 0.0,
                link_length: 15.0,
                link_strength: 1.0,
                alpha_target: 0.0,
            }),
            ..Self::base(width, height)
        }
    }

    /// Teacher/student graph; zooms further out since columns can be long
    pub fn teacher_student(width: f64, height: f64) -> Self {
        Self {
            min_zoom: 0.01,
            ..Self::base(width, height)
        }
    }
}

impl Default for GraphViewConfig {
    fn default() -> Self {
        Self::isnad(super::DEFAULT_WIDTH, 600.0)
    }
}
