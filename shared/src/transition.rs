//! Height animation plan for accordion panels.
//!
//! A panel animates its `height` property between `0px` and its content
//! height. Layout is not settled on the frame a panel is shown, so every
//! transition runs in two frame-synchronized phases: `measure` on the first
//! animation frame and `commit` on the frame after it. Once the CSS transition
//! finishes, an opened panel is released to `auto` so it can reflow.

use crate::style::PanelVisual;

/// A single style write for one frame of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightStep {
    /// Leave the height alone on this frame.
    Hold,
    /// Set the height to the measured scroll height.
    PinToContent,
    /// Set the height to zero.
    Collapse,
}

impl HeightStep {
    pub fn resolve(self, scroll_height: i32) -> Option<PanelHeight> {
        match self {
            HeightStep::Hold => None,
            HeightStep::PinToContent => Some(PanelHeight::Px(scroll_height.max(0) as u32)),
            HeightStep::Collapse => Some(PanelHeight::Px(0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightPlan {
    pub measure: HeightStep,
    pub commit: HeightStep,
}

impl HeightPlan {
    pub fn for_visual(visual: PanelVisual) -> Self {
        match visual {
            PanelVisual::Open => Self {
                measure: HeightStep::Hold,
                commit: HeightStep::PinToContent,
            },
            // Pin first so the collapse has a concrete height to animate from.
            PanelVisual::Closed => Self {
                measure: HeightStep::PinToContent,
                commit: HeightStep::Collapse,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHeight {
    Px(u32),
    Auto,
}

impl std::fmt::Display for PanelHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelHeight::Px(px) => write!(f, "{}px", px),
            PanelHeight::Auto => f.write_str("auto"),
        }
    }
}

/// Decide what to do when a transition on the panel ends.
///
/// Only `height` transitions count. If the inline height committed by the
/// plan is a positive pixel value the panel finished opening and is released
/// to `auto`.
pub fn settle_height(property_name: &str, style_height: &str) -> Option<PanelHeight> {
    if property_name != "height" {
        return None;
    }

    match leading_integer(style_height) {
        Some(height) if height > 0 => Some(PanelHeight::Auto),
        _ => None,
    }
}

/// Integer prefix of a CSS length such as `"240px"` or `"12.5px"`.
fn leading_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    trimmed[..digits_end].parse().ok()
}
