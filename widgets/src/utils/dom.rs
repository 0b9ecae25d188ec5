//! Small DOM writers used by the accordion.
//!
//! Failures from the browser are logged and otherwise ignored; a missed class
//! or style write only affects presentation.

use shared::{PanelHeight, StyleHook};

/// Add or remove a style hook class on `element`.
pub fn set_hook(element: &web_sys::Element, hook: StyleHook, present: bool) {
    if let Err(e) = element.class_list().toggle_with_force(hook.as_class(), present) {
        log::warn!("failed to toggle class {}: {:?}", hook, e);
    }
}

pub fn set_height(element: &web_sys::HtmlElement, height: PanelHeight) {
    if let Err(e) = element.style().set_property("height", &height.to_string()) {
        log::warn!("failed to set panel height to {}: {:?}", height, e);
    }
}

/// Inline `height` of `element`, empty when unset.
pub fn style_height(element: &web_sys::HtmlElement) -> String {
    element
        .style()
        .get_property_value("height")
        .unwrap_or_default()
}
