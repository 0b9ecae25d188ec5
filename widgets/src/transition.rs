//! Runs panel height animations in the browser.
//!
//! The frame plan comes from [`shared::HeightPlan`]; this module schedules
//! its two phases on consecutive animation frames and watches for the end of
//! the CSS transition.

use gloo_timers::callback::Timeout;
use leptos::*;
use shared::{settle_height, HeightPlan, HeightStep, PanelVisual, StyleHook};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::components::accordion::ItemRefs;
use crate::utils::{set_height, set_hook, style_height};

/// Delay before transitions are enabled on a panel that starts open.
pub const TRANSITION_SETTLE_MS: u32 = 300;

const TRANSITION_END_EVENTS: [&str; 2] = ["transitionend", "webkitTransitionEnd"];

/// Bring an item's nodes to `visual`: style hooks on the panel and tab, and
/// the height animation on the panel. Nodes that are not mounted yet are
/// skipped; they pick up their state when they load.
pub fn drive(refs: &ItemRefs, visual: PanelVisual) {
    let panel = refs.panel.get_value();
    let tab = refs.toggle.get_value();

    for (hook, present) in visual.active_hooks() {
        let target = match hook {
            StyleHook::PanelActive => panel.as_ref(),
            _ => tab.as_ref(),
        };
        match target {
            Some(element) => set_hook(element, hook, present),
            None => log::debug!("{} not applied, node not mounted", hook),
        }
    }

    if let Some(panel) = panel {
        animate_height(panel, visual);
    }
}

/// Run the two-phase height plan for `visual`.
pub fn animate_height(panel: web_sys::HtmlElement, visual: PanelVisual) {
    let plan = HeightPlan::for_visual(visual);

    request_animation_frame(move || {
        write_step(&panel, plan.measure);
        request_animation_frame(move || write_step(&panel, plan.commit));
    });
}

fn write_step(panel: &web_sys::HtmlElement, step: HeightStep) {
    if let Some(height) = step.resolve(panel.scroll_height()) {
        set_height(panel, height);
    }
}

/// Release an opened panel to `auto` height once its transition ends.
///
/// The listeners live until the current reactive owner is cleaned up.
pub fn watch_settle(panel: &web_sys::HtmlElement) {
    let target = panel.clone();
    let handler = Closure::wrap(Box::new(move |event: web_sys::TransitionEvent| {
        let current = style_height(&target);
        if let Some(height) = settle_height(&event.property_name(), &current) {
            set_height(&target, height);
        }
    }) as Box<dyn FnMut(_)>);

    for name in TRANSITION_END_EVENTS {
        if let Err(e) = panel.add_event_listener_with_callback(name, handler.as_ref().unchecked_ref()) {
            log::warn!("failed to listen for {}: {:?}", name, e);
        }
    }

    let panel = panel.clone();
    on_cleanup(move || {
        for name in TRANSITION_END_EVENTS {
            let _ = panel.remove_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
        }
        drop(handler);
    });
}

/// Turn on CSS transitions for a panel after it has settled, so an initial
/// open is not animated.
pub fn enable_after_settle(panel: web_sys::HtmlElement) {
    Timeout::new(TRANSITION_SETTLE_MS, move || {
        set_hook(&panel, StyleHook::Transitions, true);
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn next_frame() {
        let (tx, rx) = futures::channel::oneshot::channel::<()>();
        request_animation_frame(move || {
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    fn html_div() -> web_sys::HtmlElement {
        document()
            .create_element("div")
            .unwrap()
            .unchecked_into::<web_sys::HtmlElement>()
    }

    /// A mounted panel wrapping `content_px` of content.
    fn panel_with_content(content_px: u32) -> web_sys::HtmlElement {
        let panel = html_div();
        panel.style().set_property("overflow", "hidden").unwrap();
        let content = html_div();
        content
            .style()
            .set_property("height", &format!("{}px", content_px))
            .unwrap();
        panel.append_child(&content).unwrap();
        document().body().unwrap().append_child(&panel).unwrap();
        panel
    }

    fn transition_end(property: &str) -> web_sys::TransitionEvent {
        let init = web_sys::TransitionEventInit::new();
        init.set_property_name(property);
        web_sys::TransitionEvent::new_with_event_init_dict("transitionend", &init).unwrap()
    }

    fn settling_panel() -> web_sys::HtmlElement {
        let panel = panel_with_content(40);
        let target = panel.clone();
        mount_to(html_div(), move || watch_settle(&target));
        panel
    }

    #[wasm_bindgen_test]
    async fn test_open_grows_to_content_height() {
        let panel = panel_with_content(120);
        panel.style().set_property("height", "0px").unwrap();

        animate_height(panel.clone(), PanelVisual::Open);

        next_frame().await;
        assert_eq!(style_height(&panel), "0px");
        next_frame().await;
        assert_eq!(style_height(&panel), format!("{}px", panel.scroll_height()));
        assert_eq!(style_height(&panel), "120px");
    }

    #[wasm_bindgen_test]
    async fn test_close_pins_height_then_collapses() {
        let panel = panel_with_content(80);

        animate_height(panel.clone(), PanelVisual::Closed);

        next_frame().await;
        assert_eq!(style_height(&panel), "80px");
        next_frame().await;
        assert_eq!(style_height(&panel), "0px");
    }

    #[wasm_bindgen_test]
    fn test_height_transition_end_releases_to_auto() {
        let panel = settling_panel();
        panel.style().set_property("height", "120px").unwrap();

        panel.dispatch_event(&transition_end("height")).unwrap();
        assert_eq!(style_height(&panel), "auto");
    }

    #[wasm_bindgen_test]
    fn test_other_transition_end_keeps_height() {
        let panel = settling_panel();
        panel.style().set_property("height", "120px").unwrap();

        panel.dispatch_event(&transition_end("opacity")).unwrap();
        assert_eq!(style_height(&panel), "120px");
    }

    #[wasm_bindgen_test]
    fn test_collapsed_panel_stays_collapsed_after_transition_end() {
        let panel = settling_panel();
        panel.style().set_property("height", "0px").unwrap();

        panel.dispatch_event(&transition_end("height")).unwrap();
        assert_eq!(style_height(&panel), "0px");
    }

    #[wasm_bindgen_test]
    async fn test_enable_after_settle_adds_transition_class() {
        let panel = html_div();

        enable_after_settle(panel.clone());
        assert!(!panel.class_list().contains("accordion__transitions"));

        gloo_timers::future::TimeoutFuture::new(TRANSITION_SETTLE_MS + 50).await;
        assert!(panel.class_list().contains("accordion__transitions"));
    }
}
