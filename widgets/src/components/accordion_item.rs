use leptos::html::ElementDescriptor;
use leptos::*;
use shared::{ItemId, PanelVisual, StyleHook, ToggleArgs};
use wasm_bindgen::JsCast;

use crate::components::accordion::{use_accordion, ItemRefs};
use crate::transition;
use crate::utils::set_hook;

/// Everything an item's content needs to render and wire itself up.
///
/// Attach [`toggle_ref`](Self::toggle_ref) to the tab and
/// [`panel_ref`](Self::panel_ref) to the panel, and call `toggle_panel` from
/// the tab's click handler. ARIA attributes are the caller's job;
/// `open_status` and `item_id` are provided for them. Keep the `class`
/// attributes of the tab and panel static, the accordion adds its own
/// classes to those nodes.
#[derive(Clone)]
pub struct ItemRenderProps {
    pub open_status: Signal<bool>,
    pub item_id: String,
    pub item_ref: NodeRef<html::Div>,
    pub toggle_panel: Callback<ev::MouseEvent>,
    pub start_open: bool,
    toggle_loaded: Callback<web_sys::HtmlElement>,
    panel_loaded: Callback<web_sys::HtmlElement>,
}

impl ItemRenderProps {
    /// Node ref for the tab. The element type follows the markup it is
    /// attached to.
    pub fn toggle_ref<El>(&self) -> NodeRef<El>
    where
        El: ElementDescriptor + Clone + 'static,
    {
        reporting_node_ref(self.toggle_loaded)
    }

    /// Node ref for the panel, e.g. a `<div>` or the `<dd>` of a `<dl>`.
    pub fn panel_ref<El>(&self) -> NodeRef<El>
    where
        El: ElementDescriptor + Clone + 'static,
    {
        reporting_node_ref(self.panel_loaded)
    }
}

fn reporting_node_ref<El>(loaded: Callback<web_sys::HtmlElement>) -> NodeRef<El>
where
    El: ElementDescriptor + Clone + 'static,
{
    let node_ref = create_node_ref::<El>();
    node_ref.on_load(move |element| {
        let element = element.into_any();
        loaded.call(element.unchecked_ref::<web_sys::HtmlElement>().clone());
    });
    node_ref
}

/// One accordion entry. Must be rendered inside an `Accordion`.
///
/// ```ignore
/// <AccordionItem item_id="panel0" let:item>
///     <button node_ref=item.toggle_ref() on:click=move |ev| item.toggle_panel.call(ev)>
///         "Edit"
///     </button>
///     <div class="accordion__panel" node_ref=item.panel_ref()>"Content"</div>
/// </AccordionItem>
/// ```
///
/// An item whose `item_id` is already taken is rendered but stays inert: its
/// tab toggles nothing and it leaves the existing registration alone.
#[component]
pub fn AccordionItem<F, IV>(
    #[prop(into)] item_id: String,
    #[prop(optional)] start_open: bool,
    children: F,
) -> impl IntoView
where
    F: Fn(ItemRenderProps) -> IV + 'static,
    IV: IntoView,
{
    let accordion = use_accordion();

    let refs = ItemRefs {
        item: create_node_ref::<html::Div>(),
        toggle: store_value(None),
        panel: store_value(None),
    };

    let id = ItemId::new(item_id.clone());
    let registration = match accordion.register(&id, refs) {
        Ok(open) => Some(open),
        Err(err) => {
            log::error!("{}", err);
            None
        }
    };
    let registered = registration.is_some();
    let open = registration.unwrap_or_else(|| create_rw_signal(false));

    if registered {
        let cleanup_id = id.clone();
        on_cleanup(move || accordion.unregister(&cleanup_id));
    }

    let request = move |event: Option<ev::MouseEvent>| {
        if !registered {
            log::warn!("accordion item {} is not registered, toggle ignored", id);
            return;
        }
        let args = ToggleArgs::new(id.clone(), !open.get_untracked());
        accordion.on_toggle(args, event);
    };

    if start_open {
        request(None);
    }

    // Nodes that mount after a toggle catch up with the current state.
    let panel_loaded = Callback::new(move |panel: web_sys::HtmlElement| {
        refs.panel.set_value(Some(panel.clone()));
        let visual = PanelVisual::from_open(open.get_untracked());

        transition::watch_settle(&panel);
        set_hook(&panel, StyleHook::PanelActive, visual.is_open());
        if visual.is_open() {
            transition::animate_height(panel.clone(), visual);
        }

        if start_open {
            transition::enable_after_settle(panel);
        } else {
            set_hook(&panel, StyleHook::Transitions, true);
        }
    });

    let toggle_loaded = Callback::new(move |tab: web_sys::HtmlElement| {
        set_hook(&tab, StyleHook::TabActive, open.get_untracked());
        refs.toggle.set_value(Some(tab));
    });

    let props = ItemRenderProps {
        open_status: open.into(),
        item_id,
        item_ref: refs.item,
        toggle_panel: Callback::new(move |event: ev::MouseEvent| request(Some(event))),
        start_open,
        toggle_loaded,
        panel_loaded,
    };

    let item_node = refs.item;
    view! {
        <div class=format!("{} transition-all", StyleHook::Item.as_class()) node_ref=item_node>
            {children(props)}
        </div>
    }
}
