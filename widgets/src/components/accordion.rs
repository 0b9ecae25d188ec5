use std::collections::HashMap;

use leptos::*;
use shared::{
    AccordionConfig, AccordionError, AccordionState, ItemId, PanelChange, StyleHook, ToggleArgs,
    ToggleDriver,
};

use crate::transition;

/// Passed to the accordion hooks on every toggle.
#[derive(Clone)]
pub struct ToggleEvent {
    pub args: ToggleArgs,
    /// The click that caused the toggle; `None` for the initial open of a
    /// `start_open` item.
    pub event: Option<ev::MouseEvent>,
}

/// DOM nodes of one accordion item, filled in as they load.
///
/// The tab and panel are kept as plain elements so any markup can carry
/// them.
#[derive(Clone, Copy)]
pub struct ItemRefs {
    pub item: NodeRef<html::Div>,
    pub toggle: StoredValue<Option<web_sys::HtmlElement>>,
    pub panel: StoredValue<Option<web_sys::HtmlElement>>,
}

#[derive(Clone, Copy)]
struct ItemHandle {
    open: RwSignal<bool>,
    refs: ItemRefs,
}

/// Controller shared with every `AccordionItem` below an `Accordion`.
#[derive(Clone, Copy)]
pub struct AccordionContext {
    state: StoredValue<AccordionState>,
    items: StoredValue<HashMap<ItemId, ItemHandle>>,
    before_panel_open: Option<Callback<ToggleEvent, bool>>,
    after_panel_open: Option<Callback<ToggleEvent>>,
}

impl AccordionContext {
    pub fn new(
        config: AccordionConfig,
        before_panel_open: Option<Callback<ToggleEvent, bool>>,
        after_panel_open: Option<Callback<ToggleEvent>>,
    ) -> Self {
        Self {
            state: store_value(AccordionState::new(config)),
            items: store_value(HashMap::new()),
            before_panel_open,
            after_panel_open,
        }
    }

    /// Register an item and hand back the signal that carries its open flag.
    pub fn register(&self, item_id: &ItemId, refs: ItemRefs) -> Result<RwSignal<bool>, AccordionError> {
        let mut result = Ok(());
        self.state.update_value(|state| result = state.register(item_id));
        result?;

        let open = create_rw_signal(false);
        self.items.update_value(|items| {
            items.insert(item_id.clone(), ItemHandle { open, refs });
        });
        Ok(open)
    }

    pub fn unregister(&self, item_id: &ItemId) {
        self.state.update_value(|state| {
            state.unregister(item_id);
        });
        self.items.update_value(|items| {
            items.remove(item_id);
        });
    }

    /// Toggle entry point for items.
    pub fn on_toggle(&self, args: ToggleArgs, event: Option<ev::MouseEvent>) {
        // Work on a copy so hooks may read the accordion while it runs.
        let mut state = self.state.get_value();
        let mut driver = DomToggleDriver {
            items: self.items,
            before_panel_open: self.before_panel_open,
            after_panel_open: self.after_panel_open,
            event,
        };

        match state.toggle(args, &mut driver) {
            Ok(outcome) if outcome.is_applied() => self.state.set_value(state),
            Ok(_) => {}
            Err(err) => log::error!("{}", err),
        }
    }
}

struct DomToggleDriver {
    items: StoredValue<HashMap<ItemId, ItemHandle>>,
    before_panel_open: Option<Callback<ToggleEvent, bool>>,
    after_panel_open: Option<Callback<ToggleEvent>>,
    event: Option<ev::MouseEvent>,
}

impl DomToggleDriver {
    fn hook_event(&self, args: &ToggleArgs) -> ToggleEvent {
        ToggleEvent {
            args: args.clone(),
            event: self.event.clone(),
        }
    }
}

impl ToggleDriver for DomToggleDriver {
    fn before_panel_open(&mut self, args: &ToggleArgs) -> bool {
        match self.before_panel_open {
            Some(hook) => hook.call(self.hook_event(args)),
            None => true,
        }
    }

    fn apply(&mut self, change: &PanelChange) {
        let Some(handle) = self.items.with_value(|items| items.get(&change.item_id).copied()) else {
            log::warn!("no nodes registered for accordion item {}", change.item_id);
            return;
        };

        handle.open.set(change.visual.is_open());
        transition::drive(&handle.refs, change.visual);
    }

    fn after_panel_open(&mut self, args: &ToggleArgs) {
        if let Some(hook) = self.after_panel_open {
            hook.call(self.hook_event(args));
        }
    }
}

/// Get the enclosing accordion's controller.
pub fn use_accordion() -> AccordionContext {
    expect_context::<AccordionContext>()
}

/// Accordion container. Provides the controller to the `AccordionItem`s
/// rendered inside it.
///
/// `allow_multiple` defaults to `true`; when `false`, opening an item closes
/// the one opened before it. `before_panel_open` can veto a toggle by
/// returning `false`.
#[component]
pub fn Accordion(
    #[prop(optional)] allow_multiple: Option<bool>,
    #[prop(optional)] config: Option<AccordionConfig>,
    #[prop(optional, into)] before_panel_open: Option<Callback<ToggleEvent, bool>>,
    #[prop(optional, into)] after_panel_open: Option<Callback<ToggleEvent>>,
    children: Children,
) -> impl IntoView {
    let mut config = config.unwrap_or_default();
    if let Some(allow_multiple) = allow_multiple {
        config.allow_multiple = allow_multiple;
    }

    provide_context(AccordionContext::new(config, before_panel_open, after_panel_open));

    view! {
        <div class=StyleHook::Root.as_class()>
            {children()}
        </div>
    }
}
