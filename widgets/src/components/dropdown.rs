use leptos::*;
use serde_json::Value;
use shared::{DropdownConfig, SelectAction, SelectIds, SelectKey, SelectState, SelectionChange};

/// Select-style dropdown.
///
/// All state lives in a [`SelectState`]; this component only renders it and
/// forwards DOM events as [`SelectAction`]s. Items are JSON values. With
/// `items_are_objects` the label is read from `object_label_property`
/// (default `"name"`), otherwise the item itself is the label.
///
/// Props left unset fall back to `config`, then to `DropdownConfig::default()`.
#[component]
pub fn Dropdown(
    #[prop(into)] items: MaybeSignal<Vec<Value>>,
    #[prop(optional)] config: Option<DropdownConfig>,
    #[prop(optional, into)] on_change: Option<Callback<SelectionChange<Value>>>,
    #[prop(optional)] items_are_objects: bool,
    #[prop(optional, into)] object_label_property: Option<String>,
    #[prop(optional, into)] select_label: Option<String>,
    #[prop(optional, into)] label_value: Option<String>,
    #[prop(optional)] hide_label: bool,
    #[prop(optional)] required: bool,
    #[prop(optional)] initial_selected_item: Option<Value>,
    #[prop(optional, into)] label_classes: Option<String>,
    #[prop(optional, into)] select_container_classes: Option<String>,
    #[prop(optional, into)] trigger_classes: Option<String>,
    #[prop(optional, into)] ul_classes: Option<String>,
    #[prop(optional, into)] li_classes: Option<String>,
    #[prop(optional, into)] highlight_color: Option<String>,
) -> impl IntoView {
    let mut config = config.unwrap_or_default();
    config.items_are_objects |= items_are_objects;
    config.hide_label |= hide_label;
    config.required |= required;
    for (target, value) in [
        (&mut config.object_label_property, object_label_property),
        (&mut config.select_label, select_label),
        (&mut config.label_classes, label_classes),
        (&mut config.select_container_classes, select_container_classes),
        (&mut config.trigger_classes, trigger_classes),
        (&mut config.ul_classes, ul_classes),
        (&mut config.li_classes, li_classes),
        (&mut config.highlight_color, highlight_color),
    ] {
        if let Some(value) = value {
            *target = value;
        }
    }
    if label_value.is_some() {
        config.label_value = label_value;
    }

    let ids = SelectIds::next();
    let label_id = ids.label();
    let toggle_id = ids.toggle_button();
    let menu_id = ids.menu();
    let labelledby = ids.toggle_button_labelledby();
    let label_text = config.label_value.clone();
    let label_class = config.label_class();
    let container_class = config.container_class();
    let trigger_class = config.trigger_class();

    let ids = store_value(ids);
    let config = store_value(config);
    let items = Signal::derive(move || items.get());
    let state = create_rw_signal(SelectState::new(initial_selected_item));

    let dispatch = move |action: SelectAction| {
        let mut next = state.get_untracked();
        let change = items.with_untracked(|items| {
            config.with_value(|config| next.dispatch(action, items, |item| config.item_label(item)))
        });

        if state.with_untracked(|current| *current != next) {
            state.set(next);
        }

        if let Some(change) = change {
            log::debug!("dropdown selection changed: {:?}", change.change_type);
            if let Some(on_change) = on_change {
                on_change.call(change);
            }
        }
    };

    let is_open = move || state.with(|state| state.is_open);

    view! {
        {label_text.map(|text| view! {
            <label class=label_class id=label_id.clone() for=toggle_id.clone()>
                {text}
            </label>
        })}

        <div class=container_class>
            <button
                type="button"
                class=trigger_class
                id=toggle_id.clone()
                aria-haspopup="listbox"
                aria-expanded=move || is_open().to_string()
                aria-labelledby=labelledby
                on:click=move |_| dispatch(SelectAction::ToggleButtonClick)
                on:keydown=move |ev: ev::KeyboardEvent| {
                    let command_modifier = ev.ctrl_key() || ev.meta_key() || ev.alt_key();
                    if let Some(key) = SelectKey::from_key_event(&ev.key(), command_modifier) {
                        // Enter and Space would otherwise also click the button.
                        if key.suppresses_default() {
                            ev.prevent_default();
                        }
                        dispatch(SelectAction::Key(key));
                    }
                }
                on:blur=move |_| dispatch(SelectAction::Blur)
            >
                <div>
                    {move || state.with(|state| {
                        config.with_value(|config| config.display_label(state.selected_item.as_ref()))
                    })}
                </div>

                <span class="absolute inset-y-0 right-0 flex items-center pr-2 pointer-events-none">
                    <svg class="h-5 w-5 text-gray-400" viewBox="0 0 20 20" fill="none" stroke="currentColor">
                        <path
                            d="M7 7l3-3 3 3m0 6l-3 3-3-3"
                            stroke-width="1.5"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                        />
                    </svg>
                </span>
            </button>

            <ul
                id=menu_id
                role="listbox"
                aria-labelledby=label_id
                tabindex="-1"
                aria-activedescendant=move || state.with(|state| ids.with_value(|ids| state.active_descendant(ids)))
                on:mouseleave=move |_| dispatch(SelectAction::MenuMouseLeave)
                // Keep focus on the button so the blur does not close the menu mid-click.
                on:mousedown=|ev: ev::MouseEvent| ev.prevent_default()
            >
                <Show when=is_open fallback=|| ()>
                    <div class=move || config.with_value(|config| config.menu_class())>
                        {move || items.with(|items| {
                            items
                                .iter()
                                .enumerate()
                                .map(|(index, item)| {
                                    let label = config.with_value(|config| config.item_label(item));
                                    let highlighted = move || state.with(|state| state.is_highlighted(index));
                                    view! {
                                        <li
                                            class=config.with_value(|config| config.item_class())
                                            id=ids.with_value(|ids| ids.item(index))
                                            role="option"
                                            aria-selected=move || highlighted().to_string()
                                            style=move || config.with_value(|config| config.item_style(highlighted()))
                                            on:click=move |_| dispatch(SelectAction::ItemClick(index))
                                            on:mousemove=move |_| dispatch(SelectAction::ItemMouseMove(index))
                                        >
                                            {label}
                                        </li>
                                    }
                                })
                                .collect_view()
                        })}
                    </div>
                </Show>
            </ul>
        </div>
    }
}
