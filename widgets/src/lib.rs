pub mod components;
pub mod transition;
pub mod utils;

pub use components::accordion::{use_accordion, Accordion, AccordionContext, ItemRefs, ToggleEvent};
pub use components::accordion_item::{AccordionItem, ItemRenderProps};
pub use components::dropdown::Dropdown;
