pub mod accordion;
pub mod dropdown;
pub mod select;
pub mod style;
pub mod transition;

pub use accordion::{
    AccordionConfig, AccordionError, AccordionState, ItemId, PanelChange, ToggleArgs,
    ToggleDriver, ToggleOutcome,
};
pub use dropdown::DropdownConfig;
pub use select::{ChangeType, SelectAction, SelectIds, SelectKey, SelectState, SelectionChange};
pub use style::{PanelVisual, StyleHook};
pub use transition::{settle_height, HeightPlan, HeightStep, PanelHeight};
