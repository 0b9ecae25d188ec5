//! Open/closed bookkeeping for an accordion.
//!
//! The controller owns the open flag of every registered item. Items ask for
//! a change through [`AccordionState::toggle`]; the state decides which panels
//! change and hands each change to a [`ToggleDriver`], which performs the
//! visual work and runs the caller's hooks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::PanelVisual;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccordionError {
    #[error("Accordion item id must not be empty")]
    EmptyItemId,
    #[error("Accordion item already registered: {0}")]
    DuplicateItem(ItemId),
    #[error("Accordion item not registered: {0}")]
    UnknownItem(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccordionConfig {
    pub allow_multiple: bool,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            allow_multiple: true,
        }
    }
}

/// What an item asks for when its tab is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleArgs {
    pub item_id: ItemId,
    pub open_panel: bool,
}

impl ToggleArgs {
    pub fn new(item_id: impl Into<ItemId>, open_panel: bool) -> Self {
        Self {
            item_id: item_id.into(),
            open_panel,
        }
    }
}

/// One panel changing visual state as part of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelChange {
    pub item_id: ItemId,
    pub visual: PanelVisual,
    /// Set when the panel is closed because another item opened.
    pub forced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Vetoed,
    Applied(Vec<PanelChange>),
}

impl ToggleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ToggleOutcome::Applied(_))
    }
}

/// Side effects of a toggle, run in order: `before_panel_open`, one `apply`
/// per changed panel, then `after_panel_open`.
pub trait ToggleDriver {
    /// Return `false` to veto the toggle.
    fn before_panel_open(&mut self, _args: &ToggleArgs) -> bool {
        true
    }

    /// Called after the state flag for `change.item_id` has been written.
    fn apply(&mut self, change: &PanelChange);

    fn after_panel_open(&mut self, _args: &ToggleArgs) {}
}

#[derive(Debug, Clone, Default)]
pub struct AccordionState {
    config: AccordionConfig,
    open: HashMap<ItemId, bool>,
    current: Option<ItemId>,
}

impl AccordionState {
    pub fn new(config: AccordionConfig) -> Self {
        Self {
            config,
            open: HashMap::new(),
            current: None,
        }
    }

    pub fn register(&mut self, item_id: &ItemId) -> Result<(), AccordionError> {
        if item_id.as_str().is_empty() {
            return Err(AccordionError::EmptyItemId);
        }
        if self.open.contains_key(item_id) {
            return Err(AccordionError::DuplicateItem(item_id.clone()));
        }

        self.open.insert(item_id.clone(), false);
        Ok(())
    }

    /// Forget an item. Returns whether it was registered.
    pub fn unregister(&mut self, item_id: &ItemId) -> bool {
        if self.current.as_ref() == Some(item_id) {
            self.current = None;
        }
        self.open.remove(item_id).is_some()
    }

    pub fn is_registered(&self, item_id: &ItemId) -> bool {
        self.open.contains_key(item_id)
    }

    pub fn is_open(&self, item_id: &ItemId) -> bool {
        self.open.get(item_id).copied().unwrap_or(false)
    }

    pub fn open_items(&self) -> Vec<&ItemId> {
        let mut items: Vec<&ItemId> = self
            .open
            .iter()
            .filter(|(_, open)| **open)
            .map(|(id, _)| id)
            .collect();
        items.sort();
        items
    }

    /// The item most recently toggled, open or not.
    pub fn current_item(&self) -> Option<&ItemId> {
        self.current.as_ref()
    }

    pub fn toggle<D: ToggleDriver>(
        &mut self,
        args: ToggleArgs,
        driver: &mut D,
    ) -> Result<ToggleOutcome, AccordionError> {
        if !self.is_registered(&args.item_id) {
            return Err(AccordionError::UnknownItem(args.item_id));
        }

        if !driver.before_panel_open(&args) {
            log::debug!("toggle of {} vetoed", args.item_id);
            return Ok(ToggleOutcome::Vetoed);
        }

        let mut changes = Vec::with_capacity(2);

        if let Some(previous) = self.previous_to_close(&args.item_id) {
            self.open.insert(previous.clone(), false);
            let change = PanelChange {
                item_id: previous,
                visual: PanelVisual::Closed,
                forced: true,
            };
            log::debug!("closing {} to open {}", change.item_id, args.item_id);
            driver.apply(&change);
            changes.push(change);
        }

        self.open.insert(args.item_id.clone(), args.open_panel);
        let change = PanelChange {
            item_id: args.item_id.clone(),
            visual: PanelVisual::from_open(args.open_panel),
            forced: false,
        };
        driver.apply(&change);
        changes.push(change);

        driver.after_panel_open(&args);

        self.current = Some(args.item_id);
        Ok(ToggleOutcome::Applied(changes))
    }

    fn previous_to_close(&self, requester: &ItemId) -> Option<ItemId> {
        if self.config.allow_multiple {
            return None;
        }

        self.current
            .as_ref()
            .filter(|current| *current != requester && self.is_open(current))
            .cloned()
    }
}
