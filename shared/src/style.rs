use serde::{Deserialize, Serialize};

/// CSS classes the accordion stylesheet relies on.
///
/// The transition rules in the stylesheet key off these exact names, so a
/// restyle must keep them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleHook {
    Root,
    Item,
    PanelActive,
    TabActive,
    Transitions,
}

impl StyleHook {
    pub const fn as_class(self) -> &'static str {
        match self {
            StyleHook::Root => "accordion",
            StyleHook::Item => "accordion__item",
            StyleHook::PanelActive => "accordion__panel--active",
            StyleHook::TabActive => "accordion__tab--active",
            StyleHook::Transitions => "accordion__transitions",
        }
    }
}

impl std::fmt::Display for StyleHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_class())
    }
}

/// Visual state of a single accordion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelVisual {
    Open,
    Closed,
}

impl PanelVisual {
    pub fn from_open(open: bool) -> Self {
        if open {
            PanelVisual::Open
        } else {
            PanelVisual::Closed
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, PanelVisual::Open)
    }

    /// Hooks that follow the open/closed state, paired with whether they
    /// should be present. The panel hook goes on the panel element and the
    /// tab hook on the toggle element.
    pub fn active_hooks(self) -> [(StyleHook, bool); 2] {
        let on = self.is_open();
        [(StyleHook::PanelActive, on), (StyleHook::TabActive, on)]
    }
}
