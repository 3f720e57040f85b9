//! Page visibility hooks
//!
//! Used to pause the game when the window loses focus or the tab is hidden.

/// A focus or visibility transition reported by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Blur,
    Focus,
    DocumentHidden,
    DocumentVisible,
}

impl VisibilityChange {
    pub fn is_hidden(&self) -> bool {
        matches!(self, VisibilityChange::Blur | VisibilityChange::DocumentHidden)
    }
}

type Hook = Box<dyn FnMut()>;

/// Hidden/visible callback pair
pub struct VisibilityHooks {
    hidden: Hook,
    visible: Option<Hook>,
}

impl std::fmt::Debug for VisibilityHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityHooks")
            .field("separate_visible", &self.visible.is_some())
            .finish()
    }
}

impl VisibilityHooks {
    /// `visible` falls back to `hidden` when omitted
    pub fn new<H>(hidden: H, visible: Option<Box<dyn FnMut()>>) -> Self
    where
        H: FnMut() + 'static,
    {
        Self {
            hidden: Box::new(hidden),
            visible,
        }
    }

    pub fn notify(&mut self, change: VisibilityChange) {
        if change.is_hidden() {
            (self.hidden)();
            return;
        }
        match self.visible.as_mut() {
            Some(visible) => visible(),
            None => (self.hidden)(),
        }
    }
}
