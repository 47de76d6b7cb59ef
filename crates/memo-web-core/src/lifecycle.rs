//! Fragment lifecycle hooks.
//!
//! The swap engine is injected as two callback lists: hooks that run after
//! every fragment load (including the initial page load) and hooks that may
//! rewrite the swap decision before a response is swapped in. Hooks must be
//! safe to run any number of times.

use std::fmt;

use crate::dom::Dom;
use crate::swap::SwapDetail;

/// Runs after a fragment has been loaded into the page
pub type LoadHook = Box<dyn FnMut(&mut dyn Dom)>;

/// Runs before a response is swapped in
pub type BeforeSwapHook = Box<dyn FnMut(&mut SwapDetail)>;

#[derive(Default)]
pub struct FragmentHooks {
    on_load: Vec<LoadHook>,
    before_swap: Vec<BeforeSwapHook>,
}

impl fmt::Debug for FragmentHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentHooks")
            .field("on_load", &self.on_load.len())
            .field("before_swap", &self.before_swap.len())
            .finish()
    }
}

impl FragmentHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load<F>(&mut self, hook: F)
    where
        F: FnMut(&mut dyn Dom) + 'static,
    {
        self.on_load.push(Box::new(hook));
    }

    pub fn on_before_swap<F>(&mut self, hook: F)
    where
        F: FnMut(&mut SwapDetail) + 'static,
    {
        self.before_swap.push(Box::new(hook));
    }

    pub fn load_hook_count(&self) -> usize {
        self.on_load.len()
    }

    pub fn before_swap_hook_count(&self) -> usize {
        self.before_swap.len()
    }

    /// Run every load hook; returns how many ran
    pub fn fire_loaded(&mut self, dom: &mut dyn Dom) -> usize {
        for hook in self.on_load.iter_mut() {
            hook(&mut *dom);
        }
        tracing::debug!(hooks = self.on_load.len(), "fragment loaded");
        self.on_load.len()
    }

    /// Run every before-swap hook over `detail`; returns how many ran
    pub fn fire_before_swap(&mut self, detail: &mut SwapDetail) -> usize {
        for hook in self.before_swap.iter_mut() {
            hook(detail);
        }
        self.before_swap.len()
    }
}
