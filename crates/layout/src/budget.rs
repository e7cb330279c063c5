use iconbar_config::LayoutConfig;
use iconbar_core::{round_px, Budgets, ChromeProvider, ChromeState, MinimizedBudget, Result, ViewportProvider};

/// Computes the width budgets of both bar renderings.
///
/// Budgets are computed in fractional pixels and rounded once, with the
/// same rule as icon widths.  A negative budget is a valid state: the bar is
/// already over capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetCalculator {
    layout: LayoutConfig,
}

impl BudgetCalculator {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
    }

    /// Viewport width minus the bar's horizontal padding.
    pub fn maximized_budget(&self, viewport: &impl ViewportProvider) -> i32 {
        round_px(self.maximized_px(viewport))
    }

    /// Room left next to the sibling chrome.
    ///
    /// Returns [`MinimizedBudget::Unconstrained`] while the chrome is
    /// maximized, and the maximized budget when there is no chrome to
    /// measure.  Fails with `NoActiveWindow` when the shell has no top-most
    /// window.
    pub fn minimized_budget<H>(&self, host: &H) -> Result<MinimizedBudget>
    where
        H: ViewportProvider + ChromeProvider,
    {
        let budget = match host.chrome()? {
            ChromeState::Maximized => MinimizedBudget::Unconstrained,
            ChromeState::Absent | ChromeState::Homescreen => {
                MinimizedBudget::Width(self.maximized_budget(host))
            }
            ChromeState::Minimized { width } => MinimizedBudget::Width(round_px(
                self.maximized_px(host) - width - self.layout.inter_element_gap,
            )),
        };
        Ok(budget)
    }

    pub fn budgets<H>(&self, host: &H) -> Result<Budgets>
    where
        H: ViewportProvider + ChromeProvider,
    {
        let minimized = self.minimized_budget(host)?;
        Ok(Budgets {
            maximized: self.maximized_budget(host),
            minimized,
        })
    }

    fn maximized_px(&self, viewport: &impl ViewportProvider) -> f64 {
        viewport.viewport_width() - self.layout.bar_padding
    }
}
