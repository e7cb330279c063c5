use crate::budget::BudgetCalculator;
use crate::fitter::{fit, Candidate};
use crate::gate::{PauseGate, Resume};
use crate::registry::{PriorityRegistry, PriorityTable};
use crate::width::{effective_width, measure};
use iconbar_config::LayoutConfig;
use iconbar_core::{
    Appearance, ChromeState, EngineEvent, EventGroup, HideSets, Host, IconKind, LifecycleKind,
    Result,
};
use tracing::{debug, warn};

/// What a dispatched event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A recomputation pass ran and its hide-sets were applied.
    Applied,
    /// A pass was requested while paused; it runs on resume.
    Deferred,
    /// No top-most window: the pass was skipped, previous hide-sets stand.
    Skipped,
    /// State was updated; no pass was needed.
    Recorded,
    /// The event was invalid and has been dropped.
    Dropped,
}

/// The status-bar icon layout engine.
///
/// Owns the slot registry and the pause gate; all collaborator state is
/// queried from the [`Host`] passed to each call.  Events are handled one at
/// a time, and any recomputation they trigger runs to completion before the
/// call returns.
#[derive(Debug)]
pub struct Engine<'t> {
    registry:   PriorityRegistry<'t>,
    budgets:    BudgetCalculator,
    gate:       PauseGate,
    hidden:     Option<HideSets>,
    appearance: Option<Appearance>,
    passes:     u64,
}

impl<'t> Engine<'t> {
    /// Create an engine with a slot for every entry of `table`.
    pub fn new(table: &'t PriorityTable, layout: LayoutConfig) -> Self {
        Self {
            registry:   PriorityRegistry::populated(table),
            budgets:    BudgetCalculator::new(layout),
            gate:       PauseGate::new(),
            hidden:     None,
            appearance: None,
            passes:     0,
        }
    }

    /// Handle one event.  Invalid events are logged and dropped.
    pub fn dispatch<H: Host>(&mut self, event: EngineEvent, host: &mut H) -> DispatchOutcome {
        let result = match &event {
            EngineEvent::Lifecycle { id, kind } => self.notify_icon_lifecycle(*id, *kind, host),
            EngineEvent::Geometry { id } => self.notify_geometry_changed(*id, host),
            EngineEvent::Environment => Ok(self.notify_environment_changed(host)),
            EngineEvent::GroupBegin(group) => Ok(self.notify_group_begin(*group)),
            EngineEvent::GroupEnd(group) => Ok(self.notify_group_end(*group, host)),
        };

        result.unwrap_or_else(|e| {
            warn!("Dropping {event:?}: {e}");
            DispatchOutcome::Dropped
        })
    }

    pub fn notify_icon_lifecycle<H: Host>(
        &mut self,
        id: IconKind,
        kind: LifecycleKind,
        host: &mut H,
    ) -> Result<DispatchOutcome> {
        match kind {
            LifecycleKind::Created(handle) => self.registry.attach(id, handle)?,
            LifecycleKind::Shown => self.registry.set_visible(id, true)?,
            LifecycleKind::Hidden => self.registry.set_visible(id, false)?,
            LifecycleKind::Changed => {
                self.registry.register(id)?;
            }
            LifecycleKind::Rendered => {
                let order = self.registry.register(id)?.order;
                host.apply_order(id, order);
                return Ok(DispatchOutcome::Recorded);
            }
        }
        Ok(self.recompute(host))
    }

    /// Re-measure a dynamic icon and refit.
    pub fn notify_geometry_changed<H: Host>(
        &mut self,
        id: IconKind,
        host: &mut H,
    ) -> Result<DispatchOutcome> {
        let slot = self.registry.register(id)?;
        if let (true, Some(handle)) = (slot.width.is_dynamic(), slot.attached) {
            let width = host.geometry(handle).map(measure).unwrap_or(0);
            self.registry.set_static_width(id, width)?;
            debug!("Icon '{id}' now {width}px wide");
        }
        Ok(self.recompute(host))
    }

    /// Refresh the bar appearance and refit against the new budgets.
    pub fn notify_environment_changed<H: Host>(&mut self, host: &mut H) -> DispatchOutcome {
        self.refresh_appearance(host);
        self.recompute(host)
    }

    pub fn notify_group_begin(&mut self, group: EventGroup) -> DispatchOutcome {
        self.gate.begin(group);
        DispatchOutcome::Recorded
    }

    /// Lift `group`; the last lift triggers exactly one recomputation pass.
    pub fn notify_group_end<H: Host>(&mut self, group: EventGroup, host: &mut H) -> DispatchOutcome {
        match self.gate.end(group) {
            Resume::Resumed { was_dirty } => {
                debug!(was_dirty, "resuming after '{group}'");
                self.run_pass(host)
            }
            Resume::StillPaused | Resume::Unchanged => DispatchOutcome::Recorded,
        }
    }

    /// Run a recomputation pass now, or defer it if the gate is held.
    pub fn recompute<H: Host>(&mut self, host: &mut H) -> DispatchOutcome {
        if !self.gate.request() {
            debug!(active = self.gate.active_count(), "recomputation deferred");
            return DispatchOutcome::Deferred;
        }
        self.run_pass(host)
    }

    /// Replace the layout constants; takes effect on the next pass.
    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.budgets.set_layout(layout);
    }

    pub fn registry(&self) -> &PriorityRegistry<'t> {
        &self.registry
    }

    pub fn gate(&self) -> &PauseGate {
        &self.gate
    }

    /// Hide-sets applied by the most recent pass.
    pub fn hide_sets(&self) -> Option<&HideSets> {
        self.hidden.as_ref()
    }

    pub fn appearance(&self) -> Option<Appearance> {
        self.appearance
    }

    /// Number of completed recomputation passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn run_pass<H: Host>(&mut self, host: &mut H) -> DispatchOutcome {
        let budgets = match self.budgets.budgets(host) {
            Ok(budgets) => budgets,
            Err(e) => {
                warn!("Skipping icon layout pass: {e}");
                return DispatchOutcome::Skipped;
            }
        };

        // Each width is resolved once per pass.
        let candidates: Vec<Candidate> = self
            .registry
            .by_priority()
            .map(|slot| Candidate {
                id:       slot.id,
                width:    effective_width(slot, &*host),
                attached: slot.attached.is_some(),
                visible:  slot.visible,
            })
            .collect();

        let hidden = fit(&candidates, budgets);
        debug!(?budgets, ?hidden, "icon layout pass");

        host.apply_visibility(&hidden);
        self.hidden = Some(hidden);
        self.passes += 1;
        DispatchOutcome::Applied
    }

    fn refresh_appearance<H: Host>(&mut self, host: &mut H) {
        let maximized = if host.always_maximized() {
            true
        } else {
            match host.chrome() {
                Ok(chrome) => matches!(chrome, ChromeState::Maximized | ChromeState::Homescreen),
                Err(e) => {
                    debug!("Appearance unchanged: {e}");
                    return;
                }
            }
        };

        let appearance = Appearance { maximized };
        if self.appearance != Some(appearance) {
            host.apply_appearance(appearance);
            self.appearance = Some(appearance);
        }
    }
}
