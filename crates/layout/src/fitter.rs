use iconbar_core::{Budgets, HideSets, IconKind, MinimizedBudget};

/// One icon as seen by the fitter, with its width already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id:       IconKind,
    pub width:    u32,
    /// A live icon exists for this slot.
    pub attached: bool,
    /// The icon's owner wants it shown.
    pub visible:  bool,
}

impl Candidate {
    /// An attached, visible icon.
    pub fn shown(id: IconKind, width: u32) -> Self {
        Self { id, width, attached: true, visible: true }
    }

    fn takes_part(&self) -> bool {
        self.attached && self.visible
    }
}

/// Greedy single-pass fit of `candidates` (highest priority first) into
/// both budgets.
///
/// An icon that overflows the maximized budget is hidden from both bars and
/// does not consume minimized budget.  Once the maximized budget is
/// negative every remaining icon is hidden from both.  Detached or
/// owner-hidden icons are skipped entirely and never appear in a hide-set.
///
/// With [`MinimizedBudget::Unconstrained`] the minimized bar gets no
/// width-based entries of its own; it only inherits what the maximized bar
/// hides.
pub fn fit(candidates: &[Candidate], budgets: Budgets) -> HideSets {
    let mut hidden = HideSets::default();
    let mut remaining_max = i64::from(budgets.maximized);
    let mut remaining_min = match budgets.minimized {
        MinimizedBudget::Width(width) => Some(i64::from(width)),
        MinimizedBudget::Unconstrained => None,
    };

    for candidate in candidates.iter().filter(|c| c.takes_part()) {
        if remaining_max >= 0 {
            remaining_max -= i64::from(candidate.width);
        }

        if remaining_max < 0 {
            hidden.hidden_in_maximized.insert(candidate.id);
            hidden.hidden_in_minimized.insert(candidate.id);
            continue;
        }

        if let Some(min) = remaining_min.as_mut() {
            *min -= i64::from(candidate.width);
            if *min < 0 {
                hidden.hidden_in_minimized.insert(candidate.id);
            }
        }
    }

    hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn budgets(maximized: i32, minimized: i32) -> Budgets {
        Budgets {
            maximized,
            minimized: MinimizedBudget::Width(minimized),
        }
    }

    fn set(ids: &[IconKind]) -> BTreeSet<IconKind> {
        ids.iter().copied().collect()
    }

    /// Order 1 = 20px, order 2 = 30px, order 3 = 50px.
    fn three_icons() -> [Candidate; 3] {
        [
            Candidate::shown(IconKind::Time, 20),
            Candidate::shown(IconKind::Battery, 30),
            Candidate::shown(IconKind::Wifi, 50),
        ]
    }

    #[test]
    fn lowest_priority_icon_overflows() {
        let hidden = fit(&three_icons(), budgets(60, 60));
        assert_eq!(hidden.hidden_in_maximized, set(&[IconKind::Wifi]));
        assert_eq!(hidden.hidden_in_minimized, set(&[IconKind::Wifi]));
    }

    #[test]
    fn narrower_minimized_bar_hides_more() {
        let hidden = fit(&three_icons(), budgets(100, 40));
        assert!(hidden.hidden_in_maximized.is_empty());
        assert_eq!(hidden.hidden_in_minimized, set(&[IconKind::Battery, IconKind::Wifi]));
    }

    #[test]
    fn maximized_overflow_does_not_consume_minimized_budget() {
        // Wifi (50) overflows the maximized bar at 90; it is hidden from both
        // and the minimized running total is left untouched for it.
        let hidden = fit(&three_icons(), budgets(90, 40));
        assert_eq!(hidden.hidden_in_maximized, set(&[IconKind::Wifi]));
        assert_eq!(hidden.hidden_in_minimized, set(&[IconKind::Battery, IconKind::Wifi]));
    }

    #[test]
    fn exact_fit_is_not_hidden() {
        let hidden = fit(&three_icons(), budgets(100, 100));
        assert!(hidden.is_empty());
    }

    #[test]
    fn negative_budget_hides_everything_visible() {
        let mut icons = three_icons().to_vec();
        icons.push(Candidate::shown(IconKind::Operator, 0));
        icons.push(Candidate { attached: false, ..Candidate::shown(IconKind::Mute, 20) });
        let hidden = fit(&icons, budgets(-5, 100));
        let all = set(&[IconKind::Time, IconKind::Battery, IconKind::Wifi, IconKind::Operator]);
        assert_eq!(hidden.hidden_in_maximized, all);
        assert_eq!(hidden.hidden_in_minimized, all);
    }

    #[test]
    fn once_overflowed_smaller_icons_stay_hidden() {
        let icons = [
            Candidate::shown(IconKind::Time, 50),
            Candidate::shown(IconKind::Battery, 30),
            Candidate::shown(IconKind::Wifi, 5),
        ];
        let hidden = fit(&icons, budgets(60, 60));
        assert_eq!(hidden.hidden_in_maximized, set(&[IconKind::Battery, IconKind::Wifi]));
    }

    #[test]
    fn skipped_icons_take_no_space() {
        let icons = [
            Candidate { visible: false, ..Candidate::shown(IconKind::Time, 500) },
            Candidate { attached: false, ..Candidate::shown(IconKind::Battery, 500) },
            Candidate::shown(IconKind::Wifi, 20),
        ];
        let hidden = fit(&icons, budgets(20, 20));
        assert!(hidden.is_empty());
    }

    #[test]
    fn unconstrained_minimized_only_inherits_maximized_hiding() {
        let hidden = fit(
            &three_icons(),
            Budgets {
                maximized: 60,
                minimized: MinimizedBudget::Unconstrained,
            },
        );
        assert_eq!(hidden.hidden_in_maximized, set(&[IconKind::Wifi]));
        assert_eq!(hidden.hidden_in_minimized, set(&[IconKind::Wifi]));

        let roomy = fit(
            &three_icons(),
            Budgets {
                maximized: 500,
                minimized: MinimizedBudget::Unconstrained,
            },
        );
        assert!(roomy.is_empty());
    }
}
