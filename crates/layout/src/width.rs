use iconbar_core::{round_px, ElementGeometry, IconGeometrySource, IconSlot, WidthPolicy};

/// Rendered width of an icon element: content plus margins, rounded with
/// the same rule the budgets use.
pub fn measure(geometry: ElementGeometry) -> u32 {
    round_px(geometry.outer_width()).max(0) as u32
}

/// Width `slot` occupies in the bar.
///
/// Fixed widths are returned as declared.  A dynamic icon that has not been
/// created yet, or has no renderable element, takes no space so that it
/// never blocks lower-priority icons.
pub fn effective_width(slot: &IconSlot, icons: &impl IconGeometrySource) -> u32 {
    match slot.width {
        WidthPolicy::Fixed(width) => width,
        WidthPolicy::Dynamic => {
            let Some(handle) = slot.attached else {
                return 0;
            };
            slot.cached_width
                .or_else(|| icons.geometry(handle).map(measure))
                .unwrap_or(0)
        }
    }
}
