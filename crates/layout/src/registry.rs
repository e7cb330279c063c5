use iconbar_config::IconOverride;
use iconbar_core::{IconBarError, IconHandle, IconKind, IconSlot, Result, WidthPolicy};
use tracing::{debug, warn};

/// Width of a regular 16px glyph icon plus its 4px margin.
const GLYPH_WIDTH: u32 = 16 + 4;

/// One row of the static priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityEntry {
    pub id:    IconKind,
    pub order: i32,
    pub width: WidthPolicy,
}

impl PriorityEntry {
    pub const fn new(id: IconKind, order: i32, width: WidthPolicy) -> Self {
        Self { id, order, width }
    }
}

/// Immutable icon priority table, built once at startup.
///
/// Definition order matters: icons sharing an `order` value are fitted in
/// the order they appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    entries: Vec<PriorityEntry>,
    /// Indices into `entries`, sorted by `order` (stable on definition order).
    fit_order: Vec<usize>,
}

impl PriorityTable {
    /// Build a table from `entries`.  A repeated id keeps its first definition.
    pub fn new(entries: impl IntoIterator<Item = PriorityEntry>) -> Self {
        let mut unique: Vec<PriorityEntry> = Vec::new();
        for entry in entries {
            if unique.iter().any(|e| e.id == entry.id) {
                warn!("Duplicate priority entry for '{}' ignored", entry.id);
                continue;
            }
            unique.push(entry);
        }

        let mut fit_order: Vec<usize> = (0..unique.len()).collect();
        fit_order.sort_by_key(|&i| unique[i].order);

        Self { entries: unique, fit_order }
    }

    /// Built-in table with per-kind overrides applied on top.
    pub fn with_overrides(overrides: &[(IconKind, IconOverride)]) -> Self {
        let entries = Self::default().entries.into_iter().map(|mut entry| {
            if let Some((_, ov)) = overrides.iter().find(|(kind, _)| *kind == entry.id) {
                if let Some(order) = ov.order {
                    entry.order = order;
                }
                if let Some(width) = ov.width {
                    entry.width = width.into();
                }
                debug!("Priority override for '{}': {:?}", entry.id, entry);
            }
            entry
        });
        Self::new(entries)
    }

    /// Position of `id` in definition order along with its entry.
    pub fn entry(&self, id: IconKind) -> Option<(usize, &PriorityEntry)> {
        self.entries.iter().enumerate().find(|(_, e)| e.id == id)
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &[PriorityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        use IconKind::*;
        use WidthPolicy::{Dynamic, Fixed};

        Self::new([
            PriorityEntry::new(EmergencyCallback,  12, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Battery,             2, Fixed(25 + 4)),
            PriorityEntry::new(Recording,          16, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(AirplaneMode,        3, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Wifi,                4, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(MobileConnection,    5, Dynamic),
            PriorityEntry::new(Time,                1, Dynamic),
            PriorityEntry::new(Debugging,          11, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Download,           13, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Geolocation,        17, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(NetworkActivity,     6, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Tethering,           7, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(BluetoothTransfer,   9, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Bluetooth,           8, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Nfc,                10, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Usb,                14, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Alarm,              22, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(BluetoothHeadphone, 19, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Mute,               15, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(CallForwardings,    18, Dynamic),
            PriorityEntry::new(Playing,            21, Fixed(GLYPH_WIDTH)),
            PriorityEntry::new(Headphone,          20, Fixed(GLYPH_WIDTH)),
            // Only shown in the maximized bar; width follows the operator name.
            PriorityEntry::new(Operator,           23, Dynamic),
        ])
    }
}

/// Live slots for the icon kinds of a [`PriorityTable`].
///
/// Slots are created from the table and mutated in place; they are never
/// removed.
#[derive(Debug, Clone)]
pub struct PriorityRegistry<'t> {
    table: &'t PriorityTable,
    /// Indexed like `table.entries`.
    slots: Vec<Option<IconSlot>>,
}

impl<'t> PriorityRegistry<'t> {
    /// An empty registry; slots are created lazily by [`register`](Self::register).
    pub fn new(table: &'t PriorityTable) -> Self {
        Self {
            table,
            slots: vec![None; table.len()],
        }
    }

    /// A registry with a slot for every table entry.
    pub fn populated(table: &'t PriorityTable) -> Self {
        let mut registry = Self::new(table);
        for (index, entry) in table.entries().iter().enumerate() {
            registry.slots[index] = Some(IconSlot::new(entry.id, entry.order, entry.width));
        }
        registry
    }

    pub fn table(&self) -> &'t PriorityTable {
        self.table
    }

    /// Return the slot for `id`, creating it from the table on first use.
    pub fn register(&mut self, id: IconKind) -> Result<&mut IconSlot> {
        let (index, entry) = self
            .table
            .entry(id)
            .ok_or_else(|| IconBarError::UnknownIconKind(id.to_string()))?;
        let entry = *entry;

        Ok(self.slots[index].get_or_insert_with(|| IconSlot::new(entry.id, entry.order, entry.width)))
    }

    /// Like [`register`](Self::register), for an identifier straight off the wire.
    pub fn register_name(&mut self, name: &str) -> Result<&mut IconSlot> {
        let id = name.parse::<IconKind>()?;
        self.register(id)
    }

    pub fn get(&self, id: IconKind) -> Option<&IconSlot> {
        let (index, _) = self.table.entry(id)?;
        self.slots[index].as_ref()
    }

    /// Bind a live icon to its slot.
    ///
    /// Re-attaching replaces the old handle and drops the width measured on
    /// the old element.
    pub fn attach(&mut self, id: IconKind, handle: IconHandle) -> Result<()> {
        let slot = self.register(id)?;
        if let Some(old) = slot.attached.replace(handle) {
            if old != handle {
                debug!("Icon '{id}' re-created: {old:?} -> {handle:?}");
                slot.cached_width = None;
            }
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: IconKind, visible: bool) -> Result<()> {
        self.register(id)?.visible = visible;
        Ok(())
    }

    /// Cache the measured width of a dynamic icon.
    ///
    /// Returns `false` (and changes nothing) for fixed-width icons.
    pub fn set_static_width(&mut self, id: IconKind, width: u32) -> Result<bool> {
        let slot = self.register(id)?;
        if !slot.width.is_dynamic() {
            return Ok(false);
        }
        slot.cached_width = Some(width);
        Ok(true)
    }

    /// Existing slots, highest priority first.
    pub fn by_priority(&self) -> impl Iterator<Item = &IconSlot> + '_ {
        self.table
            .fit_order
            .iter()
            .filter_map(move |&index| self.slots[index].as_ref())
    }
}
