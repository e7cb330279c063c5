//! Icon-visibility layout for the status bar.
//!
//! Decides which icons are hidden, for lack of space, in the maximized
//! (full-width) bar and in the minimized bar that shares its row with the
//! window's title chrome.  Everything runs synchronously inside
//! [`Engine::dispatch`]; there is no background work.

pub mod budget;
pub mod engine;
pub mod fitter;
pub mod gate;
pub mod registry;
pub mod width;

pub use budget::BudgetCalculator;
pub use engine::{DispatchOutcome, Engine};
pub use fitter::{fit, Candidate};
pub use gate::{PauseGate, Resume};
pub use registry::{PriorityEntry, PriorityRegistry, PriorityTable};
pub use width::{effective_width, measure};
