pub mod depth;
pub mod feature;
pub mod history;
pub mod status;

pub use depth::Depth;
pub use feature::{CheckOutcome, ChecklistItem, Feature, MachineCheck, MachineState};
pub use history::{EventKind, HistoryEvent};
pub use status::{VerificationStatus, CHECKLIST_ACTOR};
