/// Observations fed into a work unit's state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitMsg {
    /// The scheduler reached the unit during a pass over the active set.
    Poll,
    /// The surface for the unit finished opening.
    Opened,
    /// The surface says whether it shows an explicit "no results" state.
    EmptyChecked(bool),
    /// Parsed results count; `None` when it could not be read.
    CountRead(Option<u64>),
    /// Whether the bulk-select control could be triggered.
    SelectAttempted(bool),
    /// Whether the delete action could be triggered on the selection.
    DeleteAttempted(bool),
    /// Stale reference, timeout, slow render: try again later.
    Transient(String),
    /// The surface or the whole session is gone.
    SessionLost(String),
}
