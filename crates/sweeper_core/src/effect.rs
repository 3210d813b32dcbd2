/// What the driver must do next for a unit after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEffect {
    /// (Re)open the unit's surface.
    Open,
    ProbeEmpty,
    ReadCount,
    SelectAll,
    DeleteSelected,
    /// The unit is terminal: release its surface and report the outcome.
    Close,
    /// Leave the unit for a later pass.
    Wait,
    /// Nothing to do; the message did not apply to the current state.
    None,
}

impl UnitEffect {
    /// Effects that end the current turn of the unit.
    pub fn ends_turn(self) -> bool {
        matches!(self, UnitEffect::Close | UnitEffect::Wait | UnitEffect::None)
    }
}
