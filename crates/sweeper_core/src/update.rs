use std::time::Duration;

use crate::{SweepSettings, UnitEffect, UnitMsg, UnitState, WorkUnit};

/// Pure update function: applies an observation to a unit and returns the
/// next effect the driver should perform. `now` is the offset from the start
/// of the run.
pub fn update(
    mut unit: WorkUnit,
    msg: UnitMsg,
    now: Duration,
    settings: &SweepSettings,
) -> (WorkUnit, UnitEffect) {
    if unit.is_terminal() {
        return (unit, UnitEffect::None);
    }

    let effect = match (unit.state().clone(), msg) {
        (_, UnitMsg::SessionLost(reason)) => {
            finish(&mut unit, now, UnitState::DoneError { reason });
            UnitEffect::Close
        }

        (UnitState::Opening { .. }, UnitMsg::Poll) => UnitEffect::Open,
        (UnitState::Opening { .. }, UnitMsg::Opened) => {
            unit.set_state(UnitState::Ready);
            unit.touch(now);
            UnitEffect::Wait
        }
        (UnitState::Opening { attempts }, UnitMsg::Transient(reason)) => {
            let attempts = attempts.saturating_add(1);
            if attempts >= settings.open_attempts.max(1) {
                let reason = format!("could not open after {attempts} attempts: {reason}");
                finish(&mut unit, now, UnitState::DoneError { reason });
                UnitEffect::Close
            } else {
                unit.set_state(UnitState::Opening { attempts });
                UnitEffect::Open
            }
        }

        (UnitState::Busy { since }, UnitMsg::Poll)
            if now.saturating_sub(since) < settings.cooldown =>
        {
            UnitEffect::Wait
        }
        (UnitState::Ready | UnitState::Busy { .. }, UnitMsg::Poll) => {
            unit.set_state(UnitState::SafetyCheck {
                empty_reported: false,
            });
            UnitEffect::ProbeEmpty
        }

        // After at least one page went away an empty listing is final, even if
        // a stale count label is still on screen.
        (UnitState::SafetyCheck { .. }, UnitMsg::EmptyChecked(true))
            if unit.pages_deleted() > 0 =>
        {
            finish(&mut unit, now, UnitState::DoneEmpty);
            UnitEffect::Close
        }
        (UnitState::SafetyCheck { .. }, UnitMsg::EmptyChecked(empty_reported)) => {
            unit.set_state(UnitState::SafetyCheck { empty_reported });
            UnitEffect::ReadCount
        }
        (UnitState::SafetyCheck { empty_reported }, UnitMsg::CountRead(count)) => match count {
            Some(count) if count > 0 && count < settings.safety_threshold => {
                finish(&mut unit, now, UnitState::DoneSafeSkip { count });
                UnitEffect::Close
            }
            _ if empty_reported => {
                finish(&mut unit, now, UnitState::DoneEmpty);
                UnitEffect::Close
            }
            _ => {
                unit.set_state(UnitState::Selecting);
                UnitEffect::SelectAll
            }
        },

        (UnitState::Selecting, UnitMsg::SelectAttempted(true)) => {
            unit.set_state(UnitState::Deleting);
            UnitEffect::DeleteSelected
        }
        (UnitState::Selecting, UnitMsg::SelectAttempted(false)) => back_off(
            &mut unit,
            now,
            settings,
            "select-all control not available".to_string(),
        ),

        (UnitState::Deleting, UnitMsg::DeleteAttempted(true)) => {
            unit.record_deleted_page();
            unit.set_state(UnitState::Busy { since: now });
            unit.touch(now);
            UnitEffect::Wait
        }
        (UnitState::Deleting, UnitMsg::DeleteAttempted(false)) => back_off(
            &mut unit,
            now,
            settings,
            "delete action not available".to_string(),
        ),

        (_, UnitMsg::Transient(reason)) => back_off(&mut unit, now, settings, reason),

        _ => UnitEffect::None,
    };

    (unit, effect)
}

fn finish(unit: &mut WorkUnit, now: Duration, state: UnitState) {
    unit.set_state(state);
    unit.touch(now);
}

/// Counts a failed attempt and either parks the unit for a cooldown or
/// abandons it once the retry budget is spent.
fn back_off(
    unit: &mut WorkUnit,
    now: Duration,
    settings: &SweepSettings,
    reason: String,
) -> UnitEffect {
    let failures = unit.record_failure();
    match settings.retry_budget {
        Some(budget) if failures >= budget => {
            let reason = format!("gave up after {failures} consecutive failed attempts: {reason}");
            finish(unit, now, UnitState::DoneError { reason });
            UnitEffect::Close
        }
        _ => {
            unit.set_state(UnitState::Busy { since: now });
            unit.touch(now);
            UnitEffect::Wait
        }
    }
}
