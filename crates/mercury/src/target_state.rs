/// The MCM's state, as reported by `GetState`.
///
/// The device reports a single opaque byte; this mediator only ever acts on
/// the six predicates below, so rather than enumerating every value the
/// byte can take, each predicate tests one bit. The bit assignment below is
/// this mediator's own framing of the wire value — the device's actual
/// encoding is undocumented upstream — chosen so the predicates compose
/// independently (a state can be, for instance, both `ready for new
/// mission` and `jamming requested` while the previous mission is torn
/// down).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TargetState {
    /// No reply was received, or the reply could not be decoded.
    Unknown,
    /// A reply was received and decoded to this raw state byte.
    Known(u8),
}

const ZEROIZED: u8 = 0x01;
const READY_FOR_NEW_MISSION: u8 = 0x02;
const OPERATIONAL: u8 = 0x04;
const STARTUP: u8 = 0x08;
const JAMMING: u8 = 0x10;
const JAMMING_REQUESTED: u8 = 0x20;

impl TargetState {
    fn bit(&self, mask: u8) -> bool {
        matches!(self, TargetState::Known(raw) if raw & mask != 0)
    }

    /// No mission is loaded.
    #[must_use]
    pub fn is_zeroized(&self) -> bool {
        self.bit(ZEROIZED)
    }

    /// The device will accept a new mission upload right now.
    #[must_use]
    pub fn is_ready_for_new_mission(&self) -> bool {
        self.bit(READY_FOR_NEW_MISSION)
    }

    /// A mission is fully installed and the device is actively running it.
    /// This is distinct from, and can briefly overlap with,
    /// [`TargetState::is_ready_for_new_mission`] during the installation of
    /// a pre-loaded mission.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.bit(OPERATIONAL)
    }

    /// The device is still starting up and not ready for commands that
    /// assume a settled state.
    #[must_use]
    pub fn is_startup(&self) -> bool {
        self.bit(STARTUP)
    }

    /// The device is actively jamming.
    #[must_use]
    pub fn is_jamming(&self) -> bool {
        self.bit(JAMMING)
    }

    /// The device is jamming, or has been asked to start and has not yet
    /// confirmed.
    #[must_use]
    pub fn is_jamming_or_requested(&self) -> bool {
        self.bit(JAMMING) || self.bit(JAMMING_REQUESTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_satisfies_no_predicate() {
        let state = TargetState::Unknown;
        assert!(!state.is_zeroized());
        assert!(!state.is_ready_for_new_mission());
        assert!(!state.is_operational());
        assert!(!state.is_startup());
        assert!(!state.is_jamming());
        assert!(!state.is_jamming_or_requested());
    }

    #[test]
    fn ready_and_operational_can_be_distinguished() {
        let ready_only = TargetState::Known(READY_FOR_NEW_MISSION);
        let ready_and_operational = TargetState::Known(READY_FOR_NEW_MISSION | OPERATIONAL);
        assert!(ready_only.is_ready_for_new_mission() && !ready_only.is_operational());
        assert!(
            ready_and_operational.is_ready_for_new_mission()
                && ready_and_operational.is_operational()
        );
    }

    #[test]
    fn jamming_requested_counts_toward_jamming_or_requested() {
        let state = TargetState::Known(JAMMING_REQUESTED);
        assert!(!state.is_jamming());
        assert!(state.is_jamming_or_requested());
    }
}
