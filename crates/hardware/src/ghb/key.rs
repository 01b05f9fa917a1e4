//! Correlation keys.
//!
//! A correlation key is the value two accesses must share for the second to
//! be linked to the first in the History Buffer. The key function is chosen
//! at construction by [`KeyKind`]:
//!
//! - `Address`: the raw address. Predicts what followed this exact address.
//! - `Delta`: the distance from the previous access.
//! - `DeltaPair`: the last two distances. Needs two earlier accesses.
//! - `ProgramCounter`: the accessing instruction. Needs a PC on the event.

use super::{Delta, HistoryBuffer};
use crate::config::KeyKind;

/// Multiplier used to separate key variants when folding.
const VARIANT_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// A value used to detect repeating access patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationKey {
    /// Raw access address.
    Address(u64),
    /// Distance from the previous access.
    Delta(Delta),
    /// Distances from the second-previous to the previous access, and from
    /// the previous to the current access.
    DeltaPair(Delta, Delta),
    /// Program counter of the accessing instruction.
    ProgramCounter(u64),
}

impl CorrelationKey {
    /// Derives the key for an access that is about to be recorded.
    ///
    /// Must be called before the access is inserted, so that the History
    /// Buffer head still holds the previous access.
    ///
    /// # Arguments
    ///
    /// * `kind` - The configured key function.
    /// * `address` - Address of the current access.
    /// * `program_counter` - PC of the current access, if the host supplied one.
    /// * `history` - The History Buffer, used for the delta variants.
    ///
    /// # Returns
    ///
    /// `None` when the key cannot be formed yet: no previous access for
    /// `Delta`, fewer than two for `DeltaPair`, or no PC for `ProgramCounter`.
    pub fn derive(
        kind: KeyKind,
        address: u64,
        program_counter: Option<u64>,
        history: &HistoryBuffer,
    ) -> Option<Self> {
        match kind {
            KeyKind::Address => Some(Self::Address(address)),
            KeyKind::ProgramCounter => program_counter.map(Self::ProgramCounter),
            KeyKind::Delta => {
                let prev = history.recent_address(0)?;
                Some(Self::Delta(Delta::between(prev, address)))
            }
            KeyKind::DeltaPair => {
                let prev = history.recent_address(0)?;
                let prev2 = history.recent_address(1)?;
                Some(Self::DeltaPair(
                    Delta::between(prev2, prev),
                    Delta::between(prev, address),
                ))
            }
        }
    }

    /// Folds the key into one 64-bit word for direct-mapped hashing.
    pub(crate) const fn fold(&self) -> u64 {
        match *self {
            Self::Address(addr) => addr,
            Self::Delta(d) => d.fold().wrapping_mul(VARIANT_SALT),
            Self::DeltaPair(first, second) => {
                first.fold().rotate_left(29) ^ second.fold().wrapping_mul(VARIANT_SALT)
            }
            Self::ProgramCounter(pc) => pc.rotate_left(17) ^ VARIANT_SALT,
        }
    }
}
