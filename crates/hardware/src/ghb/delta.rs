//! Signed address deltas.
//!
//! Addresses are full 64-bit values, so the distance between two of them
//! does not fit an `i64`. A [`Delta`] keeps the magnitude as a `u64` and the
//! sign as an explicit direction, which makes both the correlation key and
//! the extrapolation step exact over the whole address space.

/// Distance from one address to another, with an explicit direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Delta {
    /// The two addresses are equal.
    Zero,
    /// The later address is higher by the given number of bytes.
    Ascending(u64),
    /// The later address is lower by the given number of bytes.
    Descending(u64),
}

impl Delta {
    /// Computes the delta that takes `from` to `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghb_prefetch::ghb::Delta;
    ///
    /// assert_eq!(Delta::between(100, 200), Delta::Ascending(100));
    /// assert_eq!(Delta::between(200, 100), Delta::Descending(100));
    /// assert_eq!(Delta::between(0, u64::MAX), Delta::Ascending(u64::MAX));
    /// ```
    #[inline]
    pub const fn between(from: u64, to: u64) -> Self {
        if to > from {
            Self::Ascending(to - from)
        } else if to < from {
            Self::Descending(from - to)
        } else {
            Self::Zero
        }
    }

    /// Applies the delta to `base`.
    ///
    /// Returns `None` if the result would underflow zero, overflow 64 bits,
    /// or exceed `limit`. Never wraps.
    ///
    /// # Arguments
    ///
    /// * `base` - The address to extrapolate from.
    /// * `limit` - The highest address the result may take.
    #[inline]
    pub const fn apply(self, base: u64, limit: u64) -> Option<u64> {
        let target = match self {
            Self::Zero => Some(base),
            Self::Ascending(n) => base.checked_add(n),
            Self::Descending(n) => base.checked_sub(n),
        };
        match target {
            Some(addr) if addr <= limit => Some(addr),
            _ => None,
        }
    }

    /// Returns the unsigned distance.
    #[inline]
    pub const fn magnitude(self) -> u64 {
        match self {
            Self::Zero => 0,
            Self::Ascending(n) | Self::Descending(n) => n,
        }
    }

    /// Folds the delta into a single 64-bit word for hashing.
    ///
    /// Ascending and descending deltas of the same magnitude fold to
    /// different words.
    #[inline]
    pub(crate) const fn fold(self) -> u64 {
        match self {
            Self::Zero => 0,
            Self::Ascending(n) => n,
            Self::Descending(n) => n.wrapping_neg() ^ (1 << 63),
        }
    }
}
