//! Cycle boundary ("switchpoint") arithmetic.
//!
//! Everything here is a pure function of a block height and a cycle length in
//! blocks. Cycle lengths must be non-zero. A boundary that does not fit in a
//! `u64` comes back as `None`.

/// First multiple of `size` at or after `height`.
#[inline]
pub fn boundary_at_or_after(height: u64, size: u64) -> Option<u64> {
    height.div_ceil(size).checked_mul(size)
}

/// Settlement boundary at or after `height`, shifted `cycles_ahead` epochs forward.
pub fn settlement_switchpoint(height: u64, settlement_size: u64, cycles_ahead: u64) -> Option<u64> {
    boundary_at_or_after(height, settlement_size)?.checked_add(cycles_ahead.checked_mul(settlement_size)?)
}

/// First block of the settlement epoch `cycles_back` epochs before the one
/// ending at `switchpoint`.
///
/// `None` when that epoch would start before genesis.
pub fn front_settlement_switchpoint(switchpoint: u64, settlement_size: u64, cycles_back: u64) -> Option<u64> {
    let span = cycles_back.checked_add(1)?.checked_mul(settlement_size)?;
    switchpoint.checked_sub(span - 1)
}

/// Consensus-round boundary at or after `height`, shifted `rounds_ahead` rounds forward.
pub fn consensus_switchpoint(height: u64, consensus_size: u64, rounds_ahead: u64) -> Option<u64> {
    boundary_at_or_after(height, consensus_size)?.checked_add(rounds_ahead.checked_mul(consensus_size)?)
}

/// Annual boundary at or after `height`.
pub fn annual_switchpoint(height: u64, blocks_per_year: u64) -> Option<u64> {
    boundary_at_or_after(height, blocks_per_year)
}

/// Height the annual wait targets: always strictly after `height`, so a wait
/// started exactly on a boundary runs to the next one.
pub fn annual_wait_target(height: u64, blocks_per_year: u64) -> Option<u64> {
    height.checked_add(blocks_per_year - height % blocks_per_year)
}
