//! Price totals and completeness of an add-on selection.
//!
//! Everything here is a pure function of the selection records, the
//! add-ons they refer to and the party size.

use super::types::AddonSelection;
use crate::eligibility::AddonLookup;
use crate::types::{Addon, ChargeBasis, Money, UsagePolicy};

/// Price of one selected add-on
///
/// Guest-basis: price per assigned guest (the party size when no guest
/// count is recorded). Party-basis: price per unit.
#[must_use]
pub fn line_total(addon: &Addon, selection: &AddonSelection, party_size: u32) -> Money {
    match addon.basis {
        ChargeBasis::Guest => addon.price.times(selection.guest_count.unwrap_or(party_size)),
        ChargeBasis::Party => addon.price.times(selection.quantity),
    }
}

/// Sum of all line totals
///
/// Selections referring to unknown add-ons contribute nothing.
pub fn price_total<L>(lookup: &L, selections: &[AddonSelection], party_size: u32) -> Money
where
    L: AddonLookup + ?Sized,
{
    selections
        .iter()
        .filter_map(|selection| {
            lookup
                .addon(selection.addon)
                .map(|addon| line_total(addon, selection, party_size))
        })
        .sum()
}

/// Guests assigned across all selected menus
pub fn assigned_guests<L>(lookup: &L, selections: &[AddonSelection]) -> u32
where
    L: AddonLookup + ?Sized,
{
    selections
        .iter()
        .filter(|selection| lookup.addon(selection.addon).is_some_and(Addon::is_menu))
        .filter_map(|selection| selection.guest_count)
        .sum()
}

/// Whether a selection with `assigned` menu guests may be submitted
///
/// Only per-guest assignment can be incomplete: it must be untouched or
/// cover the whole party. Partial assignment leaves guests free to go
/// without a menu.
#[must_use]
pub const fn is_complete(policy: UsagePolicy, assigned: u32, party_size: u32) -> bool {
    match policy {
        UsagePolicy::PerGuest => assigned == 0 || assigned == party_size,
        UsagePolicy::PartialPerGuest
        | UsagePolicy::NoMenu
        | UsagePolicy::SharedMenu
        | UsagePolicy::Optional => true,
    }
}
