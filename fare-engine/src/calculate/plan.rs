//! Subscription plans and their discount rates.

use std::fmt;

use crate::domain::Rate;

/// Supplement fare in cents charged during an off-peak window.
pub const OFF_PEAK_SUPPLEMENT_CENTS: i64 = 156;

/// Supplement fare in cents charged during rush hour.
pub const PEAK_SUPPLEMENT_CENTS: i64 = 262;

/// A subscription plan, reduced to the discount rate it grants per peak
/// bucket. Supplement fares are flat tariff constants shared by every
/// plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountPlan {
    /// Pay-as-you-go, full fare at all times.
    Flat,
    /// Subscription covering off-peak travel entirely.
    OffPeakFree,
    /// 40% off outside rush hour.
    OffPeakDiscount,
    /// 40% off outside rush hour, 20% off inside it.
    AlwaysDiscount,
}

impl DiscountPlan {
    pub const ALL: [DiscountPlan; 4] = [
        DiscountPlan::Flat,
        DiscountPlan::OffPeakFree,
        DiscountPlan::OffPeakDiscount,
        DiscountPlan::AlwaysDiscount,
    ];

    /// The rate applied to a travel fare under this plan.
    pub fn travel_rate(&self, off_peak: bool) -> Rate {
        match (self, off_peak) {
            (DiscountPlan::Flat, _) => Rate::FULL,
            (DiscountPlan::OffPeakFree, true) => Rate::FREE,
            (DiscountPlan::OffPeakFree, false) => Rate::FULL,
            (DiscountPlan::OffPeakDiscount, true) => Rate::new(3, 5),
            (DiscountPlan::OffPeakDiscount, false) => Rate::FULL,
            (DiscountPlan::AlwaysDiscount, true) => Rate::new(3, 5),
            (DiscountPlan::AlwaysDiscount, false) => Rate::new(4, 5),
        }
    }
}

impl fmt::Display for DiscountPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiscountPlan::Flat => "flat fare",
            DiscountPlan::OffPeakFree => "off-peak free",
            DiscountPlan::OffPeakDiscount => "off-peak discount",
            DiscountPlan::AlwaysDiscount => "always discount",
        };
        f.write_str(name)
    }
}
