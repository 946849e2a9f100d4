//! Revenue-split arithmetic.
//!
//! Pure functions over integer cents. Every split assigns the division
//! remainder to the last party computed, so the shares of a branch always
//! sum exactly to the amount being split.

/// Percentage of the order total routed to the referring affiliate.
pub const AFFILIATE_PERCENT: i64 = 20;
/// Instructor cut when a promo code drove the sale (platform keeps 3%).
pub const PROMO_INSTRUCTOR_PERCENT: i64 = 97;
/// Instructor cut on the default 50/50 split.
pub const DEFAULT_INSTRUCTOR_PERCENT: i64 = 50;
/// Carve-out from a course line's final price when the course has
/// active co-authors.
pub const CO_AUTHOR_PERCENT: i64 = 35;

/// Which discount instruments participated in an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstrumentUsage {
    pub coupon: bool,
    pub promo: bool,
    pub affiliate: bool,
}

/// Exactly one split branch applies per order. Affiliate attribution wins
/// over both code kinds; promo wins over coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitBranch {
    AffiliateReferred,
    PromoApplied,
    CouponApplied,
    Unassisted,
}

impl InstrumentUsage {
    pub fn branch(&self) -> SplitBranch {
        if self.affiliate {
            SplitBranch::AffiliateReferred
        } else if self.promo {
            SplitBranch::PromoApplied
        } else if self.coupon {
            SplitBranch::CouponApplied
        } else {
            SplitBranch::Unassisted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueShares {
    pub instructor_share: i64,
    pub platform_share: i64,
    pub affiliate_share: i64,
}

/// Split an order's final amount among instructor, platform and affiliate.
///
/// The co-author carve-out is *not* part of this split: it is computed per
/// course line and recorded as an independent order-level total, without
/// reducing the instructor share.
pub fn split_revenue(final_amount: i64, usage: InstrumentUsage) -> RevenueShares {
    match usage.branch() {
        SplitBranch::AffiliateReferred => {
            let affiliate_share = final_amount * AFFILIATE_PERCENT / 100;
            let remaining = final_amount - affiliate_share;
            let instructor_share = remaining * DEFAULT_INSTRUCTOR_PERCENT / 100;
            RevenueShares {
                instructor_share,
                platform_share: remaining - instructor_share,
                affiliate_share,
            }
        }
        SplitBranch::PromoApplied => {
            let instructor_share = final_amount * PROMO_INSTRUCTOR_PERCENT / 100;
            RevenueShares {
                instructor_share,
                platform_share: final_amount - instructor_share,
                affiliate_share: 0,
            }
        }
        SplitBranch::CouponApplied | SplitBranch::Unassisted => {
            let instructor_share = final_amount * DEFAULT_INSTRUCTOR_PERCENT / 100;
            RevenueShares {
                instructor_share,
                platform_share: final_amount - instructor_share,
                affiliate_share: 0,
            }
        }
    }
}

/// Discount taken by one instrument against a line's base price
/// (base = unit price x quantity).
pub fn line_discount(base_price: i64, percent: i32) -> i64 {
    base_price * percent as i64 / 100
}

/// Share of a course line's final price set aside for its co-authors.
pub fn co_author_carve_out(line_final_price: i64) -> i64 {
    line_final_price * CO_AUTHOR_PERCENT / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(coupon: bool, promo: bool, affiliate: bool) -> InstrumentUsage {
        InstrumentUsage {
            coupon,
            promo,
            affiliate,
        }
    }

    #[test]
    fn test_branch_priority() {
        assert_eq!(
            usage(true, true, true).branch(),
            SplitBranch::AffiliateReferred
        );
        assert_eq!(usage(true, true, false).branch(), SplitBranch::PromoApplied);
        assert_eq!(
            usage(true, false, false).branch(),
            SplitBranch::CouponApplied
        );
        assert_eq!(usage(false, false, false).branch(), SplitBranch::Unassisted);
    }

    #[test]
    fn test_unassisted_split_is_even() {
        let shares = split_revenue(10000, usage(false, false, false));
        assert_eq!(shares.instructor_share, 5000);
        assert_eq!(shares.platform_share, 5000);
        assert_eq!(shares.affiliate_share, 0);
    }

    #[test]
    fn test_coupon_split_matches_default() {
        // 100.00 cart with a 10% coupon: final 90.00, split 45/45
        let shares = split_revenue(9000, usage(true, false, false));
        assert_eq!(shares.instructor_share, 4500);
        assert_eq!(shares.platform_share, 4500);
        assert_eq!(shares.affiliate_share, 0);
    }

    #[test]
    fn test_promo_split_favors_instructor() {
        let shares = split_revenue(10000, usage(false, true, false));
        assert_eq!(shares.instructor_share, 9700);
        assert_eq!(shares.platform_share, 300);
        assert_eq!(shares.affiliate_share, 0);
    }

    #[test]
    fn test_affiliate_takes_cut_before_even_split() {
        let shares = split_revenue(10000, usage(false, false, true));
        assert_eq!(shares.affiliate_share, 2000);
        assert_eq!(shares.instructor_share, 4000);
        assert_eq!(shares.platform_share, 4000);
    }

    #[test]
    fn test_shares_sum_to_final_amount_on_every_branch() {
        // Amounts chosen to leave division remainders
        for final_amount in [1i64, 33, 99, 101, 12345] {
            for u in [
                usage(false, false, false),
                usage(true, false, false),
                usage(false, true, false),
                usage(true, true, true),
            ] {
                let shares = split_revenue(final_amount, u);
                assert_eq!(
                    shares.instructor_share + shares.platform_share + shares.affiliate_share,
                    final_amount,
                    "branch {:?} leaked money on {final_amount}",
                    u.branch()
                );
            }
        }
    }

    #[test]
    fn test_line_discount_on_quantity_priced_base() {
        // unit 50.00 x 2 = base 100.00, 10% off
        assert_eq!(line_discount(10000, 10), 1000);
        assert_eq!(line_discount(9999, 10), 999);
    }

    #[test]
    fn test_co_author_carve_out() {
        assert_eq!(co_author_carve_out(10000), 3500);
        // independent of the split: nothing here touches RevenueShares
        let shares = split_revenue(10000, InstrumentUsage::default());
        assert_eq!(shares.instructor_share, 5000);
    }
}
