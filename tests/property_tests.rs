//! Property-based tests for POS API core arithmetic.
//!
//! These tests use proptest to verify invariants across a wide range of
//! inputs, helping to catch edge cases that unit tests might miss.

use pos_api::handlers::common::{non_negative_decimal, PaginationMeta, PaginationParams};
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn quantity_strategy() -> impl Strategy<Value = i32> {
    1i32..=100
}

fn cart_strategy() -> impl Strategy<Value = Vec<(Decimal, i32)>> {
    prop::collection::vec((price_strategy(), quantity_strategy()), 1..20)
}

// Property: cart totals agree with integer cent arithmetic
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn cart_total_matches_cent_arithmetic(cart in cart_strategy()) {
        let total = cart_total(&cart);

        let expected_cents: i64 = cart
            .iter()
            .map(|(price, qty)| price_cents(*price) * i64::from(*qty))
            .sum();

        prop_assert_eq!(total, Decimal::new(expected_cents, 2));
    }

    #[test]
    fn cart_total_is_at_least_every_line_subtotal(cart in cart_strategy()) {
        let total = cart_total(&cart);

        for (price, qty) in &cart {
            let subtotal = *price * Decimal::from(*qty);
            prop_assert!(total >= subtotal, "line {} exceeds total {}", subtotal, total);
        }
    }
}

// Property: stock decrements floor at zero
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn decremented_stock_is_never_negative(stock in 0i32..10_000, qty in quantity_strategy()) {
        prop_assert!(floored_decrement(stock, qty) >= 0);
    }

    #[test]
    fn decrement_is_exact_when_stock_suffices(qty in quantity_strategy(), surplus in 0i32..10_000) {
        let stock = qty + surplus;
        prop_assert_eq!(floored_decrement(stock, qty), surplus);
    }

    #[test]
    fn overselling_clamps_to_zero(stock in 0i32..100, extra in 1i32..100) {
        let qty = stock + extra;
        prop_assert_eq!(floored_decrement(stock, qty), 0);
    }
}

// Property: pagination metadata is internally consistent
proptest! {
    #[test]
    fn total_pages_cover_all_items(
        page in 1u64..1_000,
        limit in 1u64..10_000,
        total in 0u64..1_000_000,
    ) {
        let meta = PaginationMeta::new(page, limit, total);

        prop_assert_eq!(meta.page, page);
        prop_assert_eq!(meta.limit, limit);

        if total == 0 {
            prop_assert_eq!(meta.total_pages, 0);
        } else {
            prop_assert!(meta.total_pages * limit >= total, "pages too few");
            prop_assert!((meta.total_pages - 1) * limit < total, "pages too many");
        }
    }

    #[test]
    fn clamped_params_stay_in_bounds(
        page in 0u64..10_000,
        limit in 0u64..10_000,
        max_limit in 1u64..1_000,
    ) {
        let params = PaginationParams { page, limit };
        let (page, limit) = params.clamped(max_limit);

        prop_assert!(page >= 1);
        prop_assert!(limit >= 1);
        prop_assert!(limit <= max_limit);
    }

    #[test]
    fn offset_skips_whole_pages(page in 1u64..10_000, limit in 0u64..1_000) {
        let params = PaginationParams { page, limit };
        prop_assert_eq!(params.offset(), (page - 1) * limit);
    }
}

// Property: money formatting always shows two decimal places
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn formatted_money_has_two_decimals(amount in price_strategy()) {
        let formatted = format!("{:.2}", amount);

        let (_, fraction) = formatted
            .split_once('.')
            .expect("formatted money has a decimal point");
        prop_assert_eq!(fraction.len(), 2);

        let reparsed: Decimal = formatted.parse().expect("formatted money parses");
        prop_assert_eq!(reparsed, amount);
    }

    #[test]
    fn non_negative_amounts_pass_validation(amount in price_strategy()) {
        prop_assert!(non_negative_decimal(&amount).is_ok());
    }

    #[test]
    fn negative_amounts_fail_validation(cents in 1i64..1_000_000) {
        let amount = Decimal::new(-cents, 2);
        prop_assert!(non_negative_decimal(&amount).is_err());
    }
}

// Property: generated purchase order references have a fixed shape
proptest! {
    #[test]
    fn generated_references_are_po_prefixed_hex(raw in any::<u128>()) {
        let reference = generated_reference(Uuid::from_u128(raw));

        prop_assert_eq!(reference.len(), 11);
        prop_assert!(reference.starts_with("PO-"));
        prop_assert!(reference[3..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_references_are_deterministic(raw in any::<u128>()) {
        let id = Uuid::from_u128(raw);
        prop_assert_eq!(generated_reference(id), generated_reference(id));
    }
}

// Helper functions mirroring the sale and procurement arithmetic
fn cart_total(cart: &[(Decimal, i32)]) -> Decimal {
    cart.iter()
        .map(|(price, qty)| *price * Decimal::from(*qty))
        .sum()
}

fn price_cents(price: Decimal) -> i64 {
    (price * Decimal::from(100))
        .to_i64()
        .expect("cent amounts fit in i64")
}

fn floored_decrement(stock: i32, qty: i32) -> i32 {
    (stock - qty).max(0)
}

fn generated_reference(id: Uuid) -> String {
    format!("PO-{}", id.to_string()[..8].to_uppercase())
}
