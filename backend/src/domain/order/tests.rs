//! Tests for order construction and the status lifecycle.

use super::*;
use chrono::{TimeDelta, TimeZone};
use rstest::{fixture, rstest};

fn address(street: &str) -> Address {
    Address::try_new(AddressParts {
        street: street.to_owned(),
        zip_code: "06600".to_owned(),
        ext_num: "10".to_owned(),
        int_num: None,
        city: "Guadalajara".to_owned(),
        state: "Jalisco".to_owned(),
        country: "MX".to_owned(),
    })
    .expect("valid address")
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn draft() -> OrderDraft {
    OrderDraft {
        client_id: UserId::random(),
        origin: Coordinates::new(20.6597, -103.3496),
        destination: Coordinates::new(19.4326, -99.1332),
        origin_address: address("Av. Vallarta"),
        destination_address: address("Paseo de la Reforma"),
        product_quantity: 2,
        total_weight: 3.5,
    }
}

#[fixture]
fn order(draft: OrderDraft, now: DateTime<Utc>) -> Order {
    Order::new(draft, now).expect("valid draft")
}

const ALLOWED: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Created, OrderStatus::Collected),
    (OrderStatus::Created, OrderStatus::Cancelled),
    (OrderStatus::Collected, OrderStatus::AtStation),
    (OrderStatus::Collected, OrderStatus::Cancelled),
    (OrderStatus::AtStation, OrderStatus::InRoute),
    (OrderStatus::AtStation, OrderStatus::Cancelled),
    (OrderStatus::InRoute, OrderStatus::Delivered),
    (OrderStatus::InRoute, OrderStatus::Cancelled),
];

#[rstest]
fn transition_table_matches_lifecycle() {
    for from in OrderStatus::ALL {
        for to in OrderStatus::ALL {
            let expected = ALLOWED.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{from} -> {to} should be {}",
                if expected { "allowed" } else { "rejected" }
            );
        }
    }
}

#[rstest]
#[case(OrderStatus::Delivered)]
#[case(OrderStatus::Cancelled)]
fn terminal_statuses_have_no_exits(#[case] status: OrderStatus) {
    assert!(status.is_terminal());
    assert!(OrderStatus::ALL.iter().all(|next| !status.can_transition_to(*next)));
}

#[rstest]
fn no_status_transitions_to_itself() {
    for status in OrderStatus::ALL {
        assert!(!status.can_transition_to(status));
    }
}

#[rstest]
#[case("created", OrderStatus::Created)]
#[case("at_station", OrderStatus::AtStation)]
#[case("in_route", OrderStatus::InRoute)]
fn status_parses_wire_names(#[case] raw: &str, #[case] expected: OrderStatus) {
    assert_eq!(raw.parse::<OrderStatus>().expect("known status"), expected);
}

#[rstest]
fn status_rejects_unknown_names() {
    let err = "lost".parse::<OrderStatus>().expect_err("unknown status");
    assert_eq!(err.to_string(), "invalid order status: lost");
}

#[rstest]
#[case(0.1, Some(PackageSize::S))]
#[case(5.0, Some(PackageSize::S))]
#[case(5.01, Some(PackageSize::M))]
#[case(15.0, Some(PackageSize::M))]
#[case(15.5, Some(PackageSize::L))]
#[case(25.0, Some(PackageSize::L))]
#[case(25.01, None)]
fn package_size_boundaries(#[case] weight: f64, #[case] expected: Option<PackageSize>) {
    assert_eq!(PackageSize::from_weight(weight), expected);
}

#[rstest]
fn new_order_starts_created(order: Order, now: DateTime<Utc>) {
    assert_eq!(order.status(), OrderStatus::Created);
    assert_eq!(order.package_size(), PackageSize::S);
    assert_eq!(order.revision(), 0);
    assert_eq!(order.created_at(), now);
    assert_eq!(order.updated_at(), now);
}

#[rstest]
fn heavy_order_is_rejected(mut draft: OrderDraft, now: DateTime<Utc>) {
    draft.total_weight = 25.01;
    let err = Order::new(draft, now).expect_err("too heavy");
    assert_eq!(err, OrderValidationError::WeightExceedsServiceLimit);
    assert!(err.to_string().starts_with("weight exceeds standard service limit"));
}

#[rstest]
#[case(0.0)]
#[case(-2.0)]
#[case(f64::NAN)]
fn non_positive_weight_is_rejected(mut draft: OrderDraft, now: DateTime<Utc>, #[case] weight: f64) {
    draft.total_weight = weight;
    assert_eq!(
        Order::new(draft, now).expect_err("bad weight"),
        OrderValidationError::WeightNotPositive
    );
}

#[rstest]
fn zero_quantity_is_rejected(mut draft: OrderDraft, now: DateTime<Utc>) {
    draft.product_quantity = 0;
    let err = Order::new(draft, now).expect_err("bad quantity");
    assert_eq!(err.to_string(), "product quantity must be greater than 0");
}

#[rstest]
#[case(MAX_PRODUCT_QUANTITY, true)]
#[case(MAX_PRODUCT_QUANTITY + 1, false)]
#[case(u32::MAX, false)]
fn quantity_is_capped_at_storage_range(
    mut draft: OrderDraft,
    now: DateTime<Utc>,
    #[case] quantity: u32,
    #[case] accepted: bool,
) {
    draft.product_quantity = quantity;
    match Order::new(draft, now) {
        Ok(order) => {
            assert!(accepted);
            assert_eq!(order.product_quantity(), quantity);
        }
        Err(err) => {
            assert!(!accepted);
            assert_eq!(err, OrderValidationError::QuantityTooLarge);
        }
    }
}

#[rstest]
fn origin_is_checked_before_everything_else(mut draft: OrderDraft, now: DateTime<Utc>) {
    draft.origin = Coordinates::new(91.0, 0.0);
    draft.destination = Coordinates::new(0.0, 200.0);
    draft.product_quantity = 0;
    draft.total_weight = 99.0;

    let err = Order::new(draft, now).expect_err("invalid");
    assert_eq!(
        err.to_string(),
        "invalid origin coordinates: latitude must be between -90 and 90"
    );
}

#[rstest]
fn destination_is_checked_before_quantity(mut draft: OrderDraft, now: DateTime<Utc>) {
    draft.destination = Coordinates::new(0.0, -180.5);
    draft.product_quantity = 0;

    let err = Order::new(draft, now).expect_err("invalid");
    assert_eq!(
        err.to_string(),
        "invalid destination coordinates: longitude must be between -180 and 180"
    );
}

#[rstest]
fn quantity_is_checked_before_weight(mut draft: OrderDraft, now: DateTime<Utc>) {
    draft.product_quantity = 0;
    draft.total_weight = -1.0;
    assert_eq!(
        Order::new(draft, now).expect_err("invalid"),
        OrderValidationError::QuantityNotPositive
    );
}

#[rstest]
#[case(90.0, 180.0)]
#[case(-90.0, -180.0)]
fn coordinate_bounds_are_inclusive(#[case] latitude: f64, #[case] longitude: f64) {
    assert!(Coordinates::new(latitude, longitude).validate().is_ok());
}

#[rstest]
fn update_status_advances_and_bumps_revision(mut order: Order, now: DateTime<Utc>) {
    let later = now + TimeDelta::hours(1);
    order
        .update_status(OrderStatus::Collected, later)
        .expect("allowed transition");

    assert_eq!(order.status(), OrderStatus::Collected);
    assert_eq!(order.updated_at(), later);
    assert_eq!(order.revision(), 1);
}

#[rstest]
fn rejected_transition_leaves_order_untouched(mut order: Order, now: DateTime<Utc>) {
    let before = order.clone();
    let err = order
        .update_status(OrderStatus::Delivered, now + TimeDelta::hours(1))
        .expect_err("skips stages");

    assert_eq!(
        err,
        InvalidTransition {
            from: OrderStatus::Created,
            to: OrderStatus::Delivered,
        }
    );
    assert_eq!(err.to_string(), "invalid status transition from created to delivered");
    assert_eq!(order, before);
}

/// Walk legal transitions from `created` until `order` sits in `target`.
fn drive_to(order: &mut Order, target: OrderStatus, now: DateTime<Utc>) {
    let mut at = now;
    while order.status() != target {
        let next = if target == OrderStatus::Cancelled {
            OrderStatus::Cancelled
        } else {
            *order
                .status()
                .allowed_transitions()
                .first()
                .expect("non-terminal status moves forward")
        };
        at += TimeDelta::minutes(1);
        order.update_status(next, at).expect("legal step");
    }
}

#[rstest]
fn every_illegal_transition_leaves_order_untouched(order: Order, now: DateTime<Utc>) {
    let mut checked = 0;
    for from in OrderStatus::ALL {
        let mut start = order.clone();
        drive_to(&mut start, from, now);
        for to in OrderStatus::ALL {
            if from.can_transition_to(to) {
                continue;
            }
            let mut candidate = start.clone();
            let before = candidate.clone();
            let err = candidate
                .update_status(to, now + TimeDelta::days(1))
                .expect_err("illegal transition");

            assert_eq!(err, InvalidTransition { from, to }, "{from} -> {to}");
            assert_eq!(candidate, before, "{from} -> {to} mutated the order");
            checked += 1;
        }
    }
    assert_eq!(checked, OrderStatus::ALL.len().pow(2) - ALLOWED.len());
}

#[rstest]
fn full_lifecycle_reaches_delivered(mut order: Order, now: DateTime<Utc>) {
    for next in [
        OrderStatus::Collected,
        OrderStatus::AtStation,
        OrderStatus::InRoute,
        OrderStatus::Delivered,
    ] {
        order.update_status(next, now).expect("forward transition");
    }
    assert_eq!(order.status(), OrderStatus::Delivered);
    assert_eq!(order.revision(), 4);
    assert!(order.update_status(OrderStatus::Cancelled, now).is_err());
}

#[rstest]
#[case(AddressParts { street: " ".into(), ..complete_parts() }, AddressValidationError::MissingStreetDetails)]
#[case(AddressParts { ext_num: String::new(), ..complete_parts() }, AddressValidationError::MissingStreetDetails)]
#[case(AddressParts { country: String::new(), ..complete_parts() }, AddressValidationError::MissingRegion)]
fn address_requires_fields(#[case] parts: AddressParts, #[case] expected: AddressValidationError) {
    assert_eq!(Address::try_new(parts).expect_err("incomplete"), expected);
}

fn complete_parts() -> AddressParts {
    AddressParts {
        street: "Insurgentes Sur".to_owned(),
        zip_code: "03100".to_owned(),
        ext_num: "1457".to_owned(),
        int_num: Some("4B".to_owned()),
        city: "CDMX".to_owned(),
        state: "CDMX".to_owned(),
        country: "MX".to_owned(),
    }
}

#[rstest]
fn address_display_includes_interior_number() {
    let address = Address::try_new(complete_parts()).expect("valid address");
    assert_eq!(
        address.to_string(),
        "Insurgentes Sur 1457 Int. 4B, 03100 CDMX, CDMX, MX"
    );
}
