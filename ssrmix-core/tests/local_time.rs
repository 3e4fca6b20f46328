//! Expiry read in the system zone. Every test here pins `TZ` to the same
//! DST-observing zone before touching local time.

mod common;

use std::sync::Once;

use common::{allow, bulk_with_expiry, link, loads};
use ssrmix_core::error::SsrError;
use ssrmix_core::meta::parse_expiry;
use ssrmix_core::{ExpiryZone, MergeOptions, merge, merge_with};

fn new_york() {
    static TZ: Once = Once::new();
    TZ.call_once(|| unsafe { std::env::set_var("TZ", "America/New_York") });
}

#[test]
fn winter_expiry_uses_standard_time() {
    new_york();
    // EST, UTC-5
    assert_eq!(
        parse_expiry("过期时间：2020-01-01 00:00:00", ExpiryZone::Local).unwrap(),
        1_577_854_800
    );
}

#[test]
fn summer_expiry_uses_daylight_time() {
    new_york();
    // EDT, UTC-4
    assert_eq!(
        parse_expiry("2020-07-01 00:00:00", ExpiryZone::Local).unwrap(),
        1_593_576_000
    );
}

#[test]
fn skipped_local_time_is_rejected() {
    new_york();
    // clocks jumped from 02:00 to 03:00 on 2020-03-08
    assert!(matches!(
        parse_expiry("2020-03-08 02:30:00", ExpiryZone::Local),
        Err(SsrError::DateParse { .. })
    ));
}

#[test]
fn merge_tuple_matches_merge_with() {
    new_york();
    let input = bulk_with_expiry(
        "50%  10GB",
        "过期时间：2020-01-01 00:00:00",
        &[link("hk", "A-1", "MAYING"), link("jp", "B-2", "MAYING")],
    );
    let ids = allow(&["A", "B"]);
    let table = loads(&[("A", "35%"), ("B", "70%")]);

    let (payload, usage) = merge(&input, &ids, &table, true).unwrap();
    let full = merge_with(&input, &ids, &table, &MergeOptions::local(true)).unwrap();

    assert_eq!(payload, full.payload);
    assert_eq!(usage, full.usage_metadata());
    assert_eq!(
        usage,
        "upload=0; download=10737418240; total=21474836480; expire=1577854800"
    );
    assert_eq!(full.nodes.len(), 2);
    assert_eq!(full.nodes[1].remarks, "B-2 (70%)");
}
