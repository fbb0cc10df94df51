//! Builder and builder-cursor behaviour: ordering, overwrite, bulk inserts,
//! slice bounds, and removal through the cursor.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone, Utc};
use pts_core::Error;
use pts_series::{EntryIterator, TimeSeries, TimeSeriesBuilder};
use pts_time::{InstantCodec, Zone, MAX_KEY, MIN_KEY};

const UTC: Zone = chrono_tz::UTC;

fn at(seconds: i64) -> DateTime<Zone> {
    DateTime::from_timestamp(seconds, 0)
        .unwrap()
        .with_timezone(&UTC)
}

fn key(seconds: i64) -> i64 {
    seconds * 1_000_000_000
}

fn series(seconds: &[i64], values: &[f64]) -> TimeSeries {
    let keys: Vec<i64> = seconds.iter().map(|&s| key(s)).collect();
    TimeSeries::from_keys(&keys, values, UTC).unwrap()
}

fn source() -> TimeSeries {
    series(&[1111, 2222, 3333], &[1.0, 2.0, 3.0])
}

// ─── put ──────────────────────────────────────────────────────────────────────

#[test]
fn nothing_added_builds_empty_series() {
    let builder = TimeSeries::builder(UTC);
    assert_eq!(builder.build(), TimeSeries::empty(UTC));
}

#[test]
fn put_instants_out_of_order() {
    let mut builder = TimeSeries::builder(UTC);
    builder
        .put_instant(&at(2222), 2.0)
        .unwrap()
        .put_instant(&at(3333), 3.0)
        .unwrap()
        .put_instant(&at(1111), 1.0)
        .unwrap();
    assert_eq!(builder.build(), series(&[1111, 2222, 3333], &[1.0, 2.0, 3.0]));
}

#[test]
fn put_overwrites_existing_key() {
    let mut builder = TimeSeries::builder(UTC);
    builder
        .put(key(2222), 2.0)
        .put(key(3333), 3.0)
        .put(key(2222), 1.0);
    assert_eq!(builder.build(), series(&[2222, 3333], &[1.0, 3.0]));
}

#[test]
fn put_instant_in_other_zone_hits_same_key() {
    let mut builder = TimeSeries::builder(UTC);
    let tokyo = at(2222).with_timezone(&chrono_tz::Asia::Tokyo);
    builder.put(key(2222), 2.0);
    builder.put_instant(&tokyo, 5.0).unwrap();
    assert_eq!(builder.len(), 1);
    assert_eq!(builder.values(), &[5.0]);
}

#[test]
fn put_many_grows_past_initial_capacity() {
    let mut builder = TimeSeries::builder(UTC);
    let keys: Vec<i64> = (0..600).map(|i| key(2222) + i).collect();
    let values: Vec<f64> = (0..600).map(|i| i as f64).collect();
    for (&k, &v) in keys.iter().zip(&values) {
        builder.put(k, v);
    }
    assert!(builder.capacity() >= 600);
    assert_eq!(builder.build(), TimeSeries::from_keys(&keys, &values, UTC).unwrap());
}

#[test]
fn configured_codec_applies_to_every_instant_put() {
    let codec = InstantCodec::with_year_bounds(1900, 2200).unwrap();
    let far = Utc.with_ymd_and_hms(2250, 6, 1, 0, 0, 0).unwrap();
    let early = Utc.with_ymd_and_hms(1850, 6, 1, 0, 0, 0).unwrap();

    let mut builder = TimeSeries::builder(UTC).with_codec(codec);
    builder.put_instant(&far, 1.0).unwrap();
    builder.put_all_instants(&[early], &[0.5]).unwrap();
    let mut map = BTreeMap::new();
    map.insert(at(2222), 2.0);
    builder.put_all_map(&map).unwrap();
    assert_eq!(builder.keys(), &[MIN_KEY, key(2222), MAX_KEY]);

    let built = builder.build();
    assert_eq!(built.codec(), codec);
    assert_eq!(built.value(&far).unwrap(), Some(1.0));
    assert_eq!(built.to_builder().codec(), codec);

    // The default codec keeps the same instant exact, so it misses the sentinel.
    assert_eq!(built.with_codec(InstantCodec::default()).value(&far).unwrap(), None);
}

// ─── put_all ──────────────────────────────────────────────────────────────────

#[test]
fn put_all_instants() {
    let mut builder = TimeSeries::builder(UTC);
    builder
        .put_all_instants(&[at(2222), at(3333), at(1111)], &[2.0, 3.0, 1.0])
        .unwrap();
    assert_eq!(builder.build(), source());
}

#[test]
fn put_all_rejects_mismatched_lengths_without_mutating() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put(key(0), 0.5);
    let err = builder
        .put_all_instants(&[at(2222), at(3333), at(1111)], &[2.0, 3.0])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(matches!(
        builder.put_all(&[1, 2], &[1.0]),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(builder.keys(), &[key(0)]);
}

#[test]
fn put_all_keys_later_duplicates_win() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put_all(&[3, 1, 3], &[3.0, 1.0, 30.0]).unwrap();
    assert_eq!(builder.keys(), &[1, 3]);
    assert_eq!(builder.values(), &[1.0, 30.0]);
}

#[test]
fn put_all_series() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put_all_series(&source());
    assert_eq!(builder.build(), source());
}

#[test]
fn put_all_series_range_into_non_empty_builder() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put(key(0), 0.5);
    builder.put_all_series_range(&source(), 0, 3).unwrap();
    assert_eq!(
        builder.build(),
        series(&[0, 1111, 2222, 3333], &[0.5, 1.0, 2.0, 3.0])
    );
}

#[test]
fn put_all_series_range_partial() {
    let mut from_start = TimeSeries::builder(UTC);
    from_start.put_all_series_range(&source(), 0, 1).unwrap();
    assert_eq!(from_start.build(), series(&[1111], &[1.0]));

    let mut to_end = TimeSeries::builder(UTC);
    to_end.put_all_series_range(&source(), 1, 3).unwrap();
    assert_eq!(to_end.build(), series(&[2222, 3333], &[2.0, 3.0]));

    let mut empty_range = TimeSeries::builder(UTC);
    empty_range.put(key(0), 0.5);
    empty_range.put_all_series_range(&source(), 1, 1).unwrap();
    assert_eq!(empty_range.build(), series(&[0], &[0.5]));
}

#[test]
fn put_all_series_range_reports_violated_bound() {
    let mut builder = TimeSeries::builder(UTC);
    assert_eq!(
        builder.put_all_series_range(&source(), 4, 2).unwrap_err(),
        Error::SliceOutOfRange {
            bound: "start",
            index: 4,
            size: 3
        }
    );
    assert_eq!(
        builder.put_all_series_range(&source(), 3, 4).unwrap_err(),
        Error::SliceOutOfRange {
            bound: "end",
            index: 4,
            size: 3
        }
    );
    assert_eq!(
        builder.put_all_series_range(&source(), 3, 2).unwrap_err(),
        Error::InvertedSlice { start: 3, end: 2 }
    );
    assert!(builder.is_empty());
}

#[test]
fn put_all_map() {
    let mut map = HashMap::new();
    map.insert(at(2222), 2.0);
    map.insert(at(3333), 3.0);
    map.insert(at(1111), 1.0);
    let mut builder = TimeSeries::builder(UTC);
    builder.put_all_map(&map).unwrap();
    assert_eq!(builder.build(), source());
}

#[test]
fn put_all_map_empty_and_owned() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put(key(0), 0.5);
    builder
        .put_all_map(BTreeMap::<DateTime<Utc>, f64>::new())
        .unwrap();
    assert_eq!(builder.build(), series(&[0], &[0.5]));
}

// ─── clear / build ────────────────────────────────────────────────────────────

#[test]
fn clear_resets_to_empty() {
    let mut builder = TimeSeries::builder(UTC);
    builder.clear();
    assert_eq!(builder.build(), TimeSeries::empty(UTC));

    builder.put(key(2222), 1.0).clear();
    assert_eq!(builder.build(), TimeSeries::empty(UTC));
}

#[test]
fn build_is_idempotent_and_detached() {
    let mut builder = TimeSeries::builder(UTC);
    builder.put(key(1111), 1.0).put(key(2222), 2.0);
    let first = builder.build();
    let second = builder.build();
    assert_eq!(first, second);

    builder.put(key(1111), 99.0);
    assert_eq!(first.values(), &[1.0, 2.0]);
    assert_eq!(builder.build().values(), &[99.0, 2.0]);
}

#[test]
fn to_builder_round_trip() {
    let original = source();
    let mut builder = original.to_builder();
    builder.put(key(4444), 4.0);
    assert_eq!(original.len(), 3);
    assert_eq!(builder.build().len(), 4);
    assert_eq!(builder.zone(), original.zone());
}

#[test]
fn builder_to_string() {
    let mut builder = TimeSeriesBuilder::new(UTC);
    assert_eq!(builder.put(key(2222), 1.0).to_string(), "Builder[size=1]");
}

// ─── Cursor ───────────────────────────────────────────────────────────────────

fn three_entries() -> TimeSeriesBuilder {
    let mut builder = TimeSeries::builder(UTC);
    builder
        .put(key(2222), 2.0)
        .put(key(3333), 3.0)
        .put(key(1111), 1.0);
    builder
}

#[test]
fn builder_cursor_walks_in_key_order() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    assert!(it.has_next());
    assert_eq!(it.next_entry().unwrap(), (at(1111), 1.0));
    assert_eq!(it.current_time().unwrap(), at(1111));
    assert_eq!(it.current_key().unwrap(), key(1111));
    assert_eq!(it.current_value().unwrap(), 1.0);
    assert_eq!(it.next_time().unwrap(), at(2222));
    assert_eq!(it.next_time().unwrap(), at(3333));
    assert!(!it.has_next());
    assert_eq!(it.next_key(), Err(Error::NoMoreElements));
}

#[test]
fn builder_cursor_on_empty_builder() {
    let mut builder = TimeSeries::builder(UTC);
    let it = builder.iter_mut();
    assert!(!it.has_next());
    assert!(matches!(it.current_value(), Err(Error::IllegalState(_))));
}

#[test]
fn remove_first() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    it.next_key().unwrap();
    it.remove().unwrap();
    assert_eq!(it.next_key().unwrap(), key(2222));
    assert_eq!(builder.len(), 2);
    assert_eq!(builder.build(), series(&[2222, 3333], &[2.0, 3.0]));
}

#[test]
fn remove_mid() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    it.next_key().unwrap();
    it.next_key().unwrap();
    it.remove().unwrap();
    assert_eq!(it.next_key().unwrap(), key(3333));
    assert_eq!(builder.build(), series(&[1111, 3333], &[1.0, 3.0]));
}

#[test]
fn remove_last() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    for _ in 0..3 {
        it.next_key().unwrap();
    }
    it.remove().unwrap();
    assert!(!it.has_next());
    assert_eq!(builder.build(), series(&[1111, 2222], &[1.0, 2.0]));
}

#[test]
fn remove_requires_a_current_entry() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    assert!(matches!(it.remove(), Err(Error::IllegalState(_))));
    it.next_key().unwrap();
    it.remove().unwrap();
    assert!(matches!(it.remove(), Err(Error::IllegalState(_))));
    assert!(matches!(it.current_key(), Err(Error::IllegalState(_))));
}

#[test]
fn remove_every_entry() {
    let mut builder = three_entries();
    let mut it = builder.iter_mut();
    while it.has_next() {
        it.next_key().unwrap();
        it.remove().unwrap();
    }
    assert!(builder.is_empty());
}
