//! Immutable, instant-keyed numeric time series.
//!
//! `TimeSeries` stores two equal-length arrays: keys (encoded instants,
//! strictly ascending) and values.  No method mutates them; every
//! transformation returns a new series.  Storage is reference-counted, so
//! clones, full-range slices, and zone changes share the same buffers.
//!
//! Each series carries the [`InstantCodec`] used to turn instant arguments
//! (`contains`, `value`, `sub_series`) into keys.  Series derived from it
//! keep the same codec.
//!
//! Binary operations come in three flavours:
//!
//! | Form | Keys in result | Example |
//! |------|----------------|---------|
//! | intersection | present in both | [`TimeSeries::add`] |
//! | union | present in either; shared keys combined | [`TimeSeries::union_add`] |
//! | scalar | unchanged | [`TimeSeries::add_scalar`] |

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use pts_core::errors::{Error, Result};
use pts_core::{ensure, Key, Real};
use pts_time::{decode, InstantCodec, Settings, Zone};

use crate::builder::TimeSeriesBuilder;
use crate::iter::SeriesIter;
use crate::merge;
use crate::operators::{BinaryOperator, UnaryOperator};

/// An immutable time series of `f64` values keyed by encoded instants.
///
/// Equality and hashing consider keys and the bit patterns of values only;
/// the zone and codec are metadata and are ignored.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    keys: Arc<[Key]>,
    values: Arc<[Real]>,
    zone: Zone,
    codec: InstantCodec,
}

impl TimeSeries {
    // ── Constructors ─────────────────────────────────────────────────────

    /// Create an empty series.
    pub fn empty(zone: Zone) -> Self {
        Self::from_sorted_slices(&[], &[], zone)
    }

    /// Create a series holding a single entry, in the instant's zone.
    ///
    /// # Errors
    /// Propagates the codec's error for an unencodable instant.
    pub fn single(instant: &DateTime<Zone>, value: Real) -> Result<Self> {
        let key = InstantCodec::default().encode(instant)?;
        Ok(Self::from_sorted_slices(&[key], &[value], instant.timezone()))
    }

    /// Create a series from parallel key and value slices.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the lengths differ or the keys are not
    /// strictly ascending.
    pub fn from_keys(keys: &[Key], values: &[Real], zone: Zone) -> Result<Self> {
        validate(keys, values)?;
        Ok(Self::from_sorted_slices(keys, values, zone))
    }

    /// Create a series from parallel instant and value slices.
    ///
    /// With `zone == None` the series takes the zone of the first instant,
    /// or the default zone when `instants` is empty.
    ///
    /// # Errors
    /// As [`from_keys`](Self::from_keys), plus the codec's error for an
    /// unencodable instant.
    pub fn from_instants(
        instants: &[DateTime<Zone>],
        values: &[Real],
        zone: Option<Zone>,
    ) -> Result<Self> {
        Self::from_instants_with(InstantCodec::default(), instants, values, zone)
    }

    /// [`from_instants`](Self::from_instants) encoding through `codec`,
    /// which the series then keeps for its own instant lookups.
    pub fn from_instants_with(
        codec: InstantCodec,
        instants: &[DateTime<Zone>],
        values: &[Real],
        zone: Option<Zone>,
    ) -> Result<Self> {
        ensure!(
            instants.len() == values.len(),
            "instants and values must have the same length, got {} and {}",
            instants.len(),
            values.len()
        );
        let zone = zone
            .or_else(|| instants.first().map(|t| t.timezone()))
            .unwrap_or_else(|| Settings::instance().default_zone());
        let keys = codec.encode_all(instants)?;
        validate(&keys, values)?;
        Ok(Self::from_parts(&keys, values, zone, codec))
    }

    /// Copy of `other` viewed in `zone`; storage is shared.
    pub fn from_series(other: &TimeSeries, zone: Zone) -> Self {
        other.with_zone(zone)
    }

    /// Start a builder whose series will carry `zone`.
    pub fn builder(zone: Zone) -> TimeSeriesBuilder {
        TimeSeriesBuilder::new(zone)
    }

    /// Copy already-validated slices into a new series.
    fn from_sorted_slices(keys: &[Key], values: &[Real], zone: Zone) -> Self {
        Self::from_parts(keys, values, zone, InstantCodec::default())
    }

    pub(crate) fn from_parts(
        keys: &[Key],
        values: &[Real],
        zone: Zone,
        codec: InstantCodec,
    ) -> Self {
        debug_assert!(validate(keys, values).is_ok());
        Self {
            keys: Arc::from(keys),
            values: Arc::from(values),
            zone,
            codec,
        }
    }

    /// New series in this one's zone and codec.
    fn derive(&self, keys: &[Key], values: &[Real]) -> Self {
        Self::from_parts(keys, values, self.zone, self.codec)
    }

    fn with_values(&self, values: Vec<Real>) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
            values: values.into(),
            zone: self.zone,
            codec: self.codec,
        }
    }

    fn from_merge(&self, (keys, values): (Vec<Key>, Vec<Real>)) -> Self {
        self.derive(&keys, &values)
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Zone used to decode keys.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The same entries viewed in another zone; storage is shared.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self {
            zone,
            ..self.clone()
        }
    }

    /// Codec applied to instant arguments.
    pub fn codec(&self) -> InstantCodec {
        self.codec
    }

    /// The same entries with another codec for instant arguments; storage
    /// is shared.
    pub fn with_codec(&self, codec: InstantCodec) -> Self {
        Self {
            codec,
            ..self.clone()
        }
    }

    /// All keys, ascending.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// All values, in key order.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// All keys decoded in this series' zone.
    pub fn times(&self) -> Vec<DateTime<Zone>> {
        self.keys.iter().map(|&k| decode(k, self.zone)).collect()
    }

    // ── Element access ───────────────────────────────────────────────────

    /// Position of `key`, if present.
    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: Key) -> bool {
        self.index_of(key).is_some()
    }

    /// Whether `instant` is present.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> Result<bool> {
        Ok(self.contains_key(self.codec.encode(instant)?))
    }

    /// Value stored at `key`, or `None` if the key is absent.
    ///
    /// A stored NaN is returned as `Some(NaN)`.
    pub fn value_at(&self, key: Key) -> Option<Real> {
        self.index_of(key).map(|i| self.values[i])
    }

    /// Value stored at `instant`, or `None` if absent.
    pub fn value<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> Result<Option<Real>> {
        Ok(self.value_at(self.codec.encode(instant)?))
    }

    /// Key at position `index`.
    pub fn key_at_index(&self, index: usize) -> Result<Key> {
        self.keys
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                size: self.len(),
            })
    }

    /// Instant at position `index`.
    pub fn time_at_index(&self, index: usize) -> Result<DateTime<Zone>> {
        Ok(decode(self.key_at_index(index)?, self.zone))
    }

    /// Value at position `index`.
    pub fn value_at_index(&self, index: usize) -> Result<Real> {
        self.values
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                size: self.len(),
            })
    }

    /// Earliest key.
    ///
    /// # Errors
    /// [`Error::EmptySeries`] if the series is empty.
    pub fn earliest_key(&self) -> Result<Key> {
        self.keys.first().copied().ok_or(Error::EmptySeries("earliest_key"))
    }

    /// Earliest instant.
    pub fn earliest_time(&self) -> Result<DateTime<Zone>> {
        Ok(decode(self.earliest_key()?, self.zone))
    }

    /// Value at the earliest key.
    pub fn earliest_value(&self) -> Result<Real> {
        self.values
            .first()
            .copied()
            .ok_or(Error::EmptySeries("earliest_value"))
    }

    /// Latest key.
    ///
    /// # Errors
    /// [`Error::EmptySeries`] if the series is empty.
    pub fn latest_key(&self) -> Result<Key> {
        self.keys.last().copied().ok_or(Error::EmptySeries("latest_key"))
    }

    /// Latest instant.
    pub fn latest_time(&self) -> Result<DateTime<Zone>> {
        Ok(decode(self.latest_key()?, self.zone))
    }

    /// Value at the latest key.
    pub fn latest_value(&self) -> Result<Real> {
        self.values
            .last()
            .copied()
            .ok_or(Error::EmptySeries("latest_value"))
    }

    /// Smallest value (NaN if any value is NaN).
    ///
    /// # Errors
    /// [`Error::EmptySeries`] if the series is empty.
    pub fn min_value(&self) -> Result<Real> {
        self.fold_values(BinaryOperator::Minimum, "min_value")
    }

    /// Largest value (NaN if any value is NaN).
    ///
    /// # Errors
    /// [`Error::EmptySeries`] if the series is empty.
    pub fn max_value(&self) -> Result<Real> {
        self.fold_values(BinaryOperator::Maximum, "max_value")
    }

    fn fold_values(&self, op: BinaryOperator, name: &'static str) -> Result<Real> {
        let (&first, rest) = self.values.split_first().ok_or(Error::EmptySeries(name))?;
        Ok(rest.iter().fold(first, |acc, &v| op.apply(acc, v)))
    }

    // ── Iteration ────────────────────────────────────────────────────────

    /// Read-only cursor over the entries.
    pub fn iter(&self) -> SeriesIter<'_> {
        SeriesIter::new(&self.keys, &self.values, self.zone)
    }

    /// A builder pre-populated with this series.
    pub fn to_builder(&self) -> TimeSeriesBuilder {
        let mut builder =
            TimeSeriesBuilder::with_capacity(self.zone, self.len()).with_codec(self.codec);
        builder.put_all_series(self);
        builder
    }

    // ── Slicing ──────────────────────────────────────────────────────────

    fn slice(&self, start: usize, end: usize) -> Self {
        if start == 0 && end == self.len() {
            return self.clone();
        }
        self.derive(&self.keys[start..end], &self.values[start..end])
    }

    /// Entries whose keys lie between `start_key` and `end_key`.
    ///
    /// Each bound is inclusive or exclusive as requested.  When the bounds
    /// are equal the result holds that single entry if both are inclusive
    /// and the key exists, and is empty otherwise.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `end_key < start_key`.
    pub fn sub_series_fast(
        &self,
        start_key: Key,
        include_start: bool,
        end_key: Key,
        include_end: bool,
    ) -> Result<Self> {
        ensure!(
            start_key <= end_key,
            "sub-series end ({end_key}) is before start ({start_key})"
        );
        if start_key == end_key {
            return Ok(match self.index_of(start_key) {
                Some(i) if include_start && include_end => self.slice(i, i + 1),
                _ => self.derive(&[], &[]),
            });
        }
        let start = match self.keys.binary_search(&start_key) {
            Ok(i) if !include_start => i + 1,
            Ok(i) | Err(i) => i,
        };
        let end = match self.keys.binary_search(&end_key) {
            Ok(i) if include_end => i + 1,
            Ok(i) | Err(i) => i,
        };
        Ok(self.slice(start, end))
    }

    /// Entries whose instants lie between `start` and `end`.
    ///
    /// # Errors
    /// As [`sub_series_fast`](Self::sub_series_fast), plus the codec's
    /// error for an unencodable bound.
    pub fn sub_series<Tz: TimeZone>(
        &self,
        start: &DateTime<Tz>,
        include_start: bool,
        end: &DateTime<Tz>,
        include_end: bool,
    ) -> Result<Self> {
        let (start, end) = (self.codec.encode(start)?, self.codec.encode(end)?);
        self.sub_series_fast(start, include_start, end, include_end)
    }

    /// Entries in `[start, end)`.
    pub fn sub_series_half_open<Tz: TimeZone>(
        &self,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Result<Self> {
        self.sub_series(start, true, end, false)
    }

    /// The first `n` entries (all of them if `n >= len`).
    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n.min(self.len()))
    }

    /// The last `n` entries (all of them if `n >= len`).
    pub fn tail(&self, n: usize) -> Self {
        let len = self.len();
        self.slice(len - n.min(len), len)
    }

    /// Re-pair keys with values `shift` positions away.
    ///
    /// With `shift > 0` each key takes the value `shift` entries earlier,
    /// so the first `shift` keys and last `shift` values drop out; a
    /// negative shift pairs keys with later values.  `|shift| >= len`
    /// yields an empty series.
    ///
    /// ```
    /// use pts_series::TimeSeries;
    ///
    /// let ts = TimeSeries::from_keys(&[1, 2, 3, 4], &[10.0, 20.0, 30.0, 40.0], chrono_tz::UTC)?;
    /// let lagged = ts.lag(1);
    /// assert_eq!(lagged.keys(), &[2, 3, 4]);
    /// assert_eq!(lagged.values(), &[10.0, 20.0, 30.0]);
    /// # Ok::<(), pts_core::Error>(())
    /// ```
    pub fn lag(&self, shift: isize) -> Self {
        let len = self.len();
        let k = shift.unsigned_abs();
        if shift == 0 {
            return self.clone();
        }
        if k >= len {
            return self.derive(&[], &[]);
        }
        let (keys, values) = if shift > 0 {
            (&self.keys[k..], &self.values[..len - k])
        } else {
            (&self.keys[..len - k], &self.values[k..])
        };
        self.derive(keys, values)
    }

    // ── Generic operators ────────────────────────────────────────────────

    /// Apply `op` to every value; keys are shared with `self`.
    pub fn operate_unary<F: FnMut(Real) -> Real>(&self, op: F) -> Self {
        self.with_values(self.values.iter().copied().map(op).collect())
    }

    /// Apply `op(value, operand)` to every value.
    pub fn operate_scalar<F: FnMut(Real, Real) -> Real>(&self, operand: Real, mut op: F) -> Self {
        self.operate_unary(|v| op(v, operand))
    }

    /// Intersection merge: keys present in both series, valued
    /// `op(self_value, other_value)`.  The result keeps `self`'s zone.
    pub fn operate<F: FnMut(Real, Real) -> Real>(&self, other: &TimeSeries, op: F) -> Self {
        let merged = merge::intersect(&self.keys, &self.values, &other.keys, &other.values, op);
        self.from_merge(merged)
    }

    /// Union merge: keys present in either series.  One-sided entries keep
    /// their value; shared keys are valued `op(self_value, other_value)`.
    pub fn union_operate<F: FnMut(Real, Real) -> Real>(&self, other: &TimeSeries, op: F) -> Self {
        let merged =
            merge::union_infallible(&self.keys, &self.values, &other.keys, &other.values, op);
        self.from_merge(merged)
    }

    /// [`operate_unary`](Self::operate_unary) with a predefined operator.
    pub fn apply_unary(&self, op: UnaryOperator) -> Self {
        self.operate_unary(|v| op.apply(v))
    }

    /// [`operate_scalar`](Self::operate_scalar) with a predefined operator.
    pub fn apply_scalar(&self, operand: Real, op: BinaryOperator) -> Self {
        self.operate_scalar(operand, |a, b| op.apply(a, b))
    }

    /// [`operate`](Self::operate) with a predefined operator.
    pub fn apply(&self, other: &TimeSeries, op: BinaryOperator) -> Self {
        self.operate(other, |a, b| op.apply(a, b))
    }

    /// [`union_operate`](Self::union_operate) with a predefined operator.
    pub fn union_apply(&self, other: &TimeSeries, op: BinaryOperator) -> Self {
        self.union_operate(other, |a, b| op.apply(a, b))
    }

    // ── Tie-break merges ─────────────────────────────────────────────────

    /// Shared keys only, keeping this series' values.
    pub fn intersection_first_value(&self, other: &TimeSeries) -> Self {
        self.apply(other, BinaryOperator::FirstValue)
    }

    /// Shared keys only, keeping the other series' values.
    pub fn intersection_second_value(&self, other: &TimeSeries) -> Self {
        self.apply(other, BinaryOperator::SecondValue)
    }

    /// Union of two series that must not share any key.
    ///
    /// # Errors
    /// [`Error::IllegalState`] naming the first key present in both.
    pub fn no_intersection_operation(&self, other: &TimeSeries) -> Result<Self> {
        let merged = merge::union(
            &self.keys,
            &self.values,
            &other.keys,
            &other.values,
            |key, _, _| {
                Err(Error::IllegalState(format!(
                    "both series hold a value at key {key}"
                )))
            },
        )?;
        Ok(self.from_merge(merged))
    }

    // ── Unary operators ──────────────────────────────────────────────────

    /// Negate every value.
    pub fn negate(&self) -> Self {
        self.apply_unary(UnaryOperator::Negate)
    }

    /// `1 / value` for every value.
    pub fn reciprocal(&self) -> Self {
        self.apply_unary(UnaryOperator::Reciprocal)
    }

    /// Natural logarithm of every value.
    pub fn log(&self) -> Self {
        self.apply_unary(UnaryOperator::Log)
    }

    /// Base-10 logarithm of every value.
    pub fn log10(&self) -> Self {
        self.apply_unary(UnaryOperator::Log10)
    }

    /// Absolute value of every value.
    pub fn abs(&self) -> Self {
        self.apply_unary(UnaryOperator::Abs)
    }
}

/// Named wrappers for each binary operator: intersection, scalar, union.
macro_rules! binary_operations {
    ($($op:ident => $intersect:ident, $scalar:ident, $union:ident;)*) => {
        impl TimeSeries {
            $(
                #[doc = concat!("`", stringify!($op), "` over the keys present in both series.")]
                pub fn $intersect(&self, other: &TimeSeries) -> Self {
                    self.apply(other, BinaryOperator::$op)
                }

                #[doc = concat!("`", stringify!($op), "` of every value with `operand`.")]
                pub fn $scalar(&self, operand: Real) -> Self {
                    self.apply_scalar(operand, BinaryOperator::$op)
                }

                #[doc = concat!(
                    "`", stringify!($op),
                    "` over the union of keys; one-sided entries are kept as is."
                )]
                pub fn $union(&self, other: &TimeSeries) -> Self {
                    self.union_apply(other, BinaryOperator::$op)
                }
            )*
        }
    };
}

binary_operations! {
    Add => add, add_scalar, union_add;
    Subtract => subtract, subtract_scalar, union_subtract;
    Multiply => multiply, multiply_scalar, union_multiply;
    Divide => divide, divide_scalar, union_divide;
    Power => power, power_scalar, union_power;
    Minimum => minimum, minimum_scalar, union_minimum;
    Maximum => maximum, maximum_scalar, union_maximum;
    Average => average, average_scalar, union_average;
}

/// `&a + &b` and friends use intersection semantics.
macro_rules! std_ops {
    ($($trait:ident :: $method:ident => $op:ident;)*) => {
        $(
            impl std::ops::$trait<&TimeSeries> for &TimeSeries {
                type Output = TimeSeries;

                fn $method(self, rhs: &TimeSeries) -> TimeSeries {
                    self.apply(rhs, BinaryOperator::$op)
                }
            }
        )*
    };
}

std_ops! {
    Add::add => Add;
    Sub::sub => Subtract;
    Mul::mul => Multiply;
    Div::div => Divide;
}

impl std::ops::Neg for &TimeSeries {
    type Output = TimeSeries;

    fn neg(self) -> TimeSeries {
        self.negate()
    }
}

fn validate(keys: &[Key], values: &[Real]) -> Result<()> {
    ensure!(
        keys.len() == values.len(),
        "keys and values must have the same length, got {} and {}",
        keys.len(),
        values.len()
    );
    if let Some(i) = keys.windows(2).position(|w| w[0] >= w[1]) {
        return Err(Error::InvalidArgument(format!(
            "keys must be strictly ascending: key {} at index {i} is not before {}",
            keys[i],
            keys[i + 1]
        )));
    }
    Ok(())
}

impl Default for TimeSeries {
    /// Empty series in the default zone from [`Settings`].
    fn default() -> Self {
        Self::empty(Settings::instance().default_zone())
    }
}

impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        let same_keys = Arc::ptr_eq(&self.keys, &other.keys) || self.keys == other.keys;
        same_keys
            && (Arc::ptr_eq(&self.values, &other.values)
                || self
                    .values
                    .iter()
                    .map(|v| v.to_bits())
                    .eq(other.values.iter().map(|v| v.to_bits())))
    }
}

impl Eq for TimeSeries {}

impl Hash for TimeSeries {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keys.hash(state);
        for v in self.values.iter() {
            v.to_bits().hash(state);
        }
    }
}

impl FromIterator<(Key, Real)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Key, Real)>>(iter: I) -> Self {
        iter.into_iter().collect::<TimeSeriesBuilder>().build()
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = (Key, Real);
    type IntoIter = SeriesIter<'a>;

    fn into_iter(self) -> SeriesIter<'a> {
        self.iter()
    }
}

impl fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TimeSeries[")?;
        for (i, (&k, v)) in self.keys.iter().zip(self.values.iter()).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {v:?})", decode(k, self.zone).to_rfc3339())?;
        }
        f.write_str("]")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
