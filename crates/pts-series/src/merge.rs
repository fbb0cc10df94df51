//! Linear merge kernels over two strictly ascending key arrays.
//!
//! Both kernels walk the inputs once with a cursor per side, so they run in
//! `O(n + m)` and never hash or sort.  Output buffers are sized once to the
//! worst case and truncated to the emitted count.

use std::cmp::Ordering;
use std::convert::Infallible;

use pts_core::{Key, Real};
use tracing::trace;

/// Keys present in both inputs, with `op(a, b)` as the value.
pub fn intersect<F>(
    a_keys: &[Key],
    a_values: &[Real],
    b_keys: &[Key],
    b_values: &[Real],
    mut op: F,
) -> (Vec<Key>, Vec<Real>)
where
    F: FnMut(Real, Real) -> Real,
{
    debug_assert_eq!(a_keys.len(), a_values.len());
    debug_assert_eq!(b_keys.len(), b_values.len());

    let (n, m) = (a_keys.len(), b_keys.len());
    let worst = n.min(m);
    let mut keys = vec![0; worst];
    let mut values = vec![0.0; worst];
    let (mut i, mut j, mut count) = (0, 0, 0);

    while i < n && j < m {
        match a_keys[i].cmp(&b_keys[j]) {
            Ordering::Equal => {
                keys[count] = a_keys[i];
                values[count] = op(a_values[i], b_values[j]);
                count += 1;
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }

    keys.truncate(count);
    values.truncate(count);
    trace!(left = n, right = m, emitted = count, "intersection merge");
    (keys, values)
}

/// Keys present in either input.
///
/// Entries found on one side only are copied unchanged; shared keys are
/// passed to `combine(key, a, b)`, whose error aborts the merge.
pub fn union<F, E>(
    a_keys: &[Key],
    a_values: &[Real],
    b_keys: &[Key],
    b_values: &[Real],
    mut combine: F,
) -> Result<(Vec<Key>, Vec<Real>), E>
where
    F: FnMut(Key, Real, Real) -> Result<Real, E>,
{
    debug_assert_eq!(a_keys.len(), a_values.len());
    debug_assert_eq!(b_keys.len(), b_values.len());

    let (n, m) = (a_keys.len(), b_keys.len());
    let mut keys = vec![0; n + m];
    let mut values = vec![0.0; n + m];
    let (mut i, mut j, mut count) = (0, 0, 0);

    while i < n && j < m {
        let (ka, kb) = (a_keys[i], b_keys[j]);
        match ka.cmp(&kb) {
            Ordering::Equal => {
                keys[count] = ka;
                values[count] = combine(ka, a_values[i], b_values[j])?;
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                keys[count] = ka;
                values[count] = a_values[i];
                i += 1;
            }
            Ordering::Greater => {
                keys[count] = kb;
                values[count] = b_values[j];
                j += 1;
            }
        }
        count += 1;
    }

    // At most one side still has entries.
    for (rest_keys, rest_values) in [
        (&a_keys[i..], &a_values[i..]),
        (&b_keys[j..], &b_values[j..]),
    ] {
        let end = count + rest_keys.len();
        keys[count..end].copy_from_slice(rest_keys);
        values[count..end].copy_from_slice(rest_values);
        count = end;
    }

    keys.truncate(count);
    values.truncate(count);
    trace!(left = n, right = m, emitted = count, "union merge");
    Ok((keys, values))
}

/// Union merge with a combiner that cannot fail.
pub fn union_infallible<F>(
    a_keys: &[Key],
    a_values: &[Real],
    b_keys: &[Key],
    b_values: &[Real],
    mut op: F,
) -> (Vec<Key>, Vec<Real>)
where
    F: FnMut(Real, Real) -> Real,
{
    let merged = union(a_keys, a_values, b_keys, b_values, |_, a, b| {
        Ok::<_, Infallible>(op(a, b))
    });
    match merged {
        Ok(out) => out,
        Err(never) => match never {},
    }
}
