//! Linear-interpolation resampling used to seed EB-DBA.

/// Resample `values` to `len` points by linear interpolation.
///
/// Output index `i` reads position `i * (values.len() / len)` of the input and
/// interpolates between its floor and its ceiling, the ceiling clamped to the
/// last input index. The first output equals the first input; the tail is
/// held flat when upsampling past the last input point.
///
/// `values` must be non-empty and `len` must be positive.
pub(crate) fn resample_linear(values: &[f64], len: usize) -> Vec<f64> {
    debug_assert!(!values.is_empty());
    debug_assert!(len > 0);

    let last = values.len() - 1;
    let factor = values.len() as f64 / len as f64;

    (0..len)
        .map(|i| {
            let index = i as f64 * factor;
            let floor = (index.floor() as usize).min(last);
            let ceil = (index.ceil() as usize).min(last);
            let weight = index - index.floor();
            values[floor] + (values[ceil] - values[floor]) * weight
        })
        .collect()
}

/// Resample a time-major multivariate buffer of `dim` channels to `len` steps.
///
/// Each channel is interpolated independently with [`resample_linear`]'s rule.
pub(crate) fn resample_columns(data: &[f64], dim: usize, len: usize) -> Vec<f64> {
    debug_assert!(dim > 0 && data.len() % dim == 0);

    let steps = data.len() / dim;
    let last = steps - 1;
    let factor = steps as f64 / len as f64;

    let mut out = Vec::with_capacity(len * dim);
    for i in 0..len {
        let index = i as f64 * factor;
        let floor = (index.floor() as usize).min(last);
        let ceil = (index.ceil() as usize).min(last);
        let weight = index - index.floor();
        for f in 0..dim {
            let lo = data[floor * dim + f];
            let hi = data[ceil * dim + f];
            out.push(lo + (hi - lo) * weight);
        }
    }
    out
}
