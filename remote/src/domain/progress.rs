//! Progress Arithmetic
//!
//! Both levels round half away from zero (`floor(x + 0.5)` for the
//! non-negative values used here), computed on integers so 62.5 is always 63.

/// round(100 * completed / total), or 0 when there is nothing to complete
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// round(mean(values)), or 0 for an empty input
pub fn mean_percent<I>(values: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as u8
}
