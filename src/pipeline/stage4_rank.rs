/// Percentile rank in [0, 100] for each value, rounded half to even.
///
/// Tied values share the mean of the ranks they span, so the top value
/// always maps to 100 and a fully tied column maps to `round(100 * (n+1) / 2n)`.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order = (0..n).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    let mut ranks = vec![0.0f64; n];
    let mut i = 0usize;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // 1-based ranks i+1 ..= j+1
        let avg = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }

    ranks
        .into_iter()
        .map(|r| (100.0 * r / n as f64).round_ties_even())
        .collect()
}

pub fn run_stage4(index: &[f64]) -> Vec<f64> {
    percentile_ranks(index)
}
