/// Indices of the `n` lowest-ranked rows, in ascending rank order.
///
/// The sort is stable, so rows sharing a rank keep their file order. With
/// fewer than `n` rows every row is returned.
pub fn top_n_by_rank(ranks: &[u64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by_key(|&i| ranks[i]);
    order.truncate(n);
    order
}

/// Sort `(label, time)` pairs by ascending time, keeping equal times in their
/// existing order.
pub fn sort_by_time(pairs: &mut [(String, f64)]) {
    pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
}
