/// Best alignment similarity (0–100) of the shorter string against every
/// same-length window of the longer one, plus the partial windows that
/// overhang either end.
///
/// Each alignment is scored with the normalized Indel similarity
/// `2·LCS / (len_a + len_b) · 100`. Returns 0 when either string is empty.
pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let (m, n) = (short.len(), long.len());

    let mut best = 0.0f64;
    for start in 0..=(n - m) {
        best = best.max(indel_ratio(short, &long[start..start + m]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    for k in 1..m {
        best = best
            .max(indel_ratio(short, &long[..k]))
            .max(indel_ratio(short, &long[n - k..]));
    }
    best
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Longest common subsequence length using the two-row O(min(m,n)) space
/// algorithm.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (a, b) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; a.len() + 1];
    let mut curr = vec![0usize; a.len() + 1];

    for cb in b {
        for (i, ca) in a.iter().enumerate() {
            curr[i + 1] = if ca == cb {
                prev[i] + 1
            } else {
                prev[i + 1].max(curr[i])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}
