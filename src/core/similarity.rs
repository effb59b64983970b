/// Levenshtein edit distance between two strings, counted in chars
///
/// Uses a single rolling row, so memory is O(min(len_a, len_b)).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Keep the shorter string on the row axis
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(lc != sc);
            let insertion = row[j] + 1;
            let deletion = row[j + 1] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(insertion).min(deletion);
        }
    }

    row[short.len()]
}

/// Similarity ratio in `[0, 1]`: `1 - distance / max_len`
///
/// Two empty strings are identical and score `1.0`.
#[inline]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - distance as f64 / max_len as f64
}
