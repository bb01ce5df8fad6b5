use strsim::normalized_levenshtein;

/// Partial-ratio similarity in [0, 100].
///
/// Tolerant of substring containment: the shorter string is slid across
/// equal-length windows of the longer one and the best window similarity
/// wins. Ties between windows resolve to the earliest window, so the score
/// is deterministic for a given pair of inputs.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();

    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = normalized_levenshtein(short, &window) * 100.0;
        if score > best {
            best = score;
        }
        if (best - 100.0).abs() < f64::EPSILON {
            break;
        }
    }

    best
}
