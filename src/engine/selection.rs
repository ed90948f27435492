/// Pick the next roster index whose word is still incorrect.
///
/// Scans forward from `current + 1`, then wraps to `0..current`, and finally
/// falls back to the first incorrect index (only reachable when `current` is
/// the sole remaining one). Returns `None` when everything is correct.
pub fn next_incorrect_index(correct: &[bool], current: usize) -> Option<usize> {
    let first_incorrect = correct.iter().position(|&c| !c)?;

    let start = current.saturating_add(1).min(correct.len());
    let forward = correct[start..]
        .iter()
        .position(|&c| !c)
        .map(|offset| start + offset);
    if forward.is_some() {
        return forward;
    }

    let end = current.min(correct.len());
    let wrapped = correct[..end].iter().position(|&c| !c);
    if wrapped.is_some() {
        return wrapped;
    }

    Some(first_incorrect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_correct_yields_none() {
        assert_eq!(next_incorrect_index(&[true, true, true], 1), None);
        assert_eq!(next_incorrect_index(&[], 0), None);
    }

    #[test]
    fn scans_forward_first() {
        assert_eq!(next_incorrect_index(&[false, false, false], 0), Some(1));
        assert_eq!(next_incorrect_index(&[false, true, false], 0), Some(2));
    }

    #[test]
    fn wraps_past_the_end() {
        // A correct, B incorrect, C just missed at index 2 -> back to B.
        assert_eq!(next_incorrect_index(&[true, false, false], 2), Some(1));
    }

    #[test]
    fn sole_remaining_is_repeated() {
        assert_eq!(next_incorrect_index(&[true, false, true], 1), Some(1));
    }

    #[test]
    fn out_of_range_current_still_finds_a_word() {
        assert_eq!(next_incorrect_index(&[true, false], 7), Some(1));
    }
}
