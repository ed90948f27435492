use crate::words::WordItem;

const COMPOUND_SEPARATOR: &str = " - ";

/// Split a three-part `source` ("word - form - form") into the bare word and
/// move the two grammatical forms in front of the target.
pub fn split_compound_source(word: WordItem) -> WordItem {
    let parts: Vec<&str> = word.source.split(COMPOUND_SEPARATOR).map(str::trim).collect();
    if parts.len() != 3 {
        return word;
    }
    let target = format!("{} - {} / {}", parts[1], parts[2], word.target);
    let source = parts[0].to_string();
    WordItem {
        source,
        target,
        ..word
    }
}

/// Reassign ids 1..=N in list order.
pub fn renumber(words: &mut [WordItem]) {
    for (index, word) in words.iter_mut().enumerate() {
        word.id = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_part_source_is_folded_into_target() {
        let word = WordItem::new(7, "gehen - ging - gegangen", "to go");
        let split = split_compound_source(word);
        assert_eq!(split.source, "gehen");
        assert_eq!(split.target, "ging - gegangen / to go");
        assert_eq!(split.id, 7);
    }

    #[test]
    fn parts_are_trimmed() {
        let word = WordItem::new(1, "sein  -  war -  gewesen ", "to be");
        let split = split_compound_source(word);
        assert_eq!(split.source, "sein");
        assert_eq!(split.target, "war - gewesen / to be");
    }

    #[test]
    fn two_or_four_parts_are_left_alone() {
        let two = WordItem::new(1, "der Hund - die Hunde", "dog");
        assert_eq!(split_compound_source(two.clone()), two);

        let four = WordItem::new(2, "a - b - c - d", "x");
        assert_eq!(split_compound_source(four.clone()), four);
    }

    #[test]
    fn hyphen_without_spaces_is_not_a_separator() {
        let word = WordItem::new(1, "E-Mail-Adresse", "email address");
        assert_eq!(split_compound_source(word.clone()), word);
    }

    #[test]
    fn renumber_assigns_sequential_ids() {
        let mut words = vec![
            WordItem::new(5, "a", "b"),
            WordItem::new(5, "c", "d"),
            WordItem::new(1, "e", "f"),
        ];
        renumber(&mut words);
        let ids: Vec<u32> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
