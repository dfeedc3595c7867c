//! Sentence, word, and part segmentation.
//!
//! The tree in `tree.rs` only needs segmenters that (a) preserve byte offsets
//! so that inter-token whitespace can be restored on rejoin, and (b) keep the
//! stress mark `` ` `` inside word tokens, so a mark inserted by an earlier
//! dictionary never splits the word on a later pass.
//!
//! Sentence segmentation is a *heuristic* scan: a sentence ends at a run of
//! terminator punctuation followed by whitespace and something that looks like
//! a sentence opening. False merges are acceptable: downstream rules still
//! match full patterns against whatever segment they are given.

/// Byte span of a segment within its parent text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub stop: usize,
}

/// The character that marks stress on the preceding vowel.
pub(crate) const STRESS_MARK: char = '`';

/// Split `text` into sentence spans, excluding surrounding whitespace.
pub(crate) fn sentences(text: &str) -> Vec<Span> {
    // terminator run plus any closing quotes/brackets, then the whitespace gap
    let boundary = regex!(r#"([.!?…]+[)»"'\]]*)\s+"#);

    let mut spans = Vec::new();
    let mut cursor = 0usize;
    for caps in boundary.captures_iter(text) {
        let all = caps.get(0).unwrap();
        let term = caps.get(1).unwrap();
        if !opens_sentence(&text[all.end()..]) {
            continue;
        }
        if let Some(span) = trimmed(text, cursor, term.end()) {
            spans.push(span);
        }
        cursor = all.end();
    }
    if let Some(span) = trimmed(text, cursor, text.len()) {
        spans.push(span);
    }
    spans
}

fn opens_sentence(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_uppercase() || c.is_numeric() || matches!(c, '«' | '"' | '(' | '[' | '“' | '‘'),
    }
}

fn trimmed(text: &str, start: usize, stop: usize) -> Option<Span> {
    let segment = &text[start..stop];
    let body = segment.trim();
    if body.is_empty() {
        return None;
    }
    let lead = segment.len() - segment.trim_start().len();
    Some(Span { start: start + lead, stop: start + lead + body.len() })
}

/// Split `text` into word and punctuation spans.
///
/// A word starts at an alphanumeric character (or a stress mark directly
/// before one), swallows `` ` `` next to word characters, and swallows `-`
/// when another word character follows. Any other non-whitespace character is
/// a single-character punctuation token.
pub(crate) fn words(text: &str) -> Vec<Span> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let count = chars.len();
    let at = |i: usize| -> usize {
        if i < count { chars[i].0 } else { text.len() }
    };

    let mut spans = Vec::new();
    let mut i = 0;
    while i < count {
        let (pos, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if starts_word(&chars, i) {
            let start = pos;
            i += 1;
            while i < count {
                let c = chars[i].1;
                if is_word_char(c) {
                    i += 1;
                } else if c == '-' && i + 1 < count && is_word_char(chars[i + 1].1) {
                    i += 1;
                } else {
                    break;
                }
            }
            spans.push(Span { start, stop: at(i) });
        } else {
            spans.push(Span { start: pos, stop: at(i + 1) });
            i += 1;
        }
    }
    spans
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == STRESS_MARK
}

fn starts_word(chars: &[(usize, char)], i: usize) -> bool {
    let c = chars[i].1;
    c.is_alphanumeric() || (c == STRESS_MARK && chars.get(i + 1).is_some_and(|&(_, d)| d.is_alphanumeric()))
}

/// Split `text` at literal `-`, discarding empty pieces.
///
/// Fewer than two pieces means the token is not a compound (handles source
/// text like `дельта-` or `-1`) and yields no spans at all.
pub(crate) fn parts(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0usize;
    for (pos, _) in text.match_indices('-') {
        if pos > cursor {
            spans.push(Span { start: cursor, stop: pos });
        }
        cursor = pos + 1;
    }
    if cursor < text.len() {
        spans.push(Span { start: cursor, stop: text.len() });
    }
    if spans.len() < 2 {
        spans.clear();
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str, spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| text[s.start..s.stop].to_string()).collect()
    }

    #[test]
    fn words_split_on_whitespace_and_punctuation() {
        let text = "по-научному подходу, да";
        let spans = words(text);
        assert_eq!(texts(text, &spans), ["по-научному", "подходу", ",", "да"]);
    }

    #[test]
    fn words_keep_stress_mark_inside_token() {
        let text = "сл`ово и сло`во";
        let spans = words(text);
        assert_eq!(texts(text, &spans), ["сл`ово", "и", "сло`во"]);
    }

    #[test]
    fn words_keep_edge_stress_marks() {
        // wildcard templates are masked with the stress mark before tokenizing
        let text = "по-` и `слов";
        let spans = words(text);
        assert_eq!(texts(text, &spans), ["по-`", "и", "`слов"]);
    }

    #[test]
    fn words_offsets_are_byte_positions() {
        let text = "а  б";
        let spans = words(text);
        assert_eq!(spans[0], Span { start: 0, stop: 2 });
        assert_eq!(spans[1], Span { start: 4, stop: 6 });
    }

    #[test]
    fn lone_stress_mark_is_punctuation() {
        let text = "ну `, вот";
        let spans = words(text);
        assert_eq!(texts(text, &spans), ["ну", "`", ",", "вот"]);
    }

    #[test]
    fn sentences_split_on_terminator_before_capital() {
        let text = "Первое предложение. Второе предложение!";
        let spans = sentences(text);
        assert_eq!(texts(text, &spans), ["Первое предложение.", "Второе предложение!"]);
    }

    #[test]
    fn sentences_do_not_split_before_lowercase() {
        let text = "Сокращение т. е. не рвёт фразу.";
        assert_eq!(sentences(text).len(), 1);
    }

    #[test]
    fn sentences_preserve_gap_offsets() {
        let text = "Раз.  Два.";
        let spans = sentences(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].start - spans[0].stop, 2);
    }

    #[test]
    fn unterminated_text_is_one_sentence() {
        let text = "3,14 and 2,71";
        let spans = sentences(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(texts(text, &spans), [text]);
    }

    #[test]
    fn parts_split_compounds_only() {
        let text = "из-за";
        let spans = parts(text);
        assert_eq!(texts(text, &spans), ["из", "за"]);

        assert!(parts("слово").is_empty());
        assert!(parts("дельта-").is_empty());
        assert!(parts("-1").is_empty());
    }
}
