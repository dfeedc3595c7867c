//! Pattern variants and their textual forms.
//!
//! A pattern decides whether it matches a probe string and how a replacement
//! is computed from it. Four variants cover every dictionary format:
//!
//! - [`Pattern::Fake`] always matches and passes the replacement through; it
//!   exists so external-resolver dictionaries can reuse the rule machinery.
//! - [`Pattern::Wildcard`] holds a literal key with open sides
//!   (`*слов`, `слов*`, `*слов*`, or none).
//! - [`Pattern::Regex`] is a plain regular expression.
//! - [`Pattern::Dicx`] is a whole-word template whose `*` tokens become
//!   capture groups, paired with a wildcard key extracted for indexing.
//!
//! ## Textual form
//!
//! A leading `$` makes the pattern case-sensitive. Without it the key is
//! lower-cased once at parse time and every probe is folded on match, which
//! also means wildcard replacement emits the retained probe text lower-cased.

use std::borrow::Cow;
use std::cmp::Reverse;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::rule::Target;
use crate::segment;

const CASE_FLAG: char = '$';
const WORD_BOUNDARY: &str = r"\b";

/// Which sides of a pattern are open.
///
/// The declaration order doubles as the preference order when a whole-word
/// template picks its index key: an exact key beats a prefix, a prefix beats
/// a suffix, a suffix beats an infix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Wildcard {
    None,
    Right,
    Left,
    Both,
}

impl Wildcard {
    fn from_sides(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => Wildcard::None,
            (false, true) => Wildcard::Right,
            (true, false) => Wildcard::Left,
            (true, true) => Wildcard::Both,
        }
    }

    /// A leading `*` in the textual form: the key may be preceded by anything.
    pub(crate) fn open_left(self) -> bool {
        matches!(self, Wildcard::Left | Wildcard::Both)
    }

    /// A trailing `*`: the key may be followed by anything.
    pub(crate) fn open_right(self) -> bool {
        matches!(self, Wildcard::Right | Wildcard::Both)
    }
}

/// The projection of an indexable pattern into the candidate-rule index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexEntry<'a> {
    pub key: &'a str,
    pub wildcard: Wildcard,
    pub case_sensitive: bool,
}

fn strip_case_flag(text: &str) -> (bool, &str) {
    match text.strip_prefix(CASE_FLAG) {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

// --- Wildcard patterns -------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct WildcardPattern {
    key: String,
    wildcard: Wildcard,
    case_sensitive: bool,
}

impl WildcardPattern {
    pub(crate) fn parse(text: &str) -> Self {
        let (case_sensitive, body) = strip_case_flag(text);
        let left = body.starts_with('*');
        let body = body.strip_prefix('*').unwrap_or(body);
        let right = body.ends_with('*');
        let body = body.strip_suffix('*').unwrap_or(body);
        let key = if case_sensitive { body.to_string() } else { body.to_lowercase() };
        Self { key, wildcard: Wildcard::from_sides(left, right), case_sensitive }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn wildcard(&self) -> Wildcard {
        self.wildcard
    }

    fn fold<'a>(&self, probe: &'a str) -> Cow<'a, str> {
        if self.case_sensitive { Cow::Borrowed(probe) } else { Cow::Owned(probe.to_lowercase()) }
    }

    pub(crate) fn matches(&self, probe: &str) -> bool {
        let probe = self.fold(probe);
        let probe = probe.as_ref();
        match self.wildcard {
            Wildcard::None => probe == self.key,
            Wildcard::Right => probe.starts_with(&self.key),
            Wildcard::Left => probe.ends_with(&self.key),
            Wildcard::Both => probe.contains(&self.key),
        }
    }

    /// Substitute the key inside the (case-folded) probe.
    ///
    /// `Right`/`Both` replace the first occurrence, `Left` replaces the key
    /// suffix, `None` discards the probe entirely.
    pub(crate) fn replace(&self, replacement: &str, probe: &str) -> String {
        match self.wildcard {
            Wildcard::None => replacement.to_string(),
            Wildcard::Right | Wildcard::Both => self.fold(probe).replacen(&self.key, replacement, 1),
            Wildcard::Left => {
                let probe = self.fold(probe);
                match probe.strip_suffix(self.key.as_str()) {
                    Some(head) => format!("{head}{replacement}"),
                    None => replacement.to_string(),
                }
            }
        }
    }

    fn index_entry(&self) -> IndexEntry<'_> {
        IndexEntry { key: &self.key, wildcard: self.wildcard, case_sensitive: self.case_sensitive }
    }
}

// --- Regex patterns ----------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct RegexPattern {
    re: Regex,
}

impl RegexPattern {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let (case_sensitive, body) = strip_case_flag(text);
        // a single space in the rule tolerates any run of whitespace in input
        let source = body.replace(' ', r"\s");
        let re = compile(&source, case_sensitive, text)?;
        Ok(Self { re })
    }

    pub(crate) fn matches(&self, probe: &str) -> bool {
        self.re.is_match(probe)
    }

    pub(crate) fn replace(&self, target: &Target, probe: &str) -> String {
        match target {
            Target::Literal(text) => self.re.replace_all(probe, text.as_str()).into_owned(),
            Target::ByMatch(f) => self.re.replace_all(probe, |caps: &regex::Captures<'_>| f(caps)).into_owned(),
            // resolver targets are applied at the rule layer and arrive here as literals
            Target::Resolver(_) => probe.to_string(),
        }
    }
}

fn compile(source: &str, case_sensitive: bool, original: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source| Error::PatternRegex { pattern: original.to_string(), source })
}

// --- Whole-word templates ----------------------------------------------------

/// A whole-word template such as `по-*` or `*ставк*`.
///
/// Matching runs through a derived regex; indexing runs through a wildcard
/// key sub-pattern extracted from the template's tokens.
#[derive(Debug, Clone)]
pub(crate) struct DicxPattern {
    re: Regex,
    key: WildcardPattern,
    case_sensitive: bool,
}

impl DicxPattern {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let (case_sensitive, body) = strip_case_flag(text);
        let key = Self::find_key(body)?;
        let source = Self::template_regex(body);
        let re = compile(&source, case_sensitive, text)?;
        Ok(Self { re, key, case_sensitive })
    }

    /// Pick the index key: mask `*` with the stress mark (which the tokenizer
    /// keeps inside words), wrap each non-punctuation token of the template as
    /// a wildcard pattern, and prefer closed over open sides, longer keys over
    /// shorter.
    fn find_key(template: &str) -> Result<WildcardPattern> {
        let masked: String = template.replace('*', "`");
        segment::words(&masked)
            .into_iter()
            .filter(|span| !is_single_punctuation(&masked[span.start..span.stop]))
            .map(|span| WildcardPattern::parse(&template[span.start..span.stop]))
            .min_by_key(|p| (p.wildcard(), Reverse(p.key().chars().count())))
            .ok_or_else(|| Error::PatternMalformed { pattern: template.to_string() })
    }

    /// Turn the template into a regex: word boundaries at closed edges, every
    /// `*` a `(\S*)` capture. Only `.` and `?` are escaped, so templates may
    /// use other regex syntax deliberately.
    fn template_regex(template: &str) -> String {
        let outer = WildcardPattern::parse(template);
        let mut source = String::new();
        if outer.wildcard() != Wildcard::None && !outer.wildcard().open_left() {
            source.push_str(WORD_BOUNDARY);
        }
        source.push_str(template);
        if outer.wildcard() != Wildcard::None && !outer.wildcard().open_right() {
            source.push_str(WORD_BOUNDARY);
        }
        source.replace('*', r"(\S*)").replace('.', r"\.").replace('?', r"\?")
    }

    pub(crate) fn matches(&self, probe: &str) -> bool {
        self.re.is_match(probe)
    }

    pub(crate) fn replace(&self, replacement: &str, probe: &str) -> String {
        self.re.replace_all(probe, replacement).into_owned()
    }

    fn index_entry(&self) -> IndexEntry<'_> {
        IndexEntry { key: self.key.key(), wildcard: self.key.wildcard(), case_sensitive: self.case_sensitive }
    }
}

fn is_single_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

// --- The tagged pattern ------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// Always matches; the replacement passes through verbatim.
    Fake,
    Wildcard(WildcardPattern),
    Regex(RegexPattern),
    Dicx(DicxPattern),
}

impl Pattern {
    pub(crate) fn matches(&self, probe: &str) -> bool {
        match self {
            Pattern::Fake => true,
            Pattern::Wildcard(p) => p.matches(probe),
            Pattern::Regex(p) => p.matches(probe),
            Pattern::Dicx(p) => p.matches(probe),
        }
    }

    pub(crate) fn replace(&self, target: &Target, probe: &str) -> String {
        match (self, target) {
            (Pattern::Regex(p), target) => p.replace(target, probe),
            (Pattern::Wildcard(p), Target::Literal(text)) => p.replace(text, probe),
            (Pattern::Dicx(p), Target::Literal(text)) => p.replace(text, probe),
            (Pattern::Fake, Target::Literal(text)) => text.clone(),
            // function targets only ever pair with regex patterns
            _ => probe.to_string(),
        }
    }

    /// How the pattern enters the candidate index, if it can.
    pub(crate) fn index_entry(&self) -> Option<IndexEntry<'_>> {
        match self {
            Pattern::Wildcard(p) => Some(p.index_entry()),
            Pattern::Dicx(p) => Some(p.index_entry()),
            Pattern::Fake | Pattern::Regex(_) => None,
        }
    }
}
