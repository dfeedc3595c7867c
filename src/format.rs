//! Format registry: file extension → component bundle.
//!
//! A format decides everything about a dictionary: the level its rules apply
//! at, how rows are loaded and prepared, which dictionary lookup is built,
//! which rule flavor binds pattern to target, and how pattern and target
//! text are turned into components. The registry is a compile-time table;
//! there is no directory scanning or code loading behind it.
//!
//! | Ext    | Level | Loader | Dict    | Rule     | Pattern  | Target          |
//! |--------|-------|--------|---------|----------|----------|-----------------|
//! | `dic`  | part  | lines  | Indexed | literal  | wildcard | verbatim        |
//! | `dicx` | sent  | lines  | Dicx    | literal  | template | capture refs    |
//! | `rex`  | line  | lines  | Plain   | literal  | regex    | `$N` / `@name`  |
//! | `rexw` | word  | lines  | Plain   | literal  | regex    | as `rex`        |
//! | `exts` | sent  | single | Plain   | resolved | fake     | `corrector`     |
//! | `extw` | word  | single | Plain   | resolved | fake     | `corrector`     |

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::loader::{self, LoadDepends, Loader};
use crate::pattern::{DicxPattern, Pattern, RegexPattern, WildcardPattern};
use crate::resolver::SideModule;
use crate::rule::Target;

/// Granularity a dictionary applies at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Line,
    Sent,
    Word,
    /// Applies to every word *and* every word's parts.
    Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DictKind {
    Plain,
    Indexed,
    Dicx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleKind {
    Literal,
    Resolved,
}

pub(crate) type PatternMaker = fn(&str) -> Result<Pattern>;
pub(crate) type TargetMaker = fn(&[String], &SideModule<'_>) -> Result<Target>;

/// Everything a format contributes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depends {
    pub level: Level,
    pub load: LoadDepends,
    pub dict: DictKind,
    pub rule: RuleKind,
    pub pattern_maker: PatternMaker,
    /// Absent means the raw target text is used verbatim.
    pub target_maker: Option<TargetMaker>,
}

static FORMATS: Lazy<HashMap<&'static str, Depends>> = Lazy::new(|| {
    let lines = LoadDepends { loader: Loader::Lines, prepare: loader::split_rule_line };
    let single = LoadDepends { loader: Loader::Single, prepare: loader::empty_rule };
    HashMap::from([
        (
            "dic",
            Depends {
                level: Level::Part,
                load: lines,
                dict: DictKind::Indexed,
                rule: RuleKind::Literal,
                pattern_maker: |text| Ok(Pattern::Wildcard(WildcardPattern::parse(text))),
                target_maker: None,
            },
        ),
        (
            "dicx",
            Depends {
                level: Level::Sent,
                load: lines,
                dict: DictKind::Dicx,
                rule: RuleKind::Literal,
                pattern_maker: |text| Ok(Pattern::Dicx(DicxPattern::parse(text)?)),
                target_maker: Some(dicx_target),
            },
        ),
        (
            "rex",
            Depends {
                level: Level::Line,
                load: lines,
                dict: DictKind::Plain,
                rule: RuleKind::Literal,
                pattern_maker: |text| Ok(Pattern::Regex(RegexPattern::parse(text)?)),
                target_maker: Some(rex_target),
            },
        ),
        (
            "rexw",
            Depends {
                level: Level::Word,
                load: lines,
                dict: DictKind::Plain,
                rule: RuleKind::Literal,
                pattern_maker: |text| Ok(Pattern::Regex(RegexPattern::parse(text)?)),
                target_maker: Some(rex_target),
            },
        ),
        (
            "exts",
            Depends {
                level: Level::Sent,
                load: single,
                dict: DictKind::Plain,
                rule: RuleKind::Resolved,
                pattern_maker: |_| Ok(Pattern::Fake),
                target_maker: Some(ext_target),
            },
        ),
        (
            "extw",
            Depends {
                level: Level::Word,
                load: single,
                dict: DictKind::Plain,
                rule: RuleKind::Resolved,
                pattern_maker: |_| Ok(Pattern::Fake),
                target_maker: Some(ext_target),
            },
        ),
    ])
});

/// The registered bundle for a file extension.
pub(crate) fn format(name: &str) -> Result<&'static Depends> {
    FORMATS.get(name).ok_or_else(|| Error::FormatUnknown(name.to_string()))
}

/// Rewrite a `pre*mid*post` target so each `*` refers back to the matching
/// capture group of the template regex.
fn dicx_target(data: &[String], _side: &SideModule<'_>) -> Result<Target> {
    let target = data.first().map(String::as_str).unwrap_or_default();
    let mut rewritten = String::new();
    for (group, piece) in target.split('*').enumerate() {
        if group > 0 {
            rewritten.push_str(&format!("${{{group}}}"));
        }
        rewritten.push_str(piece);
    }
    Ok(Target::Literal(rewritten))
}

/// `@name` targets resolve through the side module; anything else is literal
/// replacement text, with `$N` already the engine's capture syntax.
fn rex_target(data: &[String], side: &SideModule<'_>) -> Result<Target> {
    let target = data.first().map(String::as_str).unwrap_or_default();
    match target.strip_prefix('@') {
        Some(name) => Ok(Target::ByMatch(side.function(name)?)),
        None => Ok(Target::Literal(target.to_string())),
    }
}

fn ext_target(_data: &[String], side: &SideModule<'_>) -> Result<Target> {
    Ok(Target::Resolver(side.corrector()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolvers;
    use std::path::Path;

    #[test]
    fn all_builtin_formats_are_registered() {
        for (name, level) in [
            ("dic", Level::Part),
            ("dicx", Level::Sent),
            ("rex", Level::Line),
            ("rexw", Level::Word),
            ("exts", Level::Sent),
            ("extw", Level::Word),
        ] {
            assert_eq!(format(name).unwrap().level, level);
        }
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(matches!(format("doc"), Err(Error::FormatUnknown(_))));
    }

    #[test]
    fn dicx_targets_number_their_captures() {
        let resolvers = Resolvers::default();
        let side = SideModule::new(Path::new("x.dicx"), &resolvers);
        let target = dicx_target(&["по *".to_string()], &side).unwrap();
        assert!(matches!(target, Target::Literal(ref t) if t == "по ${1}"));

        let target = dicx_target(&["*о*".to_string()], &side).unwrap();
        assert!(matches!(target, Target::Literal(ref t) if t == "${1}о${2}"));
    }

    #[test]
    fn rex_targets_pass_literals_and_resolve_names() {
        let mut resolvers = Resolvers::default();
        resolvers.register_fn("num_rex", "frac", |caps: &regex::Captures<'_>| caps[0].to_string());
        let side = SideModule::new(Path::new("num.rex"), &resolvers);

        let target = rex_target(&["$1.$2".to_string()], &side).unwrap();
        assert!(matches!(target, Target::Literal(ref t) if t == "$1.$2"));

        assert!(matches!(rex_target(&["@frac".to_string()], &side).unwrap(), Target::ByMatch(_)));
        assert!(rex_target(&["@int".to_string()], &side).is_err());
    }
}
