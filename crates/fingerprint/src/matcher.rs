//! Single fingerprint: compiled pattern plus the params it extracts.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use tracing::debug;

/// Value reported when a fingerprint carries no certainty attribute.
pub const DEFAULT_CERTAINTY: &str = "0.0";

/// `{service.version}` style references inside param values.
static INTERPOLATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^\s{}]+)\}").expect("interpolation pattern is valid"));

/// One extracted attribute. `pos == 0` means a literal `value`,
/// otherwise the capture group at `pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub pos: usize,
    pub name: String,
    pub value: Option<String>,
}

impl Param {
    #[inline]
    #[must_use]
    pub fn literal<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            pos: 0,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    #[inline]
    #[must_use]
    pub fn capture<N: Into<String>>(pos: usize, name: N) -> Self {
        Self {
            pos,
            name: name.into(),
            value: None,
        }
    }
}

/// Values extracted by a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintMatch {
    pub description: String,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Fingerprint {
    description: String,
    certainty: Option<String>,
    pattern: Regex,
    params: Vec<Param>,
}

impl Fingerprint {
    /// Compile `pattern` with Recog-style `flags` (`REG_ICASE`, `REG_MULTILINE`,
    /// `REG_DOT_NEWLINE`).
    pub fn compile(
        description: impl Into<String>,
        pattern: &str,
        flags: Option<&str>,
        certainty: Option<String>,
        params: Vec<Param>,
    ) -> Result<Self, regex::Error> {
        let mut builder = RegexBuilder::new(&translate_pattern(pattern));
        for flag in flags.unwrap_or_default().split(|c: char| c == '|' || c == ',' || c.is_whitespace()) {
            match flag {
                "" => {}
                "REG_ICASE" => {
                    builder.case_insensitive(true);
                }
                "REG_MULTILINE" => {
                    builder.multi_line(true);
                }
                "REG_DOT_NEWLINE" => {
                    builder.dot_matches_new_line(true);
                }
                other => debug!("Ignoring unknown fingerprint flag {}", other),
            }
        }

        Ok(Self {
            description: description.into(),
            certainty,
            pattern: builder.build()?,
            params,
        })
    }

    /// Match `text`, returning the extracted values on success.
    ///
    /// Values always include `matched` (when the fingerprint has a
    /// description) and `fp.certainty`. Only literal params are
    /// interpolated; captured text is kept verbatim.
    pub fn match_banner(&self, text: &str) -> Option<FingerprintMatch> {
        let captures = self.pattern.captures(text)?;

        let mut values = BTreeMap::new();
        if !self.description.is_empty() {
            values.insert("matched".to_string(), self.description.clone());
        }
        values.insert(
            "fp.certainty".to_string(),
            self.certainty.clone().unwrap_or_else(|| DEFAULT_CERTAINTY.to_string()),
        );

        let mut literals = Vec::new();
        for param in &self.params {
            let value = if param.pos == 0 {
                literals.push(param.name.as_str());
                param.value.clone().unwrap_or_default()
            } else {
                captures
                    .get(param.pos)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            values.insert(param.name.clone(), value);
        }

        interpolate(&mut values, &literals);

        Some(FingerprintMatch {
            description: self.description.clone(),
            values,
        })
    }
}

/// Replace `{name}` references in the `names` entries with sibling values.
/// Unknown names stay as is.
fn interpolate(values: &mut BTreeMap<String, String>, names: &[&str]) {
    if !names.iter().any(|n| values.get(*n).map_or(false, |v| v.contains('{'))) {
        return;
    }

    let snapshot = values.clone();
    for name in names {
        let Some(value) = values.get_mut(*name) else {
            continue;
        };
        if !value.contains('{') {
            continue;
        }
        let replaced = INTERPOLATION_RE
            .replace_all(value.as_str(), |caps: &regex::Captures<'_>| {
                snapshot
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        *value = replaced;
    }
}

/// Rewrite the Ruby escapes the `regex` crate has no equivalent for.
///
/// `\Z` (end of input, before an optional final newline) and `\h` (hex
/// digit). Everything else passes through untouched and is left to the
/// regex compiler to accept or reject.
fn translate_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Z') => out.push_str(r"(?:\n?\z)"),
            Some('h') => out.push_str("[0-9a-fA-F]"),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }

    out
}
