//! Regex-driven string candidates.
//!
//! Candidates are built by walking the pattern's syntax tree:
//! - literals are copied
//! - classes pick one member, printable ASCII preferred when the class has any
//! - alternations pick one branch
//! - unbounded repetitions are capped at `min + max_extra`
//! - anchors and other look-arounds emit nothing
//!
//! The compiled regex has the final say; a candidate that only looked right
//! (e.g. a word boundary that was skipped) is rejected and redrawn.

use crate::generator::GeneratorError;
use rand::Rng;
use regex::Regex;
use regex_syntax::hir::{Class, ClassUnicode, ClassUnicodeRange, Hir, HirKind};
use sample_core::schema::compile_pattern;
use sample_core::SchemaError;
use std::collections::HashMap;

/// A pattern compiled both for matching and for sampling.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    hir: Hir,
}

impl CompiledPattern {
    /// Compile `pattern`, attributing failures to the schema `path`.
    pub fn new(pattern: &str, path: &str) -> Result<Self, SchemaError> {
        let regex = compile_pattern(pattern, path)?;
        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| SchemaError::InvalidPattern {
                path: path.to_string(),
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { regex, hir })
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }

    /// Draw a candidate string. `None` when the walk produced no valid UTF-8
    /// or hit an empty class.
    pub fn sample<R: Rng>(&self, rng: &mut R, max_extra: u32) -> Option<String> {
        let mut out = Vec::new();
        sample_into(&self.hir, rng, max_extra, &mut out)?;
        String::from_utf8(out).ok()
    }
}

/// Patterns compiled once per generation call, keyed by source text.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, CompiledPattern>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled form of `pattern`, compiling it on first use.
    pub fn compiled(
        &mut self,
        pattern: &str,
        path: &str,
    ) -> Result<&CompiledPattern, GeneratorError> {
        if !self.compiled.contains_key(pattern) {
            let compiled = CompiledPattern::new(pattern, path)?;
            self.compiled.insert(pattern.to_string(), compiled);
        }
        self.compiled
            .get(pattern)
            .ok_or_else(|| GeneratorError::unsatisfiable(path, "pattern cache miss"))
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

fn sample_into<R: Rng>(hir: &Hir, rng: &mut R, max_extra: u32, out: &mut Vec<u8>) -> Option<()> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}

        HirKind::Literal(lit) => out.extend_from_slice(&lit.0),

        HirKind::Class(Class::Unicode(class)) => {
            let c = pick_char(rng, class)?;
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }

        HirKind::Class(Class::Bytes(class)) => {
            let total: u32 = class
                .ranges()
                .iter()
                .map(|r| u32::from(r.end()) - u32::from(r.start()) + 1)
                .sum();
            if total == 0 {
                return None;
            }
            let mut idx = rng.gen_range(0..total);
            for r in class.ranges() {
                let width = u32::from(r.end()) - u32::from(r.start()) + 1;
                if idx < width {
                    out.push(r.start() + idx as u8);
                    break;
                }
                idx -= width;
            }
        }

        HirKind::Repetition(rep) => {
            let upper = rep
                .max
                .unwrap_or(u32::MAX)
                .min(rep.min.saturating_add(max_extra));
            let times = rng.gen_range(rep.min..=upper.max(rep.min));
            for _ in 0..times {
                sample_into(&rep.sub, rng, max_extra, out)?;
            }
        }

        HirKind::Capture(cap) => sample_into(&cap.sub, rng, max_extra, out)?,

        HirKind::Concat(parts) => {
            for part in parts {
                sample_into(part, rng, max_extra, out)?;
            }
        }

        HirKind::Alternation(branches) => {
            if branches.is_empty() {
                return None;
            }
            let branch = &branches[rng.gen_range(0..branches.len())];
            sample_into(branch, rng, max_extra, out)?;
        }
    }
    Some(())
}

/// Pick a member of a Unicode class, staying within printable ASCII when possible.
fn pick_char<R: Rng>(rng: &mut R, class: &ClassUnicode) -> Option<char> {
    let mut printable = ClassUnicode::new([ClassUnicodeRange::new(' ', '~')]);
    printable.intersect(class);
    let class = if printable.ranges().is_empty() {
        class
    } else {
        &printable
    };

    let total: u64 = class
        .ranges()
        .iter()
        .map(|r| u64::from(r.end() as u32) - u64::from(r.start() as u32) + 1)
        .sum();
    if total == 0 {
        return None;
    }

    let mut idx = rng.gen_range(0..total);
    for r in class.ranges() {
        let width = u64::from(r.end() as u32) - u64::from(r.start() as u32) + 1;
        if idx < width {
            // Ranges may straddle the surrogate gap
            return char::from_u32(r.start() as u32 + idx as u32).or(Some(r.start()));
        }
        idx -= width;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn samples(pattern: &str, n: usize) -> Vec<String> {
        let compiled = CompiledPattern::new(pattern, "$").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        (0..n)
            .map(|_| compiled.sample(&mut rng, 8).unwrap())
            .collect()
    }

    #[test]
    fn test_literal_and_class() {
        for s in samples("^SKU-[0-9]{4}$", 50) {
            assert!(s.starts_with("SKU-"));
            assert_eq!(s.len(), 8);
            assert!(s[4..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_alternation_and_groups() {
        for s in samples("^(cat|dog)s?$", 50) {
            assert!(["cat", "cats", "dog", "dogs"].contains(&s.as_str()), "{s}");
        }
    }

    #[test]
    fn test_unbounded_repetition_is_capped() {
        for s in samples("^a+$", 100) {
            assert!(!s.is_empty());
            assert!(s.len() <= 9);
        }
    }

    #[test]
    fn test_unicode_classes_prefer_ascii() {
        let compiled = CompiledPattern::new(r"^\w+@\w+\.com$", "$").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = compiled.sample(&mut rng, 8).unwrap();
            assert!(s.is_ascii());
            assert!(compiled.is_match(&s), "{s}");
        }
    }

    #[test]
    fn test_dot_stays_printable() {
        for s in samples("^.{5}$", 20) {
            assert_eq!(s.chars().count(), 5);
            assert!(s.chars().all(|c| (' '..='~').contains(&c)));
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let err = CompiledPattern::new("(unclosed", "$.code").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { ref path, .. } if path == "$.code"));
    }

    #[test]
    fn test_cache_compiles_once() {
        let mut cache = PatternCache::new();
        cache.compiled("[a-z]", "$.a").unwrap();
        cache.compiled("[a-z]", "$.b").unwrap();
        cache.compiled("[0-9]", "$.c").unwrap();
        assert_eq!(cache.len(), 2);
    }
}
