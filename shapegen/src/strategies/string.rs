//! String strategy.
//!
//! Length, affixes, substrings, trimming and the email/url/uuid formats are
//! built directly. Regex patterns, a second format and any other constraint
//! this module does not fold into [`StringBounds`] are left to the fallback
//! filter, which rejects non-matching draws. A pattern that ordinary strings
//! rarely match therefore fails with `GenerationFailure` and needs an override.

use rand::Rng;
use shapegen_sampler::{
    BoxedGenerator, CharGenerator, EmailGenerator, Generator, GeneratorExt, StringGenerator,
    UrlGenerator, UuidV4Generator, from_fn,
};
use shapegen_schema::{Action, Schema, Validation, Value};

use super::{choice, guard_if_needed, restrict_choices};
use crate::builder::Context;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringFormat {
    Email,
    Url,
    Uuid,
}

/// String constraints resolved from a pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StringBounds {
    pub min_length: usize,
    pub max_length: Option<usize>,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    pub includes: Vec<String>,
    pub format: Option<StringFormat>,
    pub choices: Option<Vec<Value>>,
    pub trim: bool,
    pub unrecognized: Vec<String>,
}

/// The literal text every generated string must contain
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FixedParts {
    pub prefix: String,
    pub suffix: String,
    pub includes: Vec<String>,
}

impl FixedParts {
    pub fn char_len(&self) -> usize {
        self.prefix.chars().count()
            + self.suffix.chars().count()
            + self
                .includes
                .iter()
                .map(|part| part.chars().count())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty() && self.includes.is_empty()
    }

    /// True if trimming the composed string could cut into a fixed part
    pub fn has_edge_whitespace(&self) -> bool {
        let starts = |s: &str| s.starts_with(char::is_whitespace);
        let ends = |s: &str| s.ends_with(char::is_whitespace);
        starts(&self.prefix)
            || ends(&self.suffix)
            || self.includes.iter().any(|part| starts(part) || ends(part))
    }
}

/// The longest candidate, provided every other candidate agrees with it
fn longest_consistent(candidates: &[String], agrees: impl Fn(&str, &str) -> bool) -> Option<String> {
    let longest = candidates.iter().max_by_key(|s| s.chars().count())?;
    candidates
        .iter()
        .all(|candidate| agrees(longest, candidate))
        .then(|| longest.clone())
}

impl StringBounds {
    pub fn from_pipeline(actions: &[Action]) -> Self {
        actions.iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, action: &Action) -> Self {
        match action {
            Action::Validation(validation) => match validation {
                Validation::MinLength(n) => self.min_length = self.min_length.max(*n),
                Validation::MaxLength(n) => self.cap_length(*n),
                Validation::Length(n) => {
                    self.min_length = self.min_length.max(*n);
                    self.cap_length(*n);
                }
                Validation::NonEmpty => self.min_length = self.min_length.max(1),
                Validation::StartsWith(prefix) => self.prefixes.push(prefix.clone()),
                Validation::EndsWith(suffix) => self.suffixes.push(suffix.clone()),
                Validation::Includes(part) => self.includes.push(part.clone()),
                Validation::Email => self.set_format(StringFormat::Email, validation),
                Validation::Url => self.set_format(StringFormat::Url, validation),
                Validation::Uuid => self.set_format(StringFormat::Uuid, validation),
                Validation::Value(value) => {
                    restrict_choices(&mut self.choices, std::slice::from_ref(value))
                }
                Validation::Values(values) => restrict_choices(&mut self.choices, values),
                other => self.unrecognized.push(other.type_tag().to_string()),
            },
            Action::Transformation(transformation) if transformation.is_trim() => {
                self.trim = true
            }
            Action::Transformation(transformation) => {
                self.unrecognized.push(transformation.type_tag().to_string())
            }
        }
        self
    }

    fn cap_length(&mut self, n: usize) {
        self.max_length = Some(self.max_length.map_or(n, |max| max.min(n)));
    }

    fn set_format(&mut self, format: StringFormat, validation: &Validation) {
        if self.format.is_none() {
            self.format = Some(format);
        } else {
            self.unrecognized.push(validation.type_tag().to_string());
        }
    }

    /// Declared maximum, or `2 * min_length + slack`
    pub fn resolved_max(&self, slack: usize) -> usize {
        self.max_length
            .unwrap_or(self.min_length.saturating_mul(2).saturating_add(slack))
    }

    /// Prefix, suffix and substrings, or `None` when the declared prefixes
    /// (or suffixes) contradict each other
    pub fn fixed_parts(&self) -> Option<FixedParts> {
        let prefix = if self.prefixes.is_empty() {
            String::new()
        } else {
            longest_consistent(&self.prefixes, |longest, other| longest.starts_with(other))?
        };
        let suffix = if self.suffixes.is_empty() {
            String::new()
        } else {
            longest_consistent(&self.suffixes, |longest, other| longest.ends_with(other))?
        };
        Some(FixedParts {
            prefix,
            suffix,
            includes: self.includes.clone(),
        })
    }

    /// True if anything besides the format constrains the string
    pub fn constrains_shape(&self) -> bool {
        self.min_length > 0
            || self.max_length.is_some()
            || !self.prefixes.is_empty()
            || !self.suffixes.is_empty()
            || !self.includes.is_empty()
            || !self.unrecognized.is_empty()
    }
}

fn strings(chars: CharGenerator, min: usize, max: usize) -> BoxedGenerator<Value> {
    StringGenerator::with_char_generator(chars, min, max)
        .map(Value::String)
        .boxed()
}

fn format_generator(format: StringFormat) -> BoxedGenerator<Value> {
    match format {
        StringFormat::Email => EmailGenerator::new().map(Value::String).boxed(),
        StringFormat::Url => UrlGenerator::new().map(Value::String).boxed(),
        StringFormat::Uuid => UuidV4Generator::new().map(Value::String).boxed(),
    }
}

/// `prefix + filler-with-substrings + suffix`, with the filler sized to fit the length range
fn composed(chars: CharGenerator, parts: FixedParts, min: usize, max: usize) -> BoxedGenerator<Value> {
    let fixed = parts.char_len();
    let filler = StringGenerator::with_char_generator(chars, min.saturating_sub(fixed), max - fixed);

    from_fn(move |rng, config| {
        let filler: Vec<char> = filler.generate(rng, config)?.chars().collect();
        let mut cuts: Vec<usize> = parts
            .includes
            .iter()
            .map(|_| rng.gen_range(0..=filler.len()))
            .collect();
        cuts.sort_unstable();

        let mut text = parts.prefix.clone();
        let mut start = 0;
        for (cut, part) in cuts.iter().zip(&parts.includes) {
            text.extend(&filler[start..*cut]);
            text.push_str(part);
            start = *cut;
        }
        text.extend(&filler[start..]);
        text.push_str(&parts.suffix);
        Ok(Value::String(text))
    })
}

pub(crate) fn build(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let bounds = StringBounds::from_pipeline(schema.pipeline());

    if let Some(choices) = &bounds.choices {
        return Ok(choice(schema, choices.clone(), at, cx));
    }

    if let Some(format) = bounds.format {
        let reasons: Vec<String> = if bounds.constrains_shape() {
            vec!["format combined with other constraints".to_string()]
        } else {
            Vec::new()
        };
        return Ok(guard_if_needed(format_generator(format), schema, at, &reasons, cx));
    }

    let chars = if bounds.trim {
        CharGenerator::visible()
    } else {
        CharGenerator::printable()
    };
    let min = bounds.min_length;
    let max = bounds.resolved_max(cx.config().string_slack);
    let mut reasons: Vec<String> = bounds
        .unrecognized
        .iter()
        .map(|tag| format!("unrecognized constraint {}", tag))
        .collect();

    if min > max {
        reasons.push(format!("min_length {} exceeds max_length {}", min, max));
        return Ok(guard_if_needed(strings(chars, min, min), schema, at, &reasons, cx));
    }

    let generator = match bounds.fixed_parts() {
        None => {
            reasons.push("contradicting prefixes or suffixes".to_string());
            strings(chars, min, max)
        }
        Some(parts) if parts.is_empty() => strings(chars, min, max),
        Some(parts) if parts.char_len() > max => {
            reasons.push("fixed parts do not fit in max_length".to_string());
            strings(chars, min, max)
        }
        Some(parts) => {
            if bounds.trim && parts.has_edge_whitespace() {
                reasons.push("fixed parts with edge whitespace under trim".to_string());
            }
            composed(chars, parts, min, max)
        }
    };

    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_schema::{
        email, ends_with, includes, length, max_length, min_length, non_empty, regex, starts_with,
        to_upper_case, trim, url, values,
    };

    #[test]
    fn test_lengths_fold_to_tightest() {
        let bounds = StringBounds::from_pipeline(&[min_length(3), min_length(5), max_length(9), max_length(7)]);
        assert_eq!(bounds.min_length, 5);
        assert_eq!(bounds.max_length, Some(7));

        let bounds = StringBounds::from_pipeline(&[length(4), non_empty()]);
        assert_eq!((bounds.min_length, bounds.max_length), (4, Some(4)));
    }

    #[test]
    fn test_default_max_uses_slack() {
        let bounds = StringBounds::from_pipeline(&[min_length(5)]);
        assert_eq!(bounds.resolved_max(10), 20);
        assert_eq!(StringBounds::default().resolved_max(10), 10);
    }

    #[test]
    fn test_fixed_parts_take_longest_consistent() {
        let bounds = StringBounds::from_pipeline(&[
            starts_with("ab"),
            starts_with("abc"),
            ends_with("z"),
            includes("mid"),
        ]);
        assert_eq!(
            bounds.fixed_parts(),
            Some(FixedParts {
                prefix: "abc".to_string(),
                suffix: "z".to_string(),
                includes: vec!["mid".to_string()],
            })
        );

        let bounds = StringBounds::from_pipeline(&[starts_with("ab"), starts_with("x")]);
        assert_eq!(bounds.fixed_parts(), None);
    }

    #[test]
    fn test_second_format_is_unrecognized() {
        let bounds = StringBounds::from_pipeline(&[email(), url()]);
        assert_eq!(bounds.format, Some(StringFormat::Email));
        assert_eq!(bounds.unrecognized, vec!["url".to_string()]);
        assert!(bounds.constrains_shape());
    }

    #[test]
    fn test_transformations() {
        let bounds = StringBounds::from_pipeline(&[trim(), to_upper_case()]);
        assert!(bounds.trim);
        assert_eq!(bounds.unrecognized, vec!["to_upper_case".to_string()]);
    }

    #[test]
    fn test_regex_is_unrecognized() {
        let bounds = StringBounds::from_pipeline(&[regex(regex::Regex::new("^a+$").unwrap())]);
        assert_eq!(bounds.unrecognized, vec!["regex".to_string()]);
    }

    #[test]
    fn test_choices_intersect() {
        let bounds = StringBounds::from_pipeline(&[values(["a", "b"]), values(["b", "c"])]);
        assert_eq!(bounds.choices, Some(vec![Value::from("b")]));
    }

    #[test]
    fn test_edge_whitespace() {
        let parts = FixedParts {
            prefix: " a".to_string(),
            ..FixedParts::default()
        };
        assert!(parts.has_edge_whitespace());
        let parts = FixedParts {
            prefix: "a ".to_string(),
            suffix: " b".to_string(),
            includes: vec!["c d".to_string()],
        };
        assert!(!parts.has_edge_whitespace());
        assert_eq!(parts.char_len(), 7);
    }
}
