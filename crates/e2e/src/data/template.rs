//! Placeholder substitution for text templates
//!
//! Templates mark values with `<<TOKEN_NAME>>`. Substitution is literal, and
//! since no value may contain `<<` or `>>` a replacement can never form
//! another token, so the order tokens are replaced in does not matter.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

use crate::config::SubstitutionMode;
use crate::error::{read_to_string, DataError, DataResult};

const OPEN: &str = "<<";
const CLOSE: &str = ">>";

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<[A-Z0-9_]+>>").expect("token pattern is valid"));

static TOKEN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_]+$").expect("token name pattern is valid"));

/// Token-to-value map for one substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token; `name` may be given bare (`CHILD_NHS`) or wrapped (`<<CHILD_NHS>>`)
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> DataResult<()> {
        let token = wrap_token(name)?;
        let value = value.into();
        if value.contains(OPEN) || value.contains(CLOSE) {
            return Err(DataError::PlaceholderCollision { token, value });
        }
        self.values.insert(token, value);
        Ok(())
    }

    /// Builder form of [`Placeholders::insert`]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> DataResult<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let token = wrap_token(name).ok()?;
        self.values.get(&token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wrapped tokens and their values, ordered by token
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy with every value passed through `escape`
    fn escaped_with<F>(&self, escape: F) -> DataResult<Self>
    where
        F: Fn(&str) -> DataResult<String>,
    {
        let values = self
            .values
            .iter()
            .map(|(token, value)| Ok((token.clone(), escape(value)?)))
            .collect::<DataResult<_>>()?;
        Ok(Self { values })
    }
}

fn wrap_token(name: &str) -> DataResult<String> {
    let bare = name
        .strip_prefix(OPEN)
        .and_then(|n| n.strip_suffix(CLOSE))
        .unwrap_or(name);
    if !TOKEN_NAME.is_match(bare) {
        return Err(DataError::InvalidPlaceholder(name.to_string()));
    }
    Ok(format!("{}{}{}", OPEN, bare, CLOSE))
}

fn escape_json_str(value: &str) -> DataResult<String> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}

/// Quote a value as one CSV field when it holds a delimiter, quote or line break
fn escape_csv_field(value: &str) -> DataResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record([value])?;
    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;

    let field = String::from_utf8_lossy(&bytes);
    Ok(field.strip_suffix('\n').unwrap_or(&field).to_string())
}

/// Distinct placeholder tokens occurring in `text`, in order of first appearance
pub fn find_tokens(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// A template text awaiting substitution
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Load a template from a file
    pub fn load(path: &Path) -> DataResult<Self> {
        let source = read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), source))
    }

    /// Replace every token with its value
    pub fn render(
        &self,
        placeholders: &Placeholders,
        mode: SubstitutionMode,
    ) -> DataResult<String> {
        for (token, _) in placeholders.iter() {
            if !self.source.contains(token) {
                match mode {
                    SubstitutionMode::Strict => {
                        return Err(DataError::UnusedPlaceholder(token.to_string()))
                    }
                    SubstitutionMode::Permissive => {
                        debug!("{} does not use {}", self.name, token)
                    }
                }
            }
        }

        let rendered = placeholders
            .iter()
            .fold(self.source.clone(), |text, (token, value)| text.replace(token, value));

        if mode == SubstitutionMode::Strict {
            let leftover = find_tokens(&rendered);
            if !leftover.is_empty() {
                return Err(DataError::UnresolvedPlaceholder(leftover));
            }
        }

        debug!("Rendered {} with {} placeholder(s)", self.name, placeholders.len());
        Ok(rendered)
    }

    /// Substitute JSON-escaped values, then parse the result
    pub fn render_json(
        &self,
        placeholders: &Placeholders,
        mode: SubstitutionMode,
    ) -> DataResult<serde_json::Value> {
        let rendered = self.render(&placeholders.escaped_with(escape_json_str)?, mode)?;
        serde_json::from_str(&rendered).map_err(DataError::TemplateJson)
    }

    /// Substitute values quoted as CSV fields where needed
    ///
    /// Tokens are expected to stand for whole fields of the template.
    pub fn render_csv(
        &self,
        placeholders: &Placeholders,
        mode: SubstitutionMode,
    ) -> DataResult<String> {
        self.render(&placeholders.escaped_with(escape_csv_field)?, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn placeholders(pairs: &[(&str, &str)]) -> Placeholders {
        pairs
            .iter()
            .try_fold(Placeholders::new(), |p, (k, v)| p.with(k, *v))
            .unwrap()
    }

    #[test]
    fn test_bare_and_wrapped_names_are_the_same_token() {
        let p = placeholders(&[("SCHOOL_URN", "123456")]);
        assert_eq!(p.get("<<SCHOOL_URN>>"), Some("123456"));
        assert_eq!(p.get("SCHOOL_URN"), Some("123456"));
    }

    #[test_case("school_urn" ; "lowercase")]
    #[test_case("<<SCHOOL URN>>" ; "space")]
    #[test_case("" ; "empty")]
    fn test_invalid_token_names(name: &str) {
        let err = Placeholders::new().with(name, "x").unwrap_err();
        assert!(matches!(err, DataError::InvalidPlaceholder(_)));
    }

    #[test]
    fn test_value_containing_delimiter_rejected() {
        let err = Placeholders::new().with("A", "<<B>>").unwrap_err();
        assert!(matches!(err, DataError::PlaceholderCollision { .. }));
    }

    #[test]
    fn test_render_literal_replacement() {
        let template = Template::new("t", "<<A>>-<<B>>-<<A>>");
        let out = template
            .render(&placeholders(&[("A", "x.*"), ("B", "$1")]), SubstitutionMode::Strict)
            .unwrap();
        assert_eq!(out, "x.*-$1-x.*");
    }

    #[test]
    fn test_strict_rejects_unused_token() {
        let template = Template::new("t", "<<A>>");
        let err = template
            .render(&placeholders(&[("A", "1"), ("B", "2")]), SubstitutionMode::Strict)
            .unwrap_err();
        assert!(matches!(err, DataError::UnusedPlaceholder(ref t) if t == "<<B>>"));
    }

    #[test]
    fn test_strict_rejects_leftover_token() {
        let template = Template::new("t", "<<A>> <<C>> <<C>>");
        let err = template
            .render(&placeholders(&[("A", "1")]), SubstitutionMode::Strict)
            .unwrap_err();
        match err {
            DataError::UnresolvedPlaceholder(tokens) => assert_eq!(tokens, vec!["<<C>>"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_permissive_ignores_unused_and_leftover() {
        let template = Template::new("t", "<<A>> <<C>>");
        let out = template
            .render(&placeholders(&[("A", "1"), ("B", "2")]), SubstitutionMode::Permissive)
            .unwrap();
        assert_eq!(out, "1 <<C>>");
    }

    #[test]
    fn test_render_json_escapes_values() {
        let template = Template::new("t", r#"{"name": "<<NAME>>"}"#);
        let value = template
            .render_json(&placeholders(&[("NAME", "O\"Brien \\ Jr")]), SubstitutionMode::Strict)
            .unwrap();
        assert_eq!(value["name"], "O\"Brien \\ Jr");
    }

    #[test]
    fn test_render_json_reports_invalid_json() {
        let template = Template::new("t", r#"{"count": <<COUNT>>}"#);
        let err = template
            .render_json(&placeholders(&[("COUNT", "not a number")]), SubstitutionMode::Strict)
            .unwrap_err();
        assert!(matches!(err, DataError::TemplateJson(_)));
    }

    #[test_case("Test Academy", "Test Academy" ; "plain")]
    #[test_case("St Mary's, York", "\"St Mary's, York\"" ; "comma")]
    #[test_case("The \"Old\" School", "\"The \"\"Old\"\" School\"" ; "quotes")]
    #[test_case("Line\nbreak", "\"Line\nbreak\"" ; "newline")]
    #[test_case("", "" ; "empty")]
    fn test_escape_csv_field(value: &str, expected: &str) {
        assert_eq!(escape_csv_field(value).unwrap(), expected);
    }

    #[test]
    fn test_render_csv_keeps_columns_aligned() {
        let template = Template::new("t", "NAME,URN\n<<SCHOOL_NAME>>,<<SCHOOL_URN>>\n");
        let rendered = template
            .render_csv(
                &placeholders(&[("SCHOOL_NAME", "St Mary's, York"), ("SCHOOL_URN", "123456")]),
                SubstitutionMode::Strict,
            )
            .unwrap();

        let mut reader = csv::Reader::from_reader(rendered.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(&row[0], "St Mary's, York");
        assert_eq!(&row[1], "123456");
    }

    #[test]
    fn test_find_tokens_distinct_in_order() {
        assert_eq!(
            find_tokens("<<B>> <<A>> <<B>> <not> <<lower>>"),
            vec!["<<B>>", "<<A>>"]
        );
    }
}
