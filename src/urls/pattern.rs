use regex::Regex;
use std::collections::HashMap;

use crate::exception::{Error, Result};

/// A compiled route pattern.
///
/// Patterns are written without a leading slash, the way URL tables are
/// written in the project (`"login/"`, `"admin/"`, `""`). Placeholders:
///
/// - `{name}` matches one path segment
/// - `{name:path}` matches the remainder of the path, slashes included
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: Regex,
	param_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
	Literal(String),
	Param { name: String, greedy: bool },
}

impl PathPattern {
	/// Compile a pattern.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::urls::PathPattern;
	///
	/// let pattern = PathPattern::new("static/{path:path}").unwrap();
	/// let params = pattern.matches("/static/css/canvas.css").unwrap();
	/// assert_eq!(params["path"], "css/canvas.css");
	///
	/// let root = PathPattern::new("").unwrap();
	/// assert!(root.matches("/").is_some());
	/// assert!(root.matches("/login/").is_none());
	/// ```
	pub fn new(pattern: &str) -> Result<Self> {
		let pattern = pattern.trim_start_matches('/').to_string();
		let segments = parse(&pattern)?;

		let mut regex_src = String::from("^/");
		let mut param_names = Vec::new();
		for segment in &segments {
			match segment {
				Segment::Literal(text) => regex_src.push_str(&regex::escape(text)),
				Segment::Param { name, greedy } => {
					if param_names.contains(name) {
						return Err(Error::ImproperlyConfigured(format!(
							"duplicate parameter '{}' in pattern '{}'",
							name, pattern
						)));
					}
					let class = if *greedy { ".+" } else { "[^/]+" };
					regex_src.push_str(&format!("(?P<{}>{})", name, class));
					param_names.push(name.clone());
				}
			}
		}
		regex_src.push('$');

		let regex = Regex::new(&regex_src).map_err(|e| {
			Error::ImproperlyConfigured(format!("invalid pattern '{}': {}", pattern, e))
		})?;

		Ok(Self {
			pattern,
			regex,
			param_names,
		})
	}

	/// The pattern as written, without leading slash.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Match an absolute request path, returning captured parameters.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| {
					captures
						.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect(),
		)
	}

	/// Build an absolute path from the pattern and parameter values.
	pub fn expand(&self, params: &HashMap<String, String>) -> Result<String> {
		let mut path = String::from("/");
		for segment in parse(&self.pattern)? {
			match segment {
				Segment::Literal(text) => path.push_str(&text),
				Segment::Param { name, greedy } => {
					let value = params.get(&name).ok_or_else(|| {
						Error::NoReverseMatch(format!("{} (missing parameter '{}')", self.pattern, name))
					})?;
					if value.is_empty() || (!greedy && value.contains('/')) {
						return Err(Error::NoReverseMatch(format!(
							"{} (invalid value for '{}')",
							self.pattern, name
						)));
					}
					path.push_str(value);
				}
			}
		}
		Ok(path)
	}
}

fn parse(pattern: &str) -> Result<Vec<Segment>> {
	let mut segments = Vec::new();
	let mut literal = String::new();
	let mut chars = pattern.chars();

	while let Some(c) = chars.next() {
		match c {
			'{' => {
				if !literal.is_empty() {
					segments.push(Segment::Literal(std::mem::take(&mut literal)));
				}
				let mut inner = String::new();
				let mut closed = false;
				for c in chars.by_ref() {
					if c == '}' {
						closed = true;
						break;
					}
					inner.push(c);
				}
				if !closed {
					return Err(Error::ImproperlyConfigured(format!(
						"unclosed placeholder in pattern '{}'",
						pattern
					)));
				}
				segments.push(parse_param(&inner, pattern)?);
			}
			'}' => {
				return Err(Error::ImproperlyConfigured(format!(
					"unexpected '}}' in pattern '{}'",
					pattern
				)));
			}
			_ => literal.push(c),
		}
	}
	if !literal.is_empty() {
		segments.push(Segment::Literal(literal));
	}
	Ok(segments)
}

fn parse_param(inner: &str, pattern: &str) -> Result<Segment> {
	let (name, converter) = match inner.split_once(':') {
		Some((name, converter)) => (name, Some(converter)),
		None => (inner, None),
	};

	let valid_name = !name.is_empty()
		&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
		&& !name.starts_with(|c: char| c.is_ascii_digit());
	if !valid_name {
		return Err(Error::ImproperlyConfigured(format!(
			"invalid parameter name '{}' in pattern '{}'",
			name, pattern
		)));
	}

	let greedy = match converter {
		None | Some("str") => false,
		Some("path") => true,
		Some(other) => {
			return Err(Error::ImproperlyConfigured(format!(
				"unknown converter '{}' in pattern '{}'",
				other, pattern
			)));
		}
	};

	Ok(Segment::Param {
		name: name.to_string(),
		greedy,
	})
}
