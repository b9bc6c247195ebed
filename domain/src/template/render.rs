//! Strict `{{ name }}` substitution for step commands
//!
//! The rendered string is handed to `sh -c` verbatim. Values are not
//! escaped, so the command template is the trust boundary: a runbook author
//! who interpolates caller input into shell syntax owns the quoting.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("undefined placeholder(s): {}", .0.join(", "))]
    Undefined(Vec<String>),

    #[error("malformed placeholder at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, RenderError> {
    let mut segments = Vec::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        let body_start = open + 2;
        let Some(close) = rest[body_start..].find("}}") else {
            return Err(RenderError::Malformed {
                offset: offset + open,
                reason: "unclosed '{{'".to_string(),
            });
        };
        let body = rest[body_start..body_start + close].trim();
        if !is_identifier(body) {
            return Err(RenderError::Malformed {
                offset: offset + open,
                reason: format!("'{}' is not a parameter name", body),
            });
        }
        segments.push(Segment::Placeholder(body));

        let consumed = body_start + close + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

/// Parameter names referenced by `template`, in order of first appearance
pub fn placeholders(template: &str) -> Result<Vec<&str>, RenderError> {
    let mut names: Vec<&str> = Vec::new();
    for segment in parse(template)? {
        if let Segment::Placeholder(name) = segment
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    Ok(names)
}

/// Substitute every placeholder in `template` from `parameters`.
///
/// Fails if any placeholder is unbound; nothing is ever replaced with an
/// empty string. Substituted values are not scanned again.
pub fn render_command(
    template: &str,
    parameters: &HashMap<String, String>,
) -> Result<String, RenderError> {
    let segments = parse(template)?;

    let mut undefined: Vec<String> = Vec::new();
    for segment in &segments {
        if let Segment::Placeholder(name) = segment
            && !parameters.contains_key(*name)
            && !undefined.iter().any(|u| u == name)
        {
            undefined.push(name.to_string());
        }
    }
    if !undefined.is_empty() {
        return Err(RenderError::Undefined(undefined));
    }

    let mut rendered = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Placeholder(name) => {
                if let Some(value) = parameters.get(name) {
                    rendered.push_str(value);
                }
            }
        }
    }
    Ok(rendered)
}
