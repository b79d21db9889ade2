//! Prompt templates with a single `{prompt_text}` placeholder.
//!
//! Templates are parsed once, before any row is read, so a bad template is a
//! startup error instead of a failure repeated on every row. `{{` and `}}`
//! produce literal braces.

use crate::result::{PromptbenchError, PromptbenchResult};

/// Name of the only placeholder a template may use.
pub const PLACEHOLDER: &str = "prompt_text";

/// Template used by the Claude runner when none is given.
pub const DEFAULT_SUMMARY_TEMPLATE: &str =
    "Analyze the following text and provide a concise summary: {prompt_text}";

/// Template that sends the prompt unchanged.
pub const PASSTHROUGH_TEMPLATE: &str = "{prompt_text}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Prompt,
}

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse and validate a template.
    ///
    /// Fails when the template has no `{prompt_text}`, names any other
    /// placeholder, or has an unmatched brace.
    pub fn parse(template: &str) -> PromptbenchResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(PromptbenchError::template("unclosed '{'"));
                    }
                    if name != PLACEHOLDER {
                        return Err(PromptbenchError::template(format!(
                            "unknown placeholder '{{{name}}}', only {{{PLACEHOLDER}}} is supported"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Prompt);
                }
                '}' => {
                    return Err(PromptbenchError::template(
                        "single '}' encountered, use '}}' for a literal brace",
                    ));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.contains(&Segment::Prompt) {
            return Err(PromptbenchError::template(format!(
                "missing {{{PLACEHOLDER}}} placeholder"
            )));
        }
        Ok(Self { segments })
    }

    /// Substitute the prompt text into every placeholder.
    #[must_use]
    pub fn render(&self, prompt_text: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Prompt => out.push_str(prompt_text),
            }
        }
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            segments: vec![Segment::Prompt],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let t = PromptTemplate::parse(PASSTHROUGH_TEMPLATE).unwrap();
        assert_eq!(t.render("Hello"), "Hello");
        assert_eq!(t, PromptTemplate::default());
    }

    #[test]
    fn test_default_summary_template() {
        let t = PromptTemplate::parse(DEFAULT_SUMMARY_TEMPLATE).unwrap();
        assert_eq!(
            t.render("the sky is blue"),
            "Analyze the following text and provide a concise summary: the sky is blue"
        );
    }

    #[test]
    fn test_placeholder_repeated() {
        let t = PromptTemplate::parse("{prompt_text} / {prompt_text}").unwrap();
        assert_eq!(t.render("x"), "x / x");
    }

    #[test]
    fn test_escaped_braces() {
        let t = PromptTemplate::parse("{{\"q\": \"{prompt_text}\"}}").unwrap();
        assert_eq!(t.render("hi"), "{\"q\": \"hi\"}");
    }

    #[test]
    fn test_prompt_braces_not_reinterpreted() {
        let t = PromptTemplate::parse("Q: {prompt_text}").unwrap();
        assert_eq!(t.render("{prompt_text}"), "Q: {prompt_text}");
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let err = PromptTemplate::parse("Summarize this").unwrap_err();
        assert!(err.to_string().contains("missing {prompt_text}"));
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = PromptTemplate::parse("{prompt_text} in {language}").unwrap_err();
        assert!(err.to_string().contains("{language}"));
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(PromptTemplate::parse("{prompt_text").is_err());
        assert!(PromptTemplate::parse("{prompt_text} }").is_err());
    }
}
