use crate::error::BackendError;

/// A piece of template source: literal text or the body of a `<% %>` tag.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Segment<'a> {
    Text(String),
    Directive { body: &'a str, offset: usize },
}

/// Splits template source into text and directive segments, applying
/// whitespace slurping.
///
/// `<%_` removes spaces and tabs immediately before the tag; `_%>` removes
/// spaces and tabs after it together with one line break, and `-%>` removes a
/// single line break.
pub(super) fn scan(source: &str) -> Result<Vec<Segment<'_>>, BackendError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut cursor = 0usize;

    while let Some(found) = source[cursor..].find("<%") {
        let open = cursor + found;
        text.push_str(&source[cursor..open]);

        let mut body_start = open + 2;
        if source[body_start..].starts_with('_') {
            body_start += 1;
            let kept = text.trim_end_matches([' ', '\t']).len();
            text.truncate(kept);
        }

        let Some(close_rel) = source[body_start..].find("%>") else {
            return Err(BackendError::Syntax {
                offset: open,
                message: "unclosed directive tag".to_string(),
            });
        };
        let close = body_start + close_rel;

        let (body_end, slurp) = match source[body_start..close].chars().last() {
            Some('_') => (close - 1, Slurp::WhitespaceAndNewline),
            Some('-') => (close - 1, Slurp::Newline),
            _ => (close, Slurp::Nothing),
        };

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        segments.push(Segment::Directive {
            body: source[body_start..body_end.max(body_start)].trim(),
            offset: open,
        });

        cursor = slurp.skip(source, close + 2);
    }

    text.push_str(&source[cursor..]);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

enum Slurp {
    Nothing,
    Newline,
    WhitespaceAndNewline,
}

impl Slurp {
    /// Returns the position after whatever this closing tag swallows.
    fn skip(&self, source: &str, mut at: usize) -> usize {
        if matches!(self, Slurp::WhitespaceAndNewline) {
            let rest = &source[at..];
            at += rest.len() - rest.trim_start_matches([' ', '\t']).len();
        }
        if matches!(self, Slurp::Nothing) {
            return at;
        }
        let rest = &source[at..];
        if rest.starts_with("\r\n") {
            at + 2
        } else if rest.starts_with('\n') {
            at + 1
        } else {
            at
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment<'_>]) -> Vec<String> {
        segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => format!("T:{t}"),
                Segment::Directive { body, .. } => format!("D:{body}"),
            })
            .collect()
    }

    #[test]
    fn slurping_tags_swallow_surrounding_whitespace() {
        let segments = scan("a  \t<%_ if (true) { _%>  \nbody\n<%_ } _%>\ntail").unwrap();
        assert_eq!(
            texts(&segments),
            vec!["T:a", "D:if (true) {", "T:body\n", "D:}", "T:tail"]
        );
    }

    #[test]
    fn plain_tags_keep_whitespace() {
        let segments = scan("a <% x %>\nb").unwrap();
        assert_eq!(texts(&segments), vec!["T:a ", "D:x", "T:\nb"]);
    }

    #[test]
    fn unclosed_tag_is_a_syntax_error() {
        let err = scan("text <%_ if (true) {").unwrap_err();
        assert!(matches!(err, BackendError::Syntax { offset: 5, .. }));
    }
}
