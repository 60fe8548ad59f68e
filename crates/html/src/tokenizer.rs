//! Markup tokenizer for rendered edit-view fragments.
//!
//! Tag names use the ASCII class `[A-Za-z0-9:_-]` and are lowercased. Attribute names run
//! until whitespace, `/`, `>` or `=` and are lowercased as well; values may be double-quoted,
//! single-quoted or bare.
//!
//! Known limitations (intentional):
//! - No rawtext handling for `<script>`/`<style>`; admin fragments never carry them.
//! - No parse-error recovery beyond skipping bytes that cannot start an attribute.
use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=' | b'"' | b'\''))
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

// Every scan stops at an ASCII byte, so returned offsets stay on char boundaries.
fn scan_while(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

fn scan_attr_value(input: &str, start: usize) -> (&str, usize) {
    let bytes = input.as_bytes();
    match bytes.get(start) {
        Some(&quote @ (b'"' | b'\'')) => {
            let body = start + 1;
            match memchr(quote, &bytes[body..]) {
                Some(rel) => (&input[body..body + rel], body + rel + 1),
                None => (&input[body..], bytes.len()),
            }
        }
        _ => {
            let end = scan_while(bytes, start, |b| !b.is_ascii_whitespace() && b != b'>');
            (&input[start..end], end)
        }
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            let decoded = decode_entities(&input[start..i]);
            if !decoded.is_empty() {
                out.push(Token::Text(decoded));
            }
            continue;
        }

        if input[i..].starts_with(COMMENT_START) {
            let body = i + COMMENT_START.len();
            match input[body..].find(COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body..body + end].to_string()));
                    i = body + end + COMMENT_END.len();
                    continue;
                }
                None => {
                    out.push(Token::Comment(input[body..].to_string()));
                    break;
                }
            }
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += 2 + end + 1;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'/') {
            let start = i + 2;
            let end = scan_while(bytes, start, is_tag_name_byte);
            let name = input[start..end].to_ascii_lowercase();
            i = memchr(b'>', &bytes[end..]).map_or(bytes.len(), |rel| end + rel + 1);
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            continue;
        }

        let start = i + 1;
        let end = scan_while(bytes, start, is_tag_name_byte);
        if end == start {
            // A `<` that cannot open a tag is literal text.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..end].to_ascii_lowercase();

        let mut attributes = Vec::new();
        let mut self_closing = false;
        let mut j = end;
        loop {
            j = skip_whitespace(bytes, j);
            let Some(&b) = bytes.get(j) else {
                break;
            };
            if b == b'>' {
                j += 1;
                break;
            }
            if b == b'/' {
                if bytes.get(j + 1) == Some(&b'>') {
                    self_closing = true;
                    j += 2;
                    break;
                }
                j += 1;
                continue;
            }
            let name_end = scan_while(bytes, j, is_attr_name_byte);
            if name_end == j {
                j += input[j..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            let attr_name = input[j..name_end].to_ascii_lowercase();
            j = skip_whitespace(bytes, name_end);
            if bytes.get(j) == Some(&b'=') {
                j = skip_whitespace(bytes, j + 1);
                let (raw, after) = scan_attr_value(input, j);
                attributes.push((attr_name, Some(decode_entities(raw))));
                j = after;
            } else {
                attributes.push((attr_name, None));
            }
        }

        out.push(Token::StartTag {
            name,
            attributes,
            self_closing,
        });
        i = j;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn tokenizes_row_markup() {
        let tokens = tokenize(r#"<LI><input name="sections.0.title" disabled>Hi</li>"#);
        assert_eq!(
            tokens,
            vec![
                start("li", &[], false),
                start(
                    "input",
                    &[("name", Some("sections.0.title")), ("disabled", None)],
                    false
                ),
                Token::Text("Hi".to_string()),
                Token::EndTag("li".to_string()),
            ]
        );
    }

    #[test]
    fn handles_quotes_self_closing_and_comments() {
        let tokens = tokenize(r#"<!-- x --><path d='M1 2' class=icon /><br/>"#);
        assert_eq!(
            tokens,
            vec![
                Token::Comment(" x ".to_string()),
                start("path", &[("d", Some("M1 2")), ("class", Some("icon"))], true),
                start("br", &[], true),
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let tokens = tokenize("a < b");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a ".to_string()),
                Token::Text("<".to_string()),
                Token::Text(" b".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_attribute_value_runs_to_end() {
        let tokens = tokenize(r#"<span title="open"#);
        assert_eq!(tokens, vec![start("span", &[("title", Some("open"))], false)]);
    }
}
