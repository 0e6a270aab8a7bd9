//! Template lexer and block parser
//!
//! Turns template source into a flat instruction sequence. Blocks are matched
//! in a single left-to-right pass: an opening `{{#if}}`/`{{#each}}` is closed
//! by the first closing tag of the same kind. An `{{#if}}` body may hold
//! `{{#each}}` blocks; no other nesting is supported, and other directive
//! markup inside a body is kept as literal text. Anything that does not lex
//! as a placeholder or a complete block is emitted verbatim.

/// Block directive kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Each,
}

impl BlockKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(BlockKind::If),
            "each" => Some(BlockKind::Each),
            _ => None,
        }
    }
}

/// One instruction of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted as-is
    Text(String),

    /// `{{path}}` placeholder
    Variable(String),

    /// `{{.}}` inside an `{{#each}}` body
    CurrentItem,

    /// `{{#if path}}...{{/if}}`
    If { path: String, body: Vec<Node> },

    /// `{{#each path}}...{{/each}}`
    Each { path: String, body: Vec<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Variable {
        path: &'a str,
        raw: &'a str,
    },
    Dot(&'a str),
    Open {
        kind: BlockKind,
        path: &'a str,
        raw: &'a str,
    },
    Close {
        kind: BlockKind,
        raw: &'a str,
    },
}

impl<'a> Token<'a> {
    fn raw(&self) -> &'a str {
        match *self {
            Token::Text(raw) | Token::Dot(raw) => raw,
            Token::Variable { raw, .. } | Token::Open { raw, .. } | Token::Close { raw, .. } => raw,
        }
    }
}

/// Where a token sequence sits, which decides the blocks it may open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Template,
    IfBody,
    EachBody,
}

impl Scope {
    fn opens(self, kind: BlockKind) -> bool {
        match self {
            Scope::Template => true,
            Scope::IfBody => kind == BlockKind::Each,
            Scope::EachBody => false,
        }
    }
}

/// Parse template source into instructions.
pub fn parse(source: &str) -> Vec<Node> {
    parse_tokens(&tokenize(source), Scope::Template)
}

fn parse_tokens(tokens: &[Token<'_>], scope: Scope) -> Vec<Node> {
    let if_closes = close_positions(tokens, BlockKind::If);
    let each_closes = close_positions(tokens, BlockKind::Each);
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Text(text) => push_text(&mut nodes, text),
            Token::Variable { path, .. } => nodes.push(Node::Variable(path.to_string())),
            Token::Dot(_) if scope == Scope::EachBody => nodes.push(Node::CurrentItem),
            Token::Open { kind, path, raw } if scope.opens(kind) => {
                let closes = match kind {
                    BlockKind::If => &if_closes,
                    BlockKind::Each => &each_closes,
                };
                let next = closes.partition_point(|&c| c <= i);

                match closes.get(next) {
                    Some(&close) => {
                        let path = path.to_string();
                        nodes.push(match kind {
                            BlockKind::If => Node::If {
                                path,
                                body: parse_tokens(&tokens[i + 1..close], Scope::IfBody),
                            },
                            BlockKind::Each => Node::Each {
                                path,
                                body: parse_tokens(&tokens[i + 1..close], Scope::EachBody),
                            },
                        });
                        i = close + 1;
                        continue;
                    }
                    None => push_text(&mut nodes, raw),
                }
            }
            other => push_text(&mut nodes, other.raw()),
        }
        i += 1;
    }

    nodes
}

/// Indices of every closing tag of `kind`, in order.
fn close_positions(tokens: &[Token<'_>], kind: BlockKind) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t, Token::Close { kind: k, .. } if *k == kind))
        .map(|(i, _)| i)
        .collect()
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(found) = source[pos..].find("{{") {
        let open = pos + found;
        let inner_start = open + 2;

        let Some(close_rel) = source[inner_start..].find("}}") else {
            break;
        };
        let inner_end = inner_start + close_rel;
        let tag_end = inner_end + 2;
        let inner = &source[inner_start..inner_end];

        // No tag contains `{`, so of the `{{` that share this `}}` only the
        // last one can start a tag. This keeps brace runs linear and still
        // finds the placeholder in `{{{name}}}`.
        if let Some(brace) = inner.rfind('{') {
            let brace = inner_start + brace;
            pos = if source.as_bytes()[brace - 1] == b'{' {
                brace - 1
            } else {
                brace
            };
            continue;
        }

        if let Some(token) = classify(inner, &source[open..tag_end]) {
            if text_start < open {
                tokens.push(Token::Text(&source[text_start..open]));
            }
            tokens.push(token);
            text_start = tag_end;
        }
        pos = tag_end;
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }

    tokens
}

fn classify<'a>(inner: &'a str, raw: &'a str) -> Option<Token<'a>> {
    let trimmed = inner.trim();

    if let Some(directive) = trimmed.strip_prefix('#') {
        let (keyword, rest) = directive.split_once(char::is_whitespace)?;
        let kind = BlockKind::from_keyword(keyword)?;
        let path = rest.trim();
        return is_valid_path(path).then_some(Token::Open { kind, path, raw });
    }

    if let Some(keyword) = trimmed.strip_prefix('/') {
        let kind = BlockKind::from_keyword(keyword.trim())?;
        return Some(Token::Close { kind, raw });
    }

    if trimmed == "." {
        return Some(Token::Dot(raw));
    }

    is_valid_path(trimmed).then_some(Token::Variable { path: trimmed, raw })
}

/// Dot-separated, non-empty segments of ASCII alphanumerics, `_` or `-`.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn var(s: &str) -> Node {
        Node::Variable(s.to_string())
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse("no placeholders here"), vec![text("no placeholders here")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_variables() {
        assert_eq!(
            parse("Hi {{user.name}}, total: {{ order.total }}"),
            vec![
                text("Hi "),
                var("user.name"),
                text(", total: "),
                var("order.total"),
            ]
        );
    }

    #[test]
    fn test_parse_if_block() {
        assert_eq!(
            parse("{{#if vip}}VIP {{name}}{{/if}} customer"),
            vec![
                Node::If {
                    path: "vip".to_string(),
                    body: vec![text("VIP "), var("name")],
                },
                text(" customer"),
            ]
        );
    }

    #[test]
    fn test_parse_each_block_with_current_item() {
        assert_eq!(
            parse("{{#each tags}}[{{.}}]{{/each}}"),
            vec![Node::Each {
                path: "tags".to_string(),
                body: vec![text("["), Node::CurrentItem, text("]")],
            }]
        );
    }

    #[test]
    fn test_dot_outside_each_is_literal() {
        assert_eq!(parse("a {{.}} b"), vec![text("a {{.}} b")]);
        assert_eq!(
            parse("{{#if x}}{{.}}{{/if}}"),
            vec![Node::If {
                path: "x".to_string(),
                body: vec![text("{{.}}")],
            }]
        );
    }

    #[test]
    fn test_unclosed_block_is_literal() {
        assert_eq!(
            parse("{{#if vip}}VIP {{name}}"),
            vec![text("{{#if vip}}VIP "), var("name")]
        );
    }

    #[test]
    fn test_malformed_directives_are_literal() {
        assert_eq!(parse("{{#if}}x{{/if}}"), vec![text("{{#if}}x{{/if}}")]);
        assert_eq!(parse("{{#unless a}}x"), vec![text("{{#unless a}}x")]);
        assert_eq!(parse("{{/each}}"), vec![text("{{/each}}")]);
        assert_eq!(parse("{{bad path}}"), vec![text("{{bad path}}")]);
        assert_eq!(parse("{{a..b}}"), vec![text("{{a..b}}")]);
        assert_eq!(parse("open {{ never closed"), vec![text("open {{ never closed")]);
    }

    #[test]
    fn test_first_close_tag_wins() {
        assert_eq!(
            parse("{{#if a}}X{{#if b}}Y{{/if}}Z{{/if}}"),
            vec![
                Node::If {
                    path: "a".to_string(),
                    body: vec![text("X{{#if b}}Y")],
                },
                text("Z{{/if}}"),
            ]
        );
    }

    #[test]
    fn test_close_tag_of_other_kind_does_not_close() {
        assert_eq!(
            parse("{{#each xs}}{{/if}}{{name}}{{/each}}"),
            vec![Node::Each {
                path: "xs".to_string(),
                body: vec![text("{{/if}}"), var("name")],
            }]
        );
    }

    #[test]
    fn test_triple_braces_find_inner_placeholder() {
        assert_eq!(parse("{{{name}}}"), vec![text("{"), var("name"), text("}")]);
        assert_eq!(parse("{{é{{name}}"), vec![text("{{é"), var("name")]);
        assert_eq!(parse("{{é{name}}"), vec![text("{{é{name}}")]);
    }

    #[test]
    fn test_long_brace_run_is_literal() {
        let source = format!("{}}}}}", "{".repeat(65_000));
        let started = std::time::Instant::now();

        assert_eq!(parse(&source), vec![text(&source)]);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        let unclosed = "{{#if a}}".repeat(10_000);
        assert_eq!(parse(&unclosed), vec![text(&unclosed)]);
    }

    #[test]
    fn test_if_body_holds_each_block() {
        assert_eq!(
            parse("{{#if items}}<ul>{{#each items}}<li>{{name}}</li>{{/each}}</ul>{{/if}}"),
            vec![Node::If {
                path: "items".to_string(),
                body: vec![
                    text("<ul>"),
                    Node::Each {
                        path: "items".to_string(),
                        body: vec![text("<li>"), var("name"), text("</li>")],
                    },
                    text("</ul>"),
                ],
            }]
        );
    }

    #[test]
    fn test_each_body_keeps_directives_literal() {
        assert_eq!(
            parse("{{#each xs}}{{#if a}}{{.}}{{/if}}{{/each}}"),
            vec![Node::Each {
                path: "xs".to_string(),
                body: vec![text("{{#if a}}"), Node::CurrentItem, text("{{/if}}")],
            }]
        );
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("booking"));
        assert!(is_valid_path("booking.customer_name"));
        assert!(is_valid_path("order-id.total2"));
        assert!(!is_valid_path(""));
        assert!(!is_valid_path(".a"));
        assert!(!is_valid_path("a."));
        assert!(!is_valid_path("a b"));
        assert!(!is_valid_path("#if"));
    }
}
