//! Markup fragment parser.
//!
//! Turns a markup string into exactly one detached document node:
//! - Elements with quoted, unquoted and boolean attributes
//! - Void elements (`img`, `input`, `br`, ...) and self-closing `<x/>`
//! - Comments and doctypes (dropped)
//! - Character references in text and attribute values
//!
//! Parsing is two-phase. The tokenizer and tree builder are pure, and nodes are
//! only allocated in the document once the fragment is known to be well formed,
//! so a failed parse never leaves orphan nodes behind.

use tracing::trace;

use super::entities::decode;
use crate::dom::{with_document_mut, Document};
use crate::error::{BoardError, Result};
use crate::types::{NodeId, NodeKind};

/// Elements that never have content or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Deepest element nesting a fragment may have.
pub const MAX_DEPTH: usize = 256;

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open {
        tag: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    Close(String),
    Text(String),
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn consume(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Take characters while `pred` holds.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.consume(end);
        &rest[..end]
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while self.pos < self.src.len() {
            if let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .ok_or_else(|| BoardError::malformed("unterminated comment"))?;
            self.consume(4 + end + 3);
            return Ok(None);
        }

        if rest.starts_with("<!") {
            let end = rest
                .find('>')
                .ok_or_else(|| BoardError::malformed("unterminated declaration"))?;
            self.consume(end + 1);
            return Ok(None);
        }

        if rest.starts_with("</") {
            let end = rest
                .find('>')
                .ok_or_else(|| BoardError::malformed("unterminated closing tag"))?;
            let name = rest[2..end].trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(BoardError::malformed("empty closing tag"));
            }
            self.consume(end + 1);
            return Ok(Some(Token::Close(name)));
        }

        if starts_tag(rest) {
            return self.open_tag().map(Some);
        }

        // Text up to the next thing that looks like markup
        let mut end = rest.len();
        for (i, _) in rest.match_indices('<').filter(|&(i, _)| i > 0) {
            let tail = &rest[i..];
            if starts_tag(tail) || tail.starts_with("</") || tail.starts_with("<!") {
                end = i;
                break;
            }
        }
        self.consume(end);
        Ok(Some(Token::Text(decode(&rest[..end]))))
    }

    fn open_tag(&mut self) -> Result<Token> {
        self.consume(1);
        let tag = self
            .take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':')
            .to_ascii_lowercase();

        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(BoardError::malformed(format!("unterminated <{tag}> tag")));
            }
            if rest.starts_with("/>") {
                self.consume(2);
                return Ok(Token::Open { tag, attrs, self_closing: true });
            }
            if rest.starts_with('>') {
                self.consume(1);
                return Ok(Token::Open { tag, attrs, self_closing: false });
            }

            let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\''));
            if name.is_empty() {
                return Err(BoardError::malformed(format!(
                    "unexpected character in <{tag}> tag"
                )));
            }
            let name = name.to_string();

            self.skip_whitespace();
            let value = if self.peek() == Some('=') {
                self.consume(1);
                self.skip_whitespace();
                self.attribute_value(&tag)?
            } else {
                String::new()
            };
            attrs.push((name, value));
        }
    }

    fn attribute_value(&mut self, tag: &str) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.consume(1);
                let rest = self.rest();
                let end = rest.find(quote).ok_or_else(|| {
                    BoardError::malformed(format!("unterminated attribute value in <{tag}> tag"))
                })?;
                self.consume(end + 1);
                Ok(decode(&rest[..end]))
            }
            Some(_) => {
                let raw = self.take_while(|c| !c.is_whitespace() && c != '>');
                Ok(decode(raw))
            }
            None => Err(BoardError::malformed(format!("unterminated <{tag}> tag"))),
        }
    }
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

// =============================================================================
// Tree building
// =============================================================================

/// A parsed node that has not been allocated in the document yet.
#[derive(Debug, Clone, PartialEq)]
enum Parsed {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Parsed>,
    },
    Text(String),
}

struct Frame {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Parsed>,
}

fn build(tokens: Vec<Token>) -> Result<Vec<Parsed>> {
    let mut top: Vec<Parsed> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    fn push(stack: &mut [Frame], top: &mut Vec<Parsed>, node: Parsed) -> Result<()> {
        match stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => match node {
                Parsed::Text(text) if text.trim().is_empty() => {}
                Parsed::Text(_) => {
                    return Err(BoardError::malformed("text outside of the root element"));
                }
                element => top.push(element),
            },
        }
        Ok(())
    }

    for token in tokens {
        match token {
            Token::Open { tag, attrs, self_closing } => {
                if self_closing || is_void(&tag) {
                    let node = Parsed::Element { tag, attrs, children: Vec::new() };
                    push(&mut stack, &mut top, node)?;
                } else if stack.len() >= MAX_DEPTH {
                    return Err(BoardError::malformed(format!(
                        "elements nested deeper than {MAX_DEPTH}"
                    )));
                } else {
                    stack.push(Frame { tag, attrs, children: Vec::new() });
                }
            }
            Token::Close(tag) => {
                if is_void(&tag) {
                    continue;
                }
                match stack.pop() {
                    Some(frame) if frame.tag == tag => {
                        let node = Parsed::Element {
                            tag: frame.tag,
                            attrs: frame.attrs,
                            children: frame.children,
                        };
                        push(&mut stack, &mut top, node)?;
                    }
                    Some(frame) => {
                        return Err(BoardError::malformed(format!(
                            "</{tag}> closes <{}>",
                            frame.tag
                        )));
                    }
                    None => {
                        return Err(BoardError::malformed(format!("unexpected </{tag}>")));
                    }
                }
            }
            Token::Text(text) => push(&mut stack, &mut top, Parsed::Text(text))?,
        }
    }

    if let Some(frame) = stack.last() {
        return Err(BoardError::malformed(format!("unclosed <{}>", frame.tag)));
    }
    Ok(top)
}

/// Allocate one parsed node, handing back its unallocated children.
fn allocate_node(doc: &mut Document, parsed: Parsed) -> (NodeId, Vec<Parsed>) {
    match parsed {
        Parsed::Text(text) => (doc.allocate(NodeKind::Text(text)), Vec::new()),
        Parsed::Element { tag, attrs, children } => {
            (doc.allocate(NodeKind::Element { tag, attrs }), children)
        }
    }
}

fn allocate(parsed: Parsed) -> NodeId {
    with_document_mut(|doc| {
        let (root, children) = allocate_node(doc, parsed);
        let mut pending: Vec<(NodeId, Parsed)> =
            children.into_iter().rev().map(|child| (root, child)).collect();

        // Children are pushed in reverse so siblings are appended in order
        while let Some((parent, parsed)) = pending.pop() {
            let (id, children) = allocate_node(doc, parsed);
            doc.append_child(parent, id);
            pending.extend(children.into_iter().rev().map(|child| (id, child)));
        }
        root
    })
}

// =============================================================================
// Public API
// =============================================================================

/// Parse a markup fragment into one detached node.
///
/// # Errors
///
/// `MalformedMarkup` if the fragment has zero or several top-level elements,
/// stray top-level text, or unbalanced/unterminated tags.
///
/// # Example
///
/// ```
/// use trip_board::{dom, markup};
///
/// let node = markup::create_element("<p class=\"event__price\">&euro;&nbsp;20</p>").unwrap();
/// assert_eq!(dom::tag(node).as_deref(), Some("p"));
/// assert_eq!(dom::parent(node), None);
/// ```
pub fn create_element(markup: &str) -> Result<NodeId> {
    let tokens = Tokenizer::new(markup).tokenize()?;
    let mut roots = build(tokens)?;

    let root = match roots.len() {
        0 => return Err(BoardError::malformed("no root element")),
        1 => roots.remove(0),
        n => return Err(BoardError::malformed(format!("{n} root elements, expected one"))),
    };

    let id = allocate(root);
    trace!(node = %id, "materialized markup");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, reset_document};

    fn setup() {
        reset_document();
    }

    fn is_malformed(result: Result<NodeId>) -> bool {
        matches!(result, Err(BoardError::MalformedMarkup { .. }))
    }

    #[test]
    fn test_single_root() {
        setup();
        let node = create_element("<li class=\"trip-events__item\"><div class=\"event\">x</div></li>").unwrap();
        assert_eq!(dom::tag(node).as_deref(), Some("li"));
        assert!(dom::has_class(node, "trip-events__item"));
        assert_eq!(dom::children(node).len(), 1);
        assert_eq!(dom::parent(node), None);
        assert!(!dom::is_connected(node));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        setup();
        let node = create_element("\n   <p>hi</p>\n  ").unwrap();
        assert_eq!(dom::text_content(node), "hi");
    }

    #[test]
    fn test_empty_is_malformed() {
        setup();
        assert!(is_malformed(create_element("")));
        assert!(is_malformed(create_element("   \n\t ")));
        assert!(is_malformed(create_element("just text")));
        assert!(is_malformed(create_element("<!-- only a comment -->")));
    }

    #[test]
    fn test_two_roots_is_malformed() {
        setup();
        assert!(is_malformed(create_element("<p>a</p><p>b</p>")));
        assert!(is_malformed(create_element("<p>a</p> trailing")));
    }

    #[test]
    fn test_unbalanced_is_malformed() {
        setup();
        assert!(is_malformed(create_element("<div><span></div>")));
        assert!(is_malformed(create_element("<div>")));
        assert!(is_malformed(create_element("</div>")));
        assert!(is_malformed(create_element("<div class=\"x>")));
        assert!(is_malformed(create_element("<div")));
    }

    #[test]
    fn test_failure_allocates_nothing() {
        setup();
        let before = dom::node_count();
        let _ = create_element("<ul><li>one</li></ul><ul></ul>");
        let _ = create_element("<ul><li>one</ul>");
        assert_eq!(dom::node_count(), before);
    }

    #[test]
    fn test_nesting_limit() {
        setup();
        let nested = |depth: usize| "<div>".repeat(depth) + &"</div>".repeat(depth);

        let deepest = create_element(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(dom::tag(deepest).as_deref(), Some("div"));
        assert_eq!(crate::markup::serialize(deepest), nested(MAX_DEPTH));

        let before = dom::node_count();
        assert!(is_malformed(create_element(&nested(MAX_DEPTH + 1))));
        assert!(is_malformed(create_element(&nested(10_000))));
        assert_eq!(dom::node_count(), before);
    }

    #[test]
    fn test_void_and_self_closing() {
        setup();
        let node = create_element(
            "<div><img src=\"img/icons/taxi.png\" alt=\"icon\"><input type=checkbox checked>\
             <svg viewBox=\"0 0 28 28\"><path d=\"M14 21z\"/></svg></div>",
        )
        .unwrap();
        let children = dom::children(node);
        assert_eq!(children.len(), 3);
        assert_eq!(dom::tag(children[0]).as_deref(), Some("img"));
        assert_eq!(dom::attribute(children[1], "type").as_deref(), Some("checkbox"));
        assert_eq!(dom::attribute(children[1], "checked").as_deref(), Some(""));
        assert_eq!(dom::attribute(children[2], "viewBox").as_deref(), Some("0 0 28 28"));
        assert_eq!(dom::children(children[2]).len(), 1);
    }

    #[test]
    fn test_entities_decoded() {
        setup();
        let node = create_element("<p title=\"A &amp; B\">&plus;&euro;&nbsp;<span>30</span></p>").unwrap();
        assert_eq!(dom::attribute(node, "title").as_deref(), Some("A & B"));
        assert_eq!(dom::text_content(node), "+€\u{a0}30");
    }

    #[test]
    fn test_comments_dropped() {
        setup();
        let node = create_element("<ul><!-- offers --><li>a</li></ul>").unwrap();
        assert_eq!(dom::children(node).len(), 1);
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        setup();
        let node = create_element("<p>1 < 2</p>").unwrap();
        assert_eq!(dom::text_content(node), "1 < 2");
    }

    #[test]
    fn test_tags_are_lowercased() {
        setup();
        let node = create_element("<DIV><Span>x</SPAN></div>").unwrap();
        assert_eq!(dom::tag(node).as_deref(), Some("div"));
        assert_eq!(dom::tag(dom::children(node)[0]).as_deref(), Some("span"));
    }
}
