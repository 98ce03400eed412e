use super::{Document, ElementId};
use crate::error::MarkupError;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeBody {
    #[default]
    Empty,
    Text(String),
    Inner(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub body: NodeBody,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            body: NodeBody::Empty,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = NodeBody::Text(text.into());
        self
    }

    /// Raw inner markup. Inserted as given; nothing is sanitized.
    pub fn inner(mut self, markup: impl Into<String>) -> Self {
        self.body = NodeBody::Inner(markup.into());
        self
    }

    /// Appends a rendered child to the inner markup.
    pub fn child(mut self, child: &NodeSpec) -> Self {
        let rendered = render_to_markup(child);
        self.body = match self.body {
            NodeBody::Empty => NodeBody::Inner(rendered),
            NodeBody::Text(text) => NodeBody::Inner(escape(&text) + &rendered),
            NodeBody::Inner(inner) => NodeBody::Inner(inner + &rendered),
        };
        self
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_to_markup(spec: &NodeSpec) -> String {
    let tag = spec.tag.to_ascii_lowercase();
    let mut out = format!("<{tag}");
    for (name, value) in &spec.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
    out.push('>');
    if VOID_TAGS.contains(&tag.as_str()) {
        return out;
    }
    match &spec.body {
        NodeBody::Empty => {}
        NodeBody::Text(text) => out.push_str(&escape(text)),
        NodeBody::Inner(inner) => out.push_str(inner),
    }
    out.push_str(&format!("</{tag}>"));
    out
}

/// Parses `markup` into detached nodes owned by `doc`. A lone element root is
/// returned as is; anything else is wrapped in a `<div>`.
pub fn render_to_element<L>(doc: &mut Document<L>, markup: &str) -> Result<ElementId, MarkupError> {
    let roots = parse_fragment(doc, markup)?;
    if let [single] = roots.as_slice()
        && doc.get(*single).is_some_and(|el| !el.is_text())
    {
        return Ok(*single);
    }
    let wrapper = doc.create_element("div");
    for root in roots {
        doc.append_child(wrapper, root);
    }
    Ok(wrapper)
}

/// Parses a markup fragment, returning its top-level nodes. Unmatched close
/// tags are ignored and unclosed elements are closed at the end of input.
pub fn parse_fragment<L>(doc: &mut Document<L>, markup: &str) -> Result<Vec<ElementId>, MarkupError> {
    let mut roots = Vec::new();
    let mut open: Vec<(String, ElementId)> = Vec::new();
    let mut pos = 0;

    let attach = |doc: &mut Document<L>, open: &[(String, ElementId)], roots: &mut Vec<ElementId>, node| {
        match open.last() {
            Some((_, parent)) => {
                doc.append_child(*parent, node);
            }
            None => roots.push(node),
        }
    };

    while pos < markup.len() {
        let rest = &markup[pos..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment
                .find("-->")
                .ok_or(MarkupError::UnterminatedComment(pos))?;
            pos += 4 + end + 3;
            continue;
        }
        if let Some(close) = rest.strip_prefix("</") {
            let end = close.find('>').ok_or(MarkupError::UnterminatedTag(pos))?;
            let name = close[..end].trim().to_ascii_lowercase();
            if let Some(depth) = open.iter().rposition(|(tag, _)| *tag == name) {
                open.truncate(depth);
            }
            pos += 2 + end + 1;
            continue;
        }
        if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = find_tag_end(rest).ok_or(MarkupError::UnterminatedTag(pos))?;
            let inside = &rest[1..end];
            let self_closing = inside.trim_end().ends_with('/');
            let inside = inside.trim_end().trim_end_matches('/');
            let (name, attributes) = parse_open_tag(inside);
            let node = doc.create_element(&name);
            for (attr, value) in attributes {
                doc.set_attribute(node, &attr, &value);
            }
            attach(doc, &open, &mut roots, node);
            if !self_closing && !VOID_TAGS.contains(&name.as_str()) {
                open.push((name, node));
            }
            pos += end + 1;
            continue;
        }

        let first = rest.chars().next().map_or(1, char::len_utf8);
        let next = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        let text = &rest[..next];
        if !text.trim().is_empty() {
            let node = doc.create_text(&decode_entities(text));
            attach(doc, &open, &mut roots, node);
        }
        pos += next;
    }
    Ok(roots)
}

/// Index of the `>` closing an open tag, skipping quoted attribute values.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in rest.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_open_tag(inside: &str) -> (String, Vec<(String, String)>) {
    let name_end = inside
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inside.len());
    let name = inside[..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut chars = inside[name_end..].chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let mut attr = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            attr.push(c);
        }
        if attr.is_empty() {
            if chars.next().is_none() {
                break;
            }
            continue;
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let mut value = String::new();
        if chars.next_if_eq(&'=').is_some() {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            match chars.next_if(|c| *c == '"' || *c == '\'') {
                Some(q) => {
                    for c in chars.by_ref() {
                        if c == q {
                            break;
                        }
                        value.push(c);
                    }
                }
                None => {
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }
        }
        attributes.push((attr.to_ascii_lowercase(), decode_entities(&value)));
    }
    (name, attributes)
}

pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Display;
    use indoc::indoc;

    #[test]
    fn text_bodies_are_escaped_inner_markup_is_not() {
        let spec = NodeSpec::new("span").id("t").text("a < b");
        assert_eq!(render_to_markup(&spec), r#"<span id="t">a &lt; b</span>"#);
        let spec = NodeSpec::new("div").inner("<b>x</b>");
        assert_eq!(render_to_markup(&spec), "<div><b>x</b></div>");
        assert_eq!(render_to_markup(&NodeSpec::new("br")), "<br>");
    }

    #[test]
    fn child_appends_rendered_markup() {
        let spec = NodeSpec::new("div")
            .child(&NodeSpec::new("i").text("1"))
            .child(&NodeSpec::new("i").text("2"));
        assert_eq!(render_to_markup(&spec), "<div><i>1</i><i>2</i></div>");
    }

    #[test]
    fn parses_nested_elements_attributes_and_entities() {
        let mut doc: Document<()> = Document::new();
        let markup = indoc! {r#"
            <div id="outer" class='a b' style="display:none; width: 30px">
              <!-- chrome -->
              <input type=checkbox checked data-bind="flags.on">
              <span>Tom &amp; Jerry &#33;</span>
              <br/>
            </div>
        "#};
        let root = render_to_element(&mut doc, markup).unwrap_or_else(|e| panic!("{e}"));
        let el = doc.get(root).cloned().unwrap_or_else(|| panic!("missing root"));
        assert_eq!(el.dom_id(), Some("outer"));
        assert!(el.has_class("b"));
        assert_eq!(el.style.display, Display::None);
        assert_eq!(el.style.width, Some(30.0));
        assert_eq!(el.children().len(), 3);

        let input = doc.query_attribute(root, "data-bind");
        assert_eq!(input.len(), 1);
        assert!(doc.get(input[0]).is_some_and(|i| i.checked()));
        assert_eq!(doc.text_content(root).trim(), "Tom & Jerry !");
    }

    #[test]
    fn multiple_roots_are_wrapped() {
        let mut doc: Document<()> = Document::new();
        let root = render_to_element(&mut doc, "<p>a</p><p>b</p>").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(doc.get(root).map(|e| e.tag().to_string()), Some("div".to_string()));
        assert_eq!(doc.get(root).map(|e| e.children().len()), Some(2));
    }

    #[test]
    fn stray_close_tags_are_ignored_and_open_tags_closed() {
        let mut doc: Document<()> = Document::new();
        let roots = parse_fragment(&mut doc, "</b><div><span>x</div>y").unwrap_or_default();
        assert_eq!(roots.len(), 2);
        assert_eq!(doc.text_content(roots[0]), "x");
        assert_eq!(doc.text_content(roots[1]), "y");
    }

    #[test]
    fn unterminated_tag_is_an_error() {
        let mut doc: Document<()> = Document::new();
        assert_eq!(
            parse_fragment(&mut doc, "<div id=\"x\"").err(),
            Some(MarkupError::UnterminatedTag(0))
        );
    }
}
