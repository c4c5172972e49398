//! HtmlDocument implementation
//!
//! Wraps a tree-sitter-html parse tree with a small DOM-style API: element
//! traversal in document order, attribute lookup, text content and table rows.
//! Malformed markup still yields a tree; error nodes are walked like any other.

use tree_sitter::{Language as TsLanguage, Node, Parser, Tree};

use crate::ParseError;
use crate::text::{collapse_whitespace, decode_entities};

const ELEMENT_KINDS: &[&str] = &["element", "script_element", "style_element"];
const TAG_KINDS: &[&str] = &["start_tag", "self_closing_tag"];

/// A parsed HTML document.
pub struct HtmlDocument {
  source: String,
  tree: Tree,
}

impl std::fmt::Debug for HtmlDocument {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HtmlDocument")
      .field("bytes", &self.source.len())
      .field("has_error", &self.tree.root_node().has_error())
      .finish()
  }
}

impl HtmlDocument {
  /// Parse an HTML string.
  pub fn parse(html: &str) -> Result<Self, ParseError> {
    let mut parser = Parser::new();
    let language: TsLanguage = tree_sitter_html::LANGUAGE.into();
    parser
      .set_language(&language)
      .map_err(|e| ParseError::Language(e.to_string()))?;

    let tree = parser.parse(html, None).ok_or(ParseError::NoTree)?;
    Ok(Self {
      source: html.to_string(),
      tree,
    })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  /// Whether the parser had to recover from malformed markup.
  pub fn has_errors(&self) -> bool {
    self.tree.root_node().has_error()
  }

  /// All elements in document order.
  pub fn elements(&self) -> Vec<Element<'_>> {
    let mut out = Vec::new();
    collect_elements(self.tree.root_node(), &self.source, &mut out);
    out
  }

  /// All elements with the given tag name, in document order.
  pub fn find_all(&self, tag: &str) -> Vec<Element<'_>> {
    self.elements().into_iter().filter(|e| e.is(tag)).collect()
  }

  /// First element with the given tag name that satisfies `predicate`.
  pub fn find_first<F>(&self, tag: &str, predicate: F) -> Option<Element<'_>>
  where
    F: Fn(&Element<'_>) -> bool,
  {
    self.elements().into_iter().find(|e| e.is(tag) && predicate(e))
  }

  /// Every `<table>` in the document, nested tables included.
  pub fn tables(&self) -> Vec<Table<'_>> {
    self.find_all("table").into_iter().map(Table).collect()
  }
}

/// An element node borrowed from an [`HtmlDocument`].
#[derive(Clone, Copy)]
pub struct Element<'doc> {
  node: Node<'doc>,
  source: &'doc str,
}

impl std::fmt::Debug for Element<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Element")
      .field("tag", &self.tag_name())
      .field("start_byte", &self.node.start_byte())
      .finish()
  }
}

impl<'doc> Element<'doc> {
  /// Lowercased tag name (empty if the start tag is missing).
  pub fn tag_name(&self) -> String {
    self
      .start_tag()
      .and_then(|tag| child_nodes(tag).into_iter().find(|n| n.kind() == "tag_name"))
      .map(|n| self.node_text(n).to_ascii_lowercase())
      .unwrap_or_default()
  }

  /// Case-insensitive tag name check.
  pub fn is(&self, tag: &str) -> bool {
    self.tag_name().eq_ignore_ascii_case(tag)
  }

  /// Attribute value with character references decoded.
  ///
  /// A bare attribute (`<input disabled>`) yields `Some("")`.
  pub fn attr(&self, name: &str) -> Option<String> {
    let tag = self.start_tag()?;
    for attribute in child_nodes(tag).into_iter().filter(|n| n.kind() == "attribute") {
      let parts = child_nodes(attribute);
      let matches_name = parts
        .iter()
        .find(|n| n.kind() == "attribute_name")
        .is_some_and(|n| self.node_text(*n).eq_ignore_ascii_case(name));
      if !matches_name {
        continue;
      }

      let value = parts.iter().find_map(|n| match n.kind() {
        "attribute_value" => Some(self.node_text(*n).to_string()),
        "quoted_attribute_value" => Some(
          child_nodes(*n)
            .into_iter()
            .find(|v| v.kind() == "attribute_value")
            .map(|v| self.node_text(v).to_string())
            .unwrap_or_default(),
        ),
        _ => None,
      });
      return Some(decode_entities(&value.unwrap_or_default()));
    }
    None
  }

  /// Whether the `class` attribute contains `fragment` (case-insensitive substring).
  pub fn has_class_containing(&self, fragment: &str) -> bool {
    self
      .attr("class")
      .is_some_and(|class| class.to_lowercase().contains(&fragment.to_lowercase()))
  }

  /// Text content of the element and its descendants, entities decoded,
  /// whitespace collapsed. Script and style bodies are excluded.
  pub fn text(&self) -> String {
    let mut pieces = Vec::new();
    collect_text(self.node, &mut pieces);

    let bytes = self.source.as_bytes();
    let mut out = String::new();
    let mut prev_end: Option<usize> = None;

    for node in pieces {
      let start = node.start_byte();
      if let Some(end) = prev_end {
        // Pieces separated only by tags join directly; any whitespace between them becomes a space
        let gap_has_space = start > end
          && (bytes.get(end).is_some_and(u8::is_ascii_whitespace)
            || bytes.get(start - 1).is_some_and(u8::is_ascii_whitespace));
        if gap_has_space {
          out.push(' ');
        }
      }
      out.push_str(&decode_entities(self.node_text(node)));
      prev_end = Some(node.end_byte());
    }

    collapse_whitespace(&out)
  }

  /// Direct child elements.
  pub fn children(&self) -> Vec<Element<'doc>> {
    child_nodes(self.node)
      .into_iter()
      .filter(|n| ELEMENT_KINDS.contains(&n.kind()))
      .map(|node| Element {
        node,
        source: self.source,
      })
      .collect()
  }

  /// All descendant elements in document order (excluding `self`).
  pub fn descendants(&self) -> Vec<Element<'doc>> {
    let mut out = Vec::new();
    for child in child_nodes(self.node) {
      collect_elements(child, self.source, &mut out);
    }
    out
  }

  /// Descendant elements with the given tag name.
  pub fn find_all(&self, tag: &str) -> Vec<Element<'doc>> {
    self.descendants().into_iter().filter(|e| e.is(tag)).collect()
  }

  /// First descendant with the given tag name that satisfies `predicate`.
  pub fn find_first<F>(&self, tag: &str, predicate: F) -> Option<Element<'doc>>
  where
    F: Fn(&Element<'doc>) -> bool,
  {
    self.descendants().into_iter().find(|e| e.is(tag) && predicate(e))
  }

  /// Byte offset of the element in the source document.
  pub fn start_byte(&self) -> usize {
    self.node.start_byte()
  }

  fn start_tag(&self) -> Option<Node<'doc>> {
    child_nodes(self.node).into_iter().find(|n| TAG_KINDS.contains(&n.kind()))
  }

  fn node_text(&self, node: Node<'doc>) -> &'doc str {
    node.utf8_text(self.source.as_bytes()).unwrap_or_default()
  }
}

/// A `<table>` element with row access.
#[derive(Debug, Clone, Copy)]
pub struct Table<'doc>(pub Element<'doc>);

impl<'doc> Table<'doc> {
  pub fn element(&self) -> Element<'doc> {
    self.0
  }

  /// Rows of this table as `th`/`td` cells. Rows belonging to nested tables
  /// are not included.
  pub fn rows(&self) -> Vec<Vec<Element<'doc>>> {
    let mut rows = Vec::new();
    collect_rows(self.0, &mut rows);
    rows
  }
}

fn collect_rows<'doc>(element: Element<'doc>, rows: &mut Vec<Vec<Element<'doc>>>) {
  for child in element.children() {
    let tag = child.tag_name();
    match tag.as_str() {
      "table" => {}
      "tr" => rows.push(
        child
          .children()
          .into_iter()
          .filter(|cell| cell.is("td") || cell.is("th"))
          .collect(),
      ),
      _ => collect_rows(child, rows),
    }
  }
}

fn child_nodes(node: Node<'_>) -> Vec<Node<'_>> {
  let mut cursor = node.walk();
  node.children(&mut cursor).collect()
}

fn collect_elements<'doc>(node: Node<'doc>, source: &'doc str, out: &mut Vec<Element<'doc>>) {
  if ELEMENT_KINDS.contains(&node.kind()) {
    out.push(Element { node, source });
  }
  for child in child_nodes(node) {
    collect_elements(child, source, out);
  }
}

fn collect_text<'doc>(node: Node<'doc>, out: &mut Vec<Node<'doc>>) {
  match node.kind() {
    "text" | "entity" => out.push(node),
    "script_element" | "style_element" | "comment" | "start_tag" | "end_tag" | "self_closing_tag" => {}
    _ => {
      for child in child_nodes(node) {
        collect_text(child, out);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn parse(html: &str) -> HtmlDocument {
    HtmlDocument::parse(html).expect("html should parse")
  }

  #[test]
  fn test_tag_names_are_lowercased() {
    let doc = parse("<DIV><Span>x</Span></DIV>");
    let tags: Vec<_> = doc.elements().iter().map(|e| e.tag_name()).collect();
    assert_eq!(tags, vec!["div", "span"]);
  }

  #[test]
  fn test_attr_quoted_unquoted_and_bare() {
    let doc = parse(r#"<a href="/pipeline-tag/text-generation" data-x=plain hidden class='tag big'>link</a>"#);
    let a = doc.find_all("a")[0];

    assert_eq!(a.attr("href").as_deref(), Some("/pipeline-tag/text-generation"));
    assert_eq!(a.attr("data-x").as_deref(), Some("plain"));
    assert_eq!(a.attr("hidden").as_deref(), Some(""));
    assert_eq!(a.attr("HREF").as_deref(), Some("/pipeline-tag/text-generation"));
    assert_eq!(a.attr("missing"), None);
    assert!(a.has_class_containing("TAG"));
  }

  #[test]
  fn test_attr_decodes_entities() {
    let doc = parse(r#"<a href="/models?a=1&amp;pipeline_tag=fill-mask">x</a>"#);
    assert_eq!(
      doc.find_all("a")[0].attr("href").as_deref(),
      Some("/models?a=1&pipeline_tag=fill-mask")
    );
  }

  #[test]
  fn test_text_joins_inline_markup() {
    let doc = parse("<td>75.3<span>%</span></td><p>MMLU <b>5-shot</b></p>");
    assert_eq!(doc.find_all("td")[0].text(), "75.3%");
    assert_eq!(doc.find_all("p")[0].text(), "MMLU 5-shot");
  }

  #[test]
  fn test_text_decodes_and_collapses() {
    let doc = parse("<p>  Q&amp;A\n\n   score&nbsp;88  </p>");
    assert_eq!(doc.find_all("p")[0].text(), "Q&A score 88");
  }

  #[test]
  fn test_text_skips_script_and_style() {
    let doc = parse("<div>a<script>var x = 1;</script><style>p{}</style> b</div>");
    assert_eq!(doc.find_all("div")[0].text(), "a b");
  }

  #[test]
  fn test_table_rows_with_header_and_body() {
    let doc = parse(
      r#"<table>
        <thead><tr><th>Benchmark</th><th>Score</th></tr></thead>
        <tbody>
          <tr><td>MMLU</td><td>70.1</td></tr>
          <tr><td>GSM8K</td><td>55.0%</td></tr>
        </tbody>
      </table>"#,
    );
    let tables = doc.tables();
    assert_eq!(tables.len(), 1);

    let rows: Vec<Vec<String>> = tables[0]
      .rows()
      .iter()
      .map(|cells| cells.iter().map(|c| c.text()).collect())
      .collect();
    assert_eq!(
      rows,
      vec![
        vec!["Benchmark".to_string(), "Score".to_string()],
        vec!["MMLU".to_string(), "70.1".to_string()],
        vec!["GSM8K".to_string(), "55.0%".to_string()],
      ]
    );
  }

  #[test]
  fn test_nested_table_rows_stay_with_their_table() {
    let doc = parse(
      "<table><tr><td>outer</td><td><table><tr><td>inner</td><td>1</td></tr></table></td></tr></table>",
    );
    let tables = doc.tables();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].rows().len(), 1);
    assert_eq!(tables[1].rows()[0][0].text(), "inner");
  }

  #[test]
  fn test_find_first_respects_document_order() {
    let doc = parse(r#"<span class="a">1</span><span class="b">2</span><span class="b">3</span>"#);
    let found = doc.find_first("span", |e| e.has_class_containing("b"));
    assert_eq!(found.map(|e| e.text()).as_deref(), Some("2"));
  }

  #[test]
  fn test_element_scoped_queries() {
    let doc = parse(r#"<div class="tags"><a class="tag">nlp</a><a class="tag">en</a></div><a class="tag">x</a>"#);
    let container = doc.find_first("div", |e| e.has_class_containing("tags")).unwrap();
    let names: Vec<_> = container.find_all("a").iter().map(|a| a.text()).collect();
    assert_eq!(names, vec!["nlp", "en"]);
    assert_eq!(container.children().len(), 2);
  }

  #[test]
  fn test_malformed_markup_still_parses() {
    let doc = parse("<table><tr><td>MMLU<td>70</table><p>unclosed");
    assert!(!doc.find_all("td").is_empty());
  }

  #[test]
  fn test_empty_document() {
    let doc = parse("");
    assert!(doc.elements().is_empty());
    assert!(doc.tables().is_empty());
  }
}
