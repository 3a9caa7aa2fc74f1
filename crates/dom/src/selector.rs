//! CSS selector subset for `querySelector` / `querySelectorAll`
//!
//! Supported:
//! - type `div`, universal `*`, `#id`, `.class`
//! - attributes `[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]` (quoted or bare values)
//! - `:first-child`, `:last-child`
//! - combinators: descendant (space), `>`, `+`, `~`
//! - selector lists separated by `,`
//!
//! Anything else is rejected with `DomError::UnsupportedSelector` instead of
//! silently matching nothing.

use crate::arena::Document;
use crate::error::{DomError, Result};
use crate::types::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    Includes { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PseudoClass {
    FirstChild,
    LastChild,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    pseudo_classes: Vec<PseudoClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    step: SelectorStep,
    // Relation to the part on the left
    combinator: Option<Combinator>,
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Vec<SelectorPart>>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self> {
        let unsupported = || DomError::UnsupportedSelector(selector.to_string());
        let mut groups = Vec::new();
        for group in selector.split(',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(unsupported());
            }
            groups.push(parse_chain(group).ok_or_else(unsupported)?);
        }
        Ok(Self { groups })
    }

    /// Whether the element matches any selector of the list
    pub fn matches(&self, doc: &Document, node_id: NodeId) -> bool {
        self.groups
            .iter()
            .any(|chain| matches_chain(doc, node_id, chain))
    }
}

fn tokenize(selector: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    for ch in selector.chars() {
        match ch {
            '[' if !in_brackets => {
                in_brackets = true;
                current.push(ch);
            }
            ']' if in_brackets => {
                in_brackets = false;
                current.push(ch);
            }
            '>' | '+' | '~' if !in_brackets => {
                flush(&mut current, &mut tokens);
                tokens.push(ch.to_string());
            }
            c if c.is_whitespace() && !in_brackets => flush(&mut current, &mut tokens),
            _ => current.push(ch),
        }
    }

    if in_brackets {
        return None;
    }
    flush(&mut current, &mut tokens);
    Some(tokens)
}

fn parse_chain(selector: &str) -> Option<Vec<SelectorPart>> {
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(Combinator::Child),
            "+" => Some(Combinator::AdjacentSibling),
            "~" => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending.is_some() || parts.is_empty() {
                return None;
            }
            pending = Some(combinator);
            continue;
        }

        let step = parse_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return None;
    }
    Some(parts)
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(chars: &[char], start: usize) -> Option<(String, usize)> {
    let end = chars[start..]
        .iter()
        .position(|&c| !is_ident_char(c))
        .map(|p| start + p)
        .unwrap_or(chars.len());
    if end == start {
        return None;
    }
    Some((chars[start..end].iter().collect(), end))
}

fn parse_step(part: &str) -> Option<SelectorStep> {
    let chars: Vec<char> = part.chars().collect();
    let mut step = SelectorStep::default();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if step.universal || step.tag.is_some() {
                    return None;
                }
                step.universal = true;
                i += 1;
            }
            '#' => {
                let (id, next) = take_ident(&chars, i + 1)?;
                if step.id.replace(id).is_some() {
                    return None;
                }
                i = next;
            }
            '.' => {
                let (class, next) = take_ident(&chars, i + 1)?;
                step.classes.push(class);
                i = next;
            }
            '[' => {
                let close = chars[i..].iter().position(|&c| c == ']')? + i;
                let inner: String = chars[i + 1..close].iter().collect();
                step.attrs.push(parse_attr(&inner)?);
                i = close + 1;
            }
            ':' => {
                let (name, next) = take_ident(&chars, i + 1)?;
                let pseudo = match name.as_str() {
                    "first-child" => PseudoClass::FirstChild,
                    "last-child" => PseudoClass::LastChild,
                    _ => return None,
                };
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                // Type selector must come first
                if i != 0 {
                    return None;
                }
                let (tag, next) = take_ident(&chars, i)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Some(step)
}

fn parse_attr(inner: &str) -> Option<AttrCondition> {
    let inner = inner.trim();
    let Some(eq) = inner.find('=') else {
        let key = inner.to_ascii_lowercase();
        return (!key.is_empty() && key.chars().all(is_ident_char))
            .then_some(AttrCondition::Exists { key });
    };

    let (lhs, rhs) = inner.split_at(eq);
    let rhs = rhs[1..].trim();
    let value = rhs
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| rhs.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(rhs)
        .to_string();

    let (key, operator) = match lhs.chars().last() {
        Some(op @ ('~' | '^' | '$' | '*')) => (&lhs[..lhs.len() - 1], Some(op)),
        _ => (lhs, None),
    };
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() || !key.chars().all(is_ident_char) {
        return None;
    }

    Some(match operator {
        None => AttrCondition::Eq { key, value },
        Some('~') => AttrCondition::Includes { key, value },
        Some('^') => AttrCondition::StartsWith { key, value },
        Some('$') => AttrCondition::EndsWith { key, value },
        _ => AttrCondition::Contains { key, value },
    })
}

fn matches_step(doc: &Document, node_id: NodeId, step: &SelectorStep) -> bool {
    let Ok(node) = doc.get(node_id) else {
        return false;
    };
    if !node.is_element() {
        return false;
    }

    if let Some(tag) = &step.tag {
        if !node.node_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &step.id {
        if node.attr("id") != Some(id.as_str()) {
            return false;
        }
    }

    let class_attr = node.attr("class").unwrap_or("");
    if step
        .classes
        .iter()
        .any(|class| !class_attr.split_whitespace().any(|c| c == class))
    {
        return false;
    }

    let attrs_match = step.attrs.iter().all(|cond| match cond {
        AttrCondition::Exists { key } => node.attr(key).is_some(),
        AttrCondition::Eq { key, value } => node.attr(key) == Some(value.as_str()),
        AttrCondition::Includes { key, value } => node
            .attr(key)
            .is_some_and(|v| v.split_whitespace().any(|t| t == value)),
        AttrCondition::StartsWith { key, value } => {
            !value.is_empty() && node.attr(key).is_some_and(|v| v.starts_with(value.as_str()))
        }
        AttrCondition::EndsWith { key, value } => {
            !value.is_empty() && node.attr(key).is_some_and(|v| v.ends_with(value.as_str()))
        }
        AttrCondition::Contains { key, value } => {
            !value.is_empty() && node.attr(key).is_some_and(|v| v.contains(value.as_str()))
        }
    });
    if !attrs_match {
        return false;
    }

    step.pseudo_classes.iter().all(|pseudo| match pseudo {
        PseudoClass::FirstChild => doc.previous_element_sibling(node_id).is_none(),
        PseudoClass::LastChild => doc.next_element_sibling(node_id).is_none(),
    })
}

fn matches_chain(doc: &Document, node_id: NodeId, parts: &[SelectorPart]) -> bool {
    let Some(last) = parts.last() else {
        return false;
    };
    if !matches_step(doc, node_id, &last.step) {
        return false;
    }

    let mut current = node_id;
    for idx in (1..parts.len()).rev() {
        let prev_step = &parts[idx - 1].step;
        let combinator = parts[idx].combinator.unwrap_or(Combinator::Descendant);

        let matched = match combinator {
            Combinator::Child => doc
                .parent(current)
                .filter(|&parent| matches_step(doc, parent, prev_step)),
            Combinator::Descendant => {
                let mut cursor = doc.parent(current);
                let mut found = None;
                while let Some(parent) = cursor {
                    if matches_step(doc, parent, prev_step) {
                        found = Some(parent);
                        break;
                    }
                    cursor = doc.parent(parent);
                }
                found
            }
            Combinator::AdjacentSibling => doc
                .previous_element_sibling(current)
                .filter(|&sibling| matches_step(doc, sibling, prev_step)),
            Combinator::GeneralSibling => {
                let mut cursor = doc.previous_element_sibling(current);
                let mut found = None;
                while let Some(sibling) = cursor {
                    if matches_step(doc, sibling, prev_step) {
                        found = Some(sibling);
                        break;
                    }
                    cursor = doc.previous_element_sibling(sibling);
                }
                found
            }
        };

        let Some(matched) = matched else {
            return false;
        };
        current = matched;
    }

    true
}

impl Document {
    /// First descendant of `scope` (document order) matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    /// All descendants of `scope` (document order) matching `selector`
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }

    /// Whether a node matches `selector`
    pub fn matches(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        Ok(Selector::parse(selector)?.matches(self, node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::parse_html(
            r#"<div id="main" class="box wide">
                 <ul class="list">
                   <li data-kind="fruit apple">a</li>
                   <li class="pick" data-kind="veg">b</li>
                   <li>c</li>
                 </ul>
                 <p lang="en-US">p1</p>
                 <p>p2</p>
               </div>
               <span class="pick">outside</span>"#,
        )
        .unwrap()
    }

    fn names(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| doc.text_content(id).unwrap())
            .collect()
    }

    #[test]
    fn test_simple_selectors() {
        let doc = page();
        let root = doc.root_id();

        assert_eq!(doc.query_selector(root, "#main").unwrap(), doc.find_by_id("main"));
        assert_eq!(doc.query_selector_all(root, "li").unwrap().len(), 3);
        assert_eq!(doc.query_selector_all(root, ".pick").unwrap().len(), 2);
        assert_eq!(doc.query_selector_all(root, "div.box.wide").unwrap().len(), 1);
        assert!(doc.query_selector(root, "div.narrow").unwrap().is_none());
    }

    #[test]
    fn test_attribute_selectors() {
        let doc = page();
        let root = doc.root_id();

        let found = doc.query_selector_all(root, "[data-kind]").unwrap();
        assert_eq!(names(&doc, &found), vec!["a", "b"]);

        let found = doc.query_selector_all(root, "[data-kind~=apple]").unwrap();
        assert_eq!(names(&doc, &found), vec!["a"]);

        let found = doc.query_selector_all(root, "p[lang^='en']").unwrap();
        assert_eq!(names(&doc, &found), vec!["p1"]);

        let found = doc.query_selector_all(root, "[data-kind=\"veg\"]").unwrap();
        assert_eq!(names(&doc, &found), vec!["b"]);
    }

    #[test]
    fn test_combinators() {
        let doc = page();
        let root = doc.root_id();

        let found = doc.query_selector_all(root, "#main > p").unwrap();
        assert_eq!(names(&doc, &found), vec!["p1", "p2"]);

        let found = doc.query_selector_all(root, "div li.pick").unwrap();
        assert_eq!(names(&doc, &found), vec!["b"]);

        let found = doc.query_selector_all(root, "li + li").unwrap();
        assert_eq!(names(&doc, &found), vec!["b", "c"]);

        let found = doc.query_selector_all(root, "ul ~ p").unwrap();
        assert_eq!(names(&doc, &found), vec!["p1", "p2"]);

        let found = doc.query_selector_all(root, "li:first-child, li:last-child").unwrap();
        assert_eq!(names(&doc, &found), vec!["a", "c"]);
    }

    #[test]
    fn test_scope_limits_results() {
        let doc = page();
        let list = doc.query_selector(doc.root_id(), "ul").unwrap().unwrap();

        let found = doc.query_selector_all(list, ".pick").unwrap();
        assert_eq!(names(&doc, &found), vec!["b"]);
        // Scope itself is not a candidate
        assert!(doc.query_selector(list, "ul").unwrap().is_none());
    }

    #[test]
    fn test_unsupported_selectors() {
        let doc = page();
        let root = doc.root_id();

        for bad in ["", "li >", "> li", "a,,b", "li:hover", "[unclosed", "div#a#b"] {
            assert!(
                matches!(
                    doc.query_selector(root, bad),
                    Err(DomError::UnsupportedSelector(_))
                ),
                "expected rejection for {:?}",
                bad
            );
        }
    }
}
