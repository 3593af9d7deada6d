//! Stylesheet compilation against registered utilities.
//!
//! Supports the subset of the host stylesheet language the column utilities
//! need: plain rules, `@apply`, `@tailwind utilities;` and block at-rules such
//! as `@media`. Output is formatted with two-space indentation and a blank
//! line between top-level blocks, or minified.

use crate::engine::{Declaration, RegisteredUtility, UtilityEngine, VariantSet};
use crate::errors::{ColumnsError, Result};
use crate::naming::escape_class_name;
use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

/// A node of the source stylesheet
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    Rule { selector: String, body: Vec<BodyItem> },
    AtBlock { name: String, params: String, children: Vec<SourceNode> },
    AtStatement { name: String, params: String },
}

/// An entry inside a rule body
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Declaration(Declaration),
    Apply(Vec<String>),
}

/// A node of the generated stylesheet
#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    Rule { selector: String, declarations: Vec<Declaration> },
    Block { prelude: String, children: Vec<CssNode> },
    Statement(String),
}

/// Parsed source stylesheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub nodes: Vec<SourceNode>,
}

impl Stylesheet {
    pub fn parse(source: &str) -> Result<Self> {
        // Keep line numbers stable for error messages.
        let stripped = COMMENT.replace_all(source, |caps: &regex::Captures| {
            "\n".repeat(caps[0].matches('\n').count())
        });

        let mut parser = Parser::new(&stripped);
        let nodes = parser.parse_nodes(false)?;
        Ok(Self { nodes })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> ColumnsError {
        ColumnsError::ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Read up to (not including) the first of `stops` outside of quoted
    /// strings and parentheses.
    fn read_until(&mut self, stops: &[char]) -> String {
        let mut text = String::new();
        let mut quote: Option<char> = None;
        let mut depth = 0usize;

        while let Some(ch) = self.peek() {
            match quote {
                Some(q) => {
                    if ch == '\\' {
                        text.push(ch);
                        self.bump();
                        if let Some(escaped) = self.bump() {
                            text.push(escaped);
                        }
                        continue;
                    }
                    if ch == q {
                        quote = None;
                    }
                }
                None => match ch {
                    '"' | '\'' => quote = Some(ch),
                    '(' => depth += 1,
                    ')' => depth = depth.saturating_sub(1),
                    _ if depth == 0 && stops.contains(&ch) => break,
                    _ => {}
                },
            }
            text.push(ch);
            self.bump();
        }
        text
    }

    fn parse_nodes(&mut self, nested: bool) -> Result<Vec<SourceNode>> {
        let mut nodes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None if nested => return Err(self.error("unclosed block")),
                None => return Ok(nodes),
                Some('}') if nested => {
                    self.bump();
                    return Ok(nodes);
                }
                Some('}') => return Err(self.error("unexpected `}`")),
                Some(_) => {}
            }

            let prelude = self.read_until(&['{', ';', '}']);
            let prelude = prelude.trim().to_string();

            match self.bump() {
                Some(';') => {
                    let (name, params) = split_at_rule(&prelude)
                        .ok_or_else(|| self.error(format!("expected `{{` after `{}`", prelude)))?;
                    nodes.push(SourceNode::AtStatement { name, params });
                }
                Some('{') => {
                    if let Some((name, params)) = split_at_rule(&prelude) {
                        let children = self.parse_nodes(true)?;
                        nodes.push(SourceNode::AtBlock { name, params, children });
                    } else {
                        if prelude.is_empty() {
                            return Err(self.error("rule without a selector"));
                        }
                        let body = self.parse_body()?;
                        nodes.push(SourceNode::Rule { selector: prelude, body });
                    }
                }
                _ => return Err(self.error(format!("expected `{{` or `;` after `{}`", prelude))),
            }
        }
    }

    fn parse_body(&mut self) -> Result<Vec<BodyItem>> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unclosed rule")),
                Some('}') => {
                    self.bump();
                    return Ok(items);
                }
                Some(';') => {
                    self.bump();
                    continue;
                }
                Some(_) => {}
            }

            let text = self.read_until(&[';', '}', '{']);
            if self.peek() == Some('{') {
                return Err(self.error("nested rules are not supported"));
            }
            if self.peek() == Some(';') {
                self.bump();
            }

            let text = text.trim();
            if let Some(classes) = text.strip_prefix("@apply") {
                let classes: Vec<String> = classes.split_whitespace().map(str::to_string).collect();
                if classes.is_empty() {
                    return Err(self.error("`@apply` without classes"));
                }
                items.push(BodyItem::Apply(classes));
            } else if let Some((property, value)) = text.split_once(':') {
                items.push(BodyItem::Declaration(Declaration::new(
                    property.trim(),
                    value.trim(),
                )));
            } else {
                return Err(self.error(format!("expected a declaration, found `{}`", text)));
            }
        }
    }
}

fn split_at_rule(prelude: &str) -> Option<(String, String)> {
    let rest = prelude.strip_prefix('@')?;
    let (name, params) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Some((name.to_string(), params.trim().to_string()))
}

/// Compiles a stylesheet against the utilities of an engine
pub struct Compiler<'a> {
    engine: &'a UtilityEngine,
    candidates: IndexSet<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(engine: &'a UtilityEngine) -> Self {
        Self {
            engine,
            candidates: IndexSet::new(),
        }
    }

    /// Class candidates emitted by `@tailwind utilities;`
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates.extend(candidates.into_iter().map(Into::into));
        self
    }

    pub fn compile(&self, stylesheet: &Stylesheet) -> Result<Vec<CssNode>> {
        self.compile_nodes(&stylesheet.nodes)
    }

    /// Parse and compile in one step, returning formatted CSS
    pub fn compile_str(&self, source: &str, minify: bool) -> Result<String> {
        let nodes = self.compile(&Stylesheet::parse(source)?)?;
        Ok(if minify { to_minified_css(&nodes) } else { to_css(&nodes) })
    }

    /// Every registered utility in its plain form, in registration order.
    /// Utilities sharing a selector are folded into one rule.
    pub fn all_utilities(&self) -> Vec<CssNode> {
        let mut rules: IndexMap<&str, Vec<Declaration>> = IndexMap::new();
        for registered in self.engine.utilities() {
            rules
                .entry(registered.utility.selector.as_str())
                .or_default()
                .push(registered.utility.declaration.clone());
        }

        rules
            .into_iter()
            .map(|(selector, declarations)| CssNode::Rule {
                selector: selector.to_string(),
                declarations,
            })
            .collect()
    }

    fn compile_nodes(&self, nodes: &[SourceNode]) -> Result<Vec<CssNode>> {
        let mut output = Vec::new();

        for node in nodes {
            match node {
                SourceNode::Rule { selector, body } => {
                    output.extend(self.compile_rule(selector, body)?);
                }
                SourceNode::AtBlock { name, params, children } => {
                    let children = self.compile_nodes(children)?;
                    if !children.is_empty() {
                        output.push(CssNode::Block {
                            prelude: at_prelude(name, params),
                            children,
                        });
                    }
                }
                SourceNode::AtStatement { name, params } if name == "tailwind" => {
                    if params == "utilities" {
                        output.extend(self.utilities());
                    } else {
                        tracing::debug!(layer = %params, "no utilities registered for layer");
                    }
                }
                SourceNode::AtStatement { name, params } => {
                    output.push(CssNode::Statement(at_prelude(name, params)));
                }
            }
        }

        Ok(output)
    }

    fn compile_rule(&self, selector: &str, body: &[BodyItem]) -> Result<Vec<CssNode>> {
        let mut declarations = Vec::new();
        let mut variant_groups: BTreeMap<VariantSet, Vec<&RegisteredUtility>> = BTreeMap::new();

        for item in body {
            match item {
                BodyItem::Declaration(declaration) => declarations.push(declaration.clone()),
                BodyItem::Apply(classes) => {
                    let mut base = Vec::new();
                    for class in classes {
                        let resolved = self.engine.resolve_candidate(class)?;
                        if resolved.variants.is_empty() {
                            base.extend(resolved.utilities);
                        } else {
                            variant_groups
                                .entry(resolved.variants)
                                .or_default()
                                .extend(resolved.utilities);
                        }
                    }
                    declarations.extend(sorted_declarations(base));
                }
            }
        }

        let mut nodes = Vec::new();
        if !declarations.is_empty() || variant_groups.is_empty() {
            nodes.push(CssNode::Rule {
                selector: selector.to_string(),
                declarations,
            });
        }

        for (variants, utilities) in variant_groups {
            let rule = CssNode::Rule {
                selector: if variants.hover {
                    hover_selector(selector)
                } else {
                    selector.to_string()
                },
                declarations: sorted_declarations(utilities),
            };
            self.push_variant_rule(&mut nodes, variants.screen, rule);
        }

        Ok(nodes)
    }

    /// Utilities for every resolvable candidate, base rules first, then
    /// hover, then one media block per screen.
    fn utilities(&self) -> Vec<CssNode> {
        let mut entries: Vec<(VariantSet, usize, String, Declaration)> = Vec::new();

        for candidate in &self.candidates {
            let resolved = match self.engine.resolve_candidate(candidate) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::trace!(candidate = %candidate, "skipping candidate: {}", e);
                    continue;
                }
            };

            let mut selector = format!(".{}", escape_class_name(candidate));
            if resolved.variants.hover {
                selector.push_str(":hover");
            }
            for utility in resolved.utilities {
                entries.push((
                    resolved.variants.clone(),
                    utility.order,
                    selector.clone(),
                    utility.utility.declaration.clone(),
                ));
            }
        }

        entries.sort_by(|a, b| (&a.0, a.1, &a.2).cmp(&(&b.0, b.1, &b.2)));
        tracing::debug!(rules = entries.len(), "emitting utilities");

        let mut nodes = Vec::new();
        for (variants, _, selector, declaration) in entries {
            let target = self.target_for_screen(&mut nodes, variants.screen);
            match target.last_mut() {
                Some(CssNode::Rule { selector: last, declarations }) if *last == selector => {
                    declarations.push(declaration);
                }
                _ => target.push(CssNode::Rule {
                    selector,
                    declarations: vec![declaration],
                }),
            }
        }
        nodes
    }

    fn push_variant_rule(&self, nodes: &mut Vec<CssNode>, screen: Option<usize>, rule: CssNode) {
        self.target_for_screen(nodes, screen).push(rule);
    }

    /// The list new rules for `screen` go into, opening a media block when
    /// the last node is not already the block for that screen.
    fn target_for_screen<'n>(
        &self,
        nodes: &'n mut Vec<CssNode>,
        screen: Option<usize>,
    ) -> &'n mut Vec<CssNode> {
        let Some(prelude) = screen.and_then(|index| self.media_prelude(index)) else {
            return nodes;
        };

        let reuse = matches!(nodes.last(), Some(CssNode::Block { prelude: last, .. }) if *last == prelude);
        if !reuse {
            nodes.push(CssNode::Block {
                prelude,
                children: Vec::new(),
            });
        }

        match nodes.last_mut() {
            Some(CssNode::Block { children, .. }) => children,
            _ => unreachable!("a media block was just pushed"),
        }
    }

    fn media_prelude(&self, screen: usize) -> Option<String> {
        self.engine
            .screen(screen)
            .map(|(_, width)| format!("@media (min-width: {})", width))
    }
}

fn at_prelude(name: &str, params: &str) -> String {
    if params.is_empty() {
        format!("@{}", name)
    } else {
        format!("@{} {}", name, params)
    }
}

fn sorted_declarations(mut utilities: Vec<&RegisteredUtility>) -> Vec<Declaration> {
    utilities.sort_by_key(|u| u.order);
    utilities.dedup_by_key(|u| u.order);
    utilities
        .into_iter()
        .map(|u| u.utility.declaration.clone())
        .collect()
}

fn hover_selector(selector: &str) -> String {
    selector
        .split(',')
        .map(|part| format!("{}:hover", part.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format nodes with two-space indentation
pub fn to_css(nodes: &[CssNode]) -> String {
    let mut css = String::new();
    write_nodes(&mut css, nodes, 0);
    css
}

fn write_nodes(css: &mut String, nodes: &[CssNode], depth: usize) {
    let indent = "  ".repeat(depth);

    for (i, node) in nodes.iter().enumerate() {
        if depth == 0 && i > 0 {
            css.push('\n');
        }

        match node {
            CssNode::Rule { selector, declarations } => {
                let separator = format!(",\n{}", indent);
                let selector = selector
                    .split(',')
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join(&separator);
                css.push_str(&format!("{}{} {{\n", indent, selector));
                for declaration in declarations {
                    css.push_str(&format!(
                        "{}  {}: {};\n",
                        indent, declaration.property, declaration.value
                    ));
                }
                css.push_str(&format!("{}}}\n", indent));
            }
            CssNode::Block { prelude, children } => {
                css.push_str(&format!("{}{} {{\n", indent, prelude));
                write_nodes(css, children, depth + 1);
                css.push_str(&format!("{}}}\n", indent));
            }
            CssNode::Statement(text) => {
                css.push_str(&format!("{}{};\n", indent, text));
            }
        }
    }
}

/// Format nodes without insignificant whitespace
pub fn to_minified_css(nodes: &[CssNode]) -> String {
    let mut css = String::new();
    write_minified(&mut css, nodes);
    css
}

fn write_minified(css: &mut String, nodes: &[CssNode]) {
    for node in nodes {
        match node {
            CssNode::Rule { selector, declarations } => {
                let selector = selector.split(',').map(str::trim).collect::<Vec<_>>().join(",");
                css.push_str(&selector);
                css.push('{');
                for declaration in declarations {
                    css.push_str(&format!("{}:{};", declaration.property, declaration.value));
                }
                css.push('}');
            }
            CssNode::Block { prelude, children } => {
                css.push_str(&prelude.replace(": ", ":"));
                css.push('{');
                write_minified(css, children);
                css.push('}');
            }
            CssNode::Statement(text) => {
                css.push_str(text);
                css.push(';');
            }
        }
    }
}

/// Header comment for generated files
pub fn css_header(minified: bool) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    if minified {
        format!(
            "/* Generated by content-columns v{} at {} */",
            env!("CARGO_PKG_VERSION"),
            timestamp
        )
    } else {
        format!(
            r#"/**
 * Generated by content-columns v{}
 * Generation time: {}
 *
 * DO NOT EDIT - This file is auto-generated.
 */

"#,
            env!("CARGO_PKG_VERSION"),
            timestamp
        )
    }
}
