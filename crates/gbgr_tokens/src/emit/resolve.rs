//! Reference resolution for emitted values

use serde_json::{Number, Value};
use thiserror::Error;

use crate::reference::{Fragment, ReferencePath};
use crate::tree::{Literal, TokenTree, TokenValue};

/// A value with every reference replaced by what it points to.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    Number(Number),
    Text(String),
    Bool(bool),
    Json(Value),
}

impl Resolved {
    /// CSS-ready text for the value.
    pub fn to_css(&self) -> String {
        match self {
            Self::Number(n) => format_number(n),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Json(v) => v.to_string(),
        }
    }
}

/// Print a JSON number the way a script runtime would: integral values never
/// carry a trailing `.0`.
pub fn format_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("reference {0} does not point to a token")]
    Missing(String),

    #[error("reference {0} is part of a cycle")]
    Cycle(String),
}

/// Resolves references against one token tree.
pub struct Resolver<'a> {
    tree: &'a TokenTree,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a TokenTree) -> Self {
        Self { tree }
    }

    pub fn resolve(&self, value: &TokenValue) -> Result<Resolved, ResolveError> {
        self.resolve_inner(value, &mut Vec::new())
    }

    fn resolve_inner(
        &self,
        value: &TokenValue,
        stack: &mut Vec<String>,
    ) -> Result<Resolved, ResolveError> {
        match value {
            TokenValue::Literal(Literal::Number(n)) => Ok(Resolved::Number(n.clone())),
            TokenValue::Literal(Literal::Text(s)) => Ok(Resolved::Text(s.clone())),
            TokenValue::Literal(Literal::Bool(b)) => Ok(Resolved::Bool(*b)),
            TokenValue::Literal(Literal::Json(v)) => Ok(Resolved::Json(v.clone())),
            TokenValue::Reference(path) => self.follow(path, stack),
            TokenValue::Composite(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        Fragment::Text(t) => out.push_str(t),
                        Fragment::Reference(path) => {
                            out.push_str(&self.follow(path, stack)?.to_css());
                        }
                    }
                }
                Ok(Resolved::Text(out))
            }
        }
    }

    fn follow(&self, path: &ReferencePath, stack: &mut Vec<String>) -> Result<Resolved, ResolveError> {
        let dotted = path.dotted();
        if stack.contains(&dotted) {
            return Err(ResolveError::Cycle(path.to_string()));
        }
        let leaf = self
            .tree
            .leaf_at(path.segments())
            .ok_or_else(|| ResolveError::Missing(path.to_string()))?;
        stack.push(dotted);
        let resolved = self.resolve_inner(&leaf.value, stack);
        stack.pop();
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TokenLeaf;
    use serde_json::json;

    fn tree() -> TokenTree {
        TokenTree::new()
            .with_branch(
                "color",
                TokenTree::new()
                    .with_leaf("white", TokenLeaf::new("#FFFFFF", "color"))
                    .with_leaf("bg", TokenLeaf::new("{color.white}", "color"))
                    .with_leaf("loop-a", TokenLeaf::new("{color.loop-b}", "color"))
                    .with_leaf("loop-b", TokenLeaf::new("{color.loop-a}", "color")),
            )
            .with_branch(
                "spacing",
                TokenTree::new().with_leaf("sm", TokenLeaf::new(4, "number")),
            )
    }

    #[test]
    fn follows_reference_chains() {
        let tree = tree();
        let r = Resolver::new(&tree);
        let value = TokenValue::from_json(json!("{color.bg}"));
        assert_eq!(r.resolve(&value), Ok(Resolved::Text("#FFFFFF".into())));

        let value = TokenValue::from_json(json!("{spacing.sm}"));
        assert_eq!(r.resolve(&value).map(|v| v.to_css()), Ok("4".into()));
    }

    #[test]
    fn substitutes_composite_spans() {
        let tree = tree();
        let r = Resolver::new(&tree);
        let value = TokenValue::from_json(json!("linear-gradient({color.white}, {color.bg})"));
        assert_eq!(
            r.resolve(&value),
            Ok(Resolved::Text("linear-gradient(#FFFFFF, #FFFFFF)".into()))
        );
    }

    #[test]
    fn reports_missing_and_cyclic_references() {
        let tree = tree();
        let r = Resolver::new(&tree);
        assert!(matches!(
            r.resolve(&TokenValue::from_json(json!("{color.nope}"))),
            Err(ResolveError::Missing(_))
        ));
        assert!(matches!(
            r.resolve(&TokenValue::from_json(json!("{color.loop-a}"))),
            Err(ResolveError::Cycle(_))
        ));
    }

    #[test]
    fn integral_floats_print_without_fraction() {
        assert_eq!(format_number(&Number::from_f64(16.0).unwrap()), "16");
        assert_eq!(format_number(&Number::from_f64(0.4).unwrap()), "0.4");
        assert_eq!(format_number(&Number::from(12)), "12");
    }
}
