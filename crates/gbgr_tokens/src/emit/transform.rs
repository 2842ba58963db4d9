//! Value transforms applied while emitting style sheets

use super::resolve::{format_number, Resolved};

/// The token a transform is looking at.
#[derive(Clone, Copy, Debug)]
pub struct TokenContext<'a> {
    pub path: &'a [String],
    /// Declared `type` tag
    pub kind: &'a str,
}

impl TokenContext<'_> {
    /// Top-level category (`color`, `spacing`, `fontWeights`, ...).
    pub fn category(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or("")
    }
}

/// A named matcher/transformer pair.
#[derive(Clone, Copy)]
pub struct ValueTransform {
    pub name: &'static str,
    pub matcher: fn(&TokenContext<'_>, &Resolved) -> bool,
    pub transform: fn(&TokenContext<'_>, Resolved) -> Resolved,
}

impl std::fmt::Debug for ValueTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueTransform").field(&self.name).finish()
    }
}

impl ValueTransform {
    /// Apply the transform when its matcher accepts the token.
    pub fn apply(&self, ctx: &TokenContext<'_>, value: Resolved) -> Resolved {
        if (self.matcher)(ctx, &value) {
            (self.transform)(ctx, value)
        } else {
            value
        }
    }
}

/// Categories whose numbers are lengths.
pub const LENGTH_CATEGORIES: &[&str] = &["radius", "spacing", "device-mode", "fontSize"];

/// Unit appended to length numbers.
pub const LENGTH_UNIT: &str = "px";

const FONT_WEIGHTS: &[(&str, u32)] = &[
    ("Bold", 700),
    ("SemiBold", 600),
    ("Medium", 500),
    ("Regular", 400),
];

/// Named font weights (`"SemiBold"`) to numeric weights (`600`).
pub fn font_weight() -> ValueTransform {
    ValueTransform {
        name: "gbgr/fontWeight",
        matcher: |ctx, _| ctx.kind == "text" && ctx.category() == "fontWeights",
        transform: |_, value| match value {
            Resolved::Text(label) => match FONT_WEIGHTS.iter().find(|(name, _)| *name == label) {
                Some((_, weight)) => Resolved::Number((*weight).into()),
                None => Resolved::Text(label),
            },
            other => other,
        },
    }
}

/// Plain numbers under length categories get a `px` suffix.
pub fn px() -> ValueTransform {
    ValueTransform {
        name: "gbgr/px",
        matcher: |ctx, value| {
            matches!(value, Resolved::Number(_))
                && ctx.kind == "number"
                && LENGTH_CATEGORIES.contains(&ctx.category())
        },
        transform: |_, value| match value {
            Resolved::Number(n) => Resolved::Text(format!("{}{LENGTH_UNIT}", format_number(&n))),
            other => other,
        },
    }
}

/// The transforms every built-in target runs, in order.
pub fn standard_transforms() -> Vec<ValueTransform> {
    vec![font_weight(), px()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_named_font_weights() {
        let p = path(&["fontWeights", "heading"]);
        let ctx = TokenContext { path: &p, kind: "text" };
        let t = font_weight();
        assert_eq!(
            t.apply(&ctx, Resolved::Text("SemiBold".into())),
            Resolved::Number(600.into())
        );
        assert_eq!(
            t.apply(&ctx, Resolved::Text("Black".into())),
            Resolved::Text("Black".into())
        );

        let other = path(&["typography", "heading"]);
        let ctx = TokenContext { path: &other, kind: "text" };
        assert_eq!(
            t.apply(&ctx, Resolved::Text("Bold".into())),
            Resolved::Text("Bold".into())
        );
    }

    #[test]
    fn suffixes_length_numbers() {
        let t = px();
        for category in LENGTH_CATEGORIES {
            let p = path(&[*category, "sm"]);
            let ctx = TokenContext { path: &p, kind: "number" };
            assert_eq!(
                t.apply(&ctx, Resolved::Number(4.into())),
                Resolved::Text("4px".into())
            );
        }

        let p = path(&["opacity", "half"]);
        let ctx = TokenContext { path: &p, kind: "number" };
        let half = Resolved::Number(Number::from_f64(0.5).unwrap());
        assert_eq!(t.apply(&ctx, half.clone()), half);

        let p = path(&["spacing", "sm"]);
        let ctx = TokenContext { path: &p, kind: "text" };
        assert_eq!(
            t.apply(&ctx, Resolved::Number(4.into())),
            Resolved::Number(4.into())
        );
    }
}
