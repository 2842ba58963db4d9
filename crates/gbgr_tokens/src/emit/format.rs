//! Style sheet formats

use std::fmt::Write as _;

/// Attribute the theme toggle sets on the root element.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Banner placed at the top of every generated file. It carries no timestamp
/// so that identical input always yields identical bytes.
pub const FILE_HEADER: &str = "/**\n * Do not edit directly, this file was auto-generated.\n */\n";

/// One `--name: value;` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

/// A named formatter turning declarations into file contents.
#[derive(Clone, Copy)]
pub struct Format {
    pub name: &'static str,
    pub render: fn(&[Declaration]) -> String,
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Format").field(&self.name).finish()
    }
}

/// CSS custom property name for a token path.
///
/// Segments are joined with `-`, camelCase is split and everything is
/// lowercased: `["fontSize", "body-lg"]` -> `--font-size-body-lg`.
pub fn variable_name<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::from("--");
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        let mut prev_lower = false;
        for c in segment.as_ref().chars() {
            if c.is_ascii_uppercase() {
                if prev_lower {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
                prev_lower = false;
            } else {
                out.push(c);
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            }
        }
    }
    out
}

fn write_declarations(out: &mut String, declarations: &[Declaration], indent: &str) {
    for d in declarations {
        let _ = writeln!(out, "{indent}{}: {};", d.name, d.value);
    }
}

/// `:root { ... }` block of custom properties.
pub fn css_variables() -> Format {
    Format {
        name: "css/variables",
        render: |declarations| {
            let mut out = String::from(FILE_HEADER);
            out.push('\n');
            out.push_str(":root {\n");
            write_declarations(&mut out, declarations, "  ");
            out.push_str("}\n");
            out
        },
    }
}

/// Dark overrides, applied when the theme attribute says `dark`, or when the
/// platform prefers dark and no explicit theme was chosen.
pub fn css_dark_override() -> Format {
    Format {
        name: "css/dark-theme-override",
        render: |declarations| {
            let mut out = String::from(FILE_HEADER);
            out.push('\n');
            let _ = writeln!(out, ":root[{THEME_ATTRIBUTE}=\"dark\"] {{");
            write_declarations(&mut out, declarations, "  ");
            out.push_str("}\n\n");
            out.push_str("@media (prefers-color-scheme: dark) {\n");
            let _ = writeln!(out, "  :root:not([{THEME_ATTRIBUTE}]) {{");
            write_declarations(&mut out, declarations, "    ");
            out.push_str("  }\n}\n");
            out
        },
    }
}

/// A style sheet that only `@import`s others, in order.
pub fn imports(files: &[&str]) -> String {
    let mut out = String::from("/* This file is auto-generated. */\n");
    for file in files {
        let _ = writeln!(out, "@import \"./{file}\";");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decl(name: &str, value: &str) -> Declaration {
        Declaration {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn variable_names() {
        assert_eq!(variable_name(&["color", "brand"]), "--color-brand");
        assert_eq!(variable_name(&["fontSize", "body-lg"]), "--font-size-body-lg");
        assert_eq!(variable_name(&["device-mode", "mobile"]), "--device-mode-mobile");
        assert_eq!(variable_name(&["spacing", "100"]), "--spacing-100");
        assert_eq!(variable_name(&["color", "grayA11"]), "--color-gray-a11");
    }

    #[test]
    fn plain_variables_block() {
        let css = (css_variables().render)(&[decl("--spacing-sm", "4px")]);
        assert_eq!(
            css,
            format!("{FILE_HEADER}\n:root {{\n  --spacing-sm: 4px;\n}}\n")
        );
    }

    #[test]
    fn dark_override_is_scoped_twice() {
        let css = (css_dark_override().render)(&[decl("--color-brand", "#000000")]);
        let expected = format!(
            "{FILE_HEADER}\n\
             :root[data-theme=\"dark\"] {{\n  --color-brand: #000000;\n}}\n\n\
             @media (prefers-color-scheme: dark) {{\n  :root:not([data-theme]) {{\n    --color-brand: #000000;\n  }}\n}}\n"
        );
        assert_eq!(css, expected);
        assert!(!css.contains("data-theme=\"light\""));
    }

    #[test]
    fn import_order_is_kept() {
        assert_eq!(
            imports(&["theme.light.css", "theme.dark.css"]),
            "/* This file is auto-generated. */\n@import \"./theme.light.css\";\n@import \"./theme.dark.css\";\n"
        );
    }
}
