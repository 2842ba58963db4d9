//! Key canonicalization
//!
//! Design-tool exports use free-form names (`"olive green"`, `"device mode"`,
//! occasionally misspelled ones like `"sementic"`). Every key is turned into a
//! hyphenated identifier that is safe to use as a path segment and a CSS
//! variable fragment.

/// Known misspellings in upstream exports and their corrected form.
///
/// Lookup is exact and case-sensitive.
const TYPO_FIX: &[(&str, &str)] = &[
    ("sementic", "semantic"),
    ("compoenent", "component"),
    ("diabeld", "disabled"),
    ("Minimun", "Minimum"),
];

fn typo_fix(key: &str) -> Option<&'static str> {
    TYPO_FIX
        .iter()
        .find(|(typo, _)| *typo == key)
        .map(|(_, fixed)| *fixed)
}

/// Canonicalize a raw token key.
///
/// - `"olive green"` -> `"olive-green"`
/// - `"device mode"` -> `"device-mode"`
/// - `"sementic"` -> `"semantic"` (typo dictionary)
///
/// The result is stable under repeated application.
pub fn normalize_key(raw: &str) -> String {
    if let Some(fixed) = typo_fix(raw) {
        return fixed.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut last_hyphen = false;
    for c in raw.trim().chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' {
            c
        } else {
            // whitespace runs, underscores and punctuation all fold into one hyphen
            '-'
        };
        if c == '-' {
            if last_hyphen {
                continue;
            }
            last_hyphen = true;
        } else {
            last_hyphen = false;
        }
        out.push(c);
    }

    let out = out.trim_matches('-');
    // A key such as " sementic " only becomes a known typo after trimming.
    match typo_fix(out) {
        Some(fixed) => fixed.to_string(),
        None => out.to_string(),
    }
}

/// Collection names are keys, lowercased (`"Primitives"` -> `"primitives"`).
pub fn normalize_collection_name(name: &str) -> String {
    normalize_key(name).to_ascii_lowercase()
}

/// Mode names are lowercased keys; an empty result falls back to `"default"`.
pub fn normalize_mode_name(name: &str) -> String {
    let mode = normalize_key(name).to_ascii_lowercase();
    match mode.as_str() {
        "light" | "dark" | "global" => mode,
        "" => "default".to_string(),
        _ => mode,
    }
}

/// Whether a key belongs to the reserved metadata namespace (`$metadata`, `$themes`, ...).
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with('$')
}
