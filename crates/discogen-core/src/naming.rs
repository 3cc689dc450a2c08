//! Identifier construction for generated clients.

/// Case-correct an API name against the words of its title.
///
/// Walks `name` left-to-right; at each position, tries each word in `words`
/// and, if `name` continues with that word (case-insensitively), splices the
/// word's original casing in and skips past it. Positions matching no word are
/// copied through unchanged, one character at a time.
///
/// `primary_name("bigquery", &["BigQuery", "API"])` yields `"BigQuery"`.
pub fn primary_name(name: &str, words: &[&str]) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    'outer: while !rest.is_empty() {
        for word in words {
            if !word.is_empty()
                && rest.is_char_boundary(word.len())
                && rest.len() >= word.len()
                && rest[..word.len()].eq_ignore_ascii_case(word)
            {
                out.push_str(word);
                rest = &rest[word.len()..];
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Join resource-path segments into a camelCase method name:
/// the first segment as-is, every later segment capitalized.
pub fn camel_join(parts: &[&str]) -> String {
    let mut iter = parts.iter();
    let mut out = match iter.next() {
        None => return String::new(),
        Some(first) => (*first).to_string(),
    };
    for part in iter {
        out.push_str(&capitalize(part));
    }
    out
}

/// Join resource-path segments into a PascalCase type name.
pub fn pascal_join(parts: &[&str]) -> String {
    parts.iter().map(|part| capitalize(part)).collect()
}

/// Whether `s` can be emitted as a bare TypeScript identifier.
/// Keys failing this test are emitted as quoted string literals.
pub fn is_ts_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        None => false,
        Some(first) if !first.is_ascii_alphabetic() && first != '_' && first != '$' => false,
        Some(_) => chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    }
}

/// Escape a string for use inside a TypeScript double-quoted literal.
pub fn escape_ts_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Property access expression: dot form for identifier keys,
/// bracketed string index otherwise.
pub fn member_expr(target: &str, key: &str) -> String {
    if is_ts_identifier(key) {
        format!("{target}.{key}")
    } else {
        format!("{target}[\"{}\"]", escape_ts_string(key))
    }
}

/// Property key in a declaration or object-literal position:
/// bare for identifier keys, quoted string otherwise.
pub fn property_key(key: &str) -> String {
    if is_ts_identifier(key) {
        key.to_string()
    } else {
        format!("\"{}\"", escape_ts_string(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_name() {
        assert_eq!(primary_name("bigquery", &["BigQuery", "API"]), "BigQuery");
        assert_eq!(primary_name("mini", &["Mini", "API"]), "Mini");
        assert_eq!(
            primary_name("cloudresourcemanager", &["Cloud", "Resource", "Manager", "API"]),
            "CloudResourceManager"
        );
        // No matching word: the name passes through unchanged
        assert_eq!(primary_name("webfonts", &["Totally", "Different"]), "webfonts");
        // A word matching mid-name is spliced at that position
        assert_eq!(primary_name("adsense", &["AdSense"]), "AdSense");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("things"), "Things");
        assert_eq!(capitalize("Things"), "Things");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_camel_join() {
        assert_eq!(camel_join(&["things", "list"]), "thingsList");
        assert_eq!(camel_join(&["projects", "locations", "get"]), "projectsLocationsGet");
        assert_eq!(camel_join(&["get"]), "get");
    }

    #[test]
    fn test_pascal_join() {
        assert_eq!(pascal_join(&["things", "get"]), "ThingsGet");
        assert_eq!(pascal_join(&["projects", "locations", "get"]), "ProjectsLocationsGet");
    }

    #[test]
    fn test_is_ts_identifier() {
        assert!(is_ts_identifier("pageSize"));
        assert!(is_ts_identifier("_private"));
        assert!(is_ts_identifier("$ref"));
        assert!(!is_ts_identifier("foo.bar"));
        assert!(!is_ts_identifier("123abc"));
        assert!(!is_ts_identifier(""));
    }

    #[test]
    fn test_member_expr() {
        assert_eq!(member_expr("opts", "filter"), "opts.filter");
        assert_eq!(member_expr("opts", "foo.bar"), "opts[\"foo.bar\"]");
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("filter"), "filter");
        assert_eq!(property_key("foo.bar"), "\"foo.bar\"");
    }
}
