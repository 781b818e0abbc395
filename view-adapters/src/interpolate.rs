//! `{{name}}` placeholder interpolation for declarative views.
//!
//! Each placeholder resolves by the first tier that yields a value:
//!
//! 1. `{{$a.b}}`: dotted path into the globals (as JSON). A missing or `null` segment leaves the
//!    placeholder as written; `$` names never fall through to the other tiers.
//! 2. The custom resolver, if one is configured.
//! 3. A direct key of the call-time params.
//! 4. Otherwise the placeholder is kept verbatim.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Call-time parameters of a declarative view.
pub type JsonParams = Map<String, Value>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid placeholder pattern"));

/// Everything a placeholder can resolve against during one render.
pub struct Scope<'a> {
    globals: &'a Value,
    resolver: Option<&'a (dyn Fn(&str) -> Option<String> + 'a)>,
    params: Option<&'a JsonParams>,
}

impl<'a> Scope<'a> {
    pub fn new(globals: &'a Value) -> Self {
        Self {
            globals,
            resolver: None,
            params: None,
        }
    }

    /// Resolver already bound to the globals of this render.
    pub fn with_resolver(mut self, resolver: &'a (dyn Fn(&str) -> Option<String> + 'a)) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_params(mut self, params: Option<&'a JsonParams>) -> Self {
        self.params = params;
        self
    }

    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(path) = name.strip_prefix('$') {
            return lookup_path(self.globals, path).map(stringify);
        }
        if let Some(value) = self.resolver.and_then(|resolve| resolve(name)) {
            return Some(value);
        }
        self.params.and_then(|p| p.get(name)).map(stringify)
    }
}

/// Replaces every `{{name}}` in `template`; unresolved placeholders stay as they are.
pub fn interpolate(template: &str, scope: &Scope<'_>) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            scope
                .lookup(caps[1].trim())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn lookup_path<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> JsonParams {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn test_params_substitution() {
        let globals = json!({});
        let p = params(json!({"name": "World", "n": 3, "ok": true}));
        let scope = Scope::new(&globals).with_params(Some(&p));

        assert_eq!(interpolate("Hello, {{name}}!", &scope), "Hello, World!");
        assert_eq!(interpolate("{{n}} items, {{ ok }}", &scope), "3 items, true");
    }

    #[test]
    fn test_missing_placeholders_are_kept() {
        let globals = json!({});
        let p = params(json!({"name": "Bob"}));
        let scope = Scope::new(&globals).with_params(Some(&p));
        assert_eq!(
            interpolate("Hello, {{name}}! Age: {{age}}", &scope),
            "Hello, Bob! Age: {{age}}"
        );

        let bare = Scope::new(&globals);
        assert_eq!(interpolate("{{name}}", &bare), "{{name}}");
    }

    #[test]
    fn test_globals_path() {
        let globals = json!({"a": {"b": "v"}, "user": {"tags": ["x", "y"], "age": null}});
        let scope = Scope::new(&globals);

        assert_eq!(interpolate("{{$a.b}}", &scope), "v");
        assert_eq!(interpolate("{{$user.tags.1}}", &scope), "y");
        assert_eq!(interpolate("{{$user.tags}}", &scope), r#"["x","y"]"#);
        assert_eq!(interpolate("{{$a.c}}", &scope), "{{$a.c}}");
        assert_eq!(interpolate("{{$a.b.c}}", &scope), "{{$a.b.c}}");
        assert_eq!(interpolate("{{$user.age}}", &scope), "{{$user.age}}");
    }

    #[test]
    fn test_globals_path_absent_object() {
        let globals = json!({});
        assert_eq!(interpolate("{{$a.b}}", &Scope::new(&globals)), "{{$a.b}}");
    }

    #[test]
    fn test_resolver_precedence() {
        let globals = json!({"a": {"b": "from-globals"}});
        let p = params(json!({"greeting": "from-params", "other": "param"}));
        let resolver = |name: &str| (name == "greeting").then(|| "from-resolver".to_string());
        let scope = Scope::new(&globals)
            .with_resolver(&resolver)
            .with_params(Some(&p));

        assert_eq!(interpolate("{{greeting}}", &scope), "from-resolver");
        assert_eq!(interpolate("{{other}}", &scope), "param");
        // `$` names never reach the resolver.
        assert_eq!(interpolate("{{$a.b}}", &scope), "from-globals");
    }

    #[test]
    fn test_no_placeholders_and_braces() {
        let globals = json!({});
        let scope = Scope::new(&globals);
        assert_eq!(interpolate("plain", &scope), "plain");
        assert_eq!(interpolate("{{}} {single}", &scope), "{{}} {single}");
    }
}
