//! Callout configuration.
//!
//! Property values are trimmed, then every `{name}` is replaced by the
//! context variable `name`. Unknown variables resolve to nothing. A value
//! that ends up empty counts as absent.

use std::collections::HashMap;

use crate::{CalloutError, VariableContext};

/// Read-only string properties given to the callout by its host.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value as configured, without trimming or resolution.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn optional<V>(&self, name: &str, ctx: &V) -> Option<String>
    where
        V: VariableContext + ?Sized,
    {
        let value = self.raw(name)?.trim();
        if value.is_empty() {
            return None;
        }
        let resolved = resolve(value, ctx);
        (!resolved.is_empty()).then_some(resolved)
    }

    pub fn required<V>(&self, name: &str, ctx: &V) -> Result<String, CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        self.optional(name, ctx)
            .ok_or_else(|| CalloutError::config(format!("{name} resolves to an empty string.")))
    }

    /// True only for a literal `true`, ignoring case and surrounding space.
    pub fn flag(&self, name: &str) -> bool {
        self.raw(name)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (k, v) in iter {
            properties.insert(k, v);
        }
        properties
    }
}

/// Replace each `{name}` in `template` with the value of `name`.
///
/// Names may not be empty or contain braces; anything else is copied
/// through unchanged.
pub fn resolve<V>(template: &str, ctx: &V) -> String
where
    V: VariableContext + ?Sized,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if close > 0 && after.as_bytes()[close] == b'}' => {
                out.push_str(&rest[..open]);
                out.push_str(&ctx.get(&after[..close]).unwrap_or_default());
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryContext;

    fn ctx() -> MemoryContext {
        let mut ctx = MemoryContext::new();
        ctx.set("parsedInput.bits", "18".into());
        ctx.set("who", "alice".into());
        ctx
    }

    #[test]
    fn resolves_references() {
        let ctx = ctx();
        assert_eq!(resolve("{parsedInput.bits}", &ctx), "18");
        assert_eq!(resolve("hi {who}, {who}!", &ctx), "hi alice, alice!");
        assert_eq!(resolve("plain", &ctx), "plain");
    }

    #[test]
    fn unknown_reference_is_empty() {
        assert_eq!(resolve("a{nope}b", &ctx()), "ab");
    }

    #[test]
    fn malformed_braces_pass_through() {
        let ctx = ctx();
        assert_eq!(resolve("{}", &ctx), "{}");
        assert_eq!(resolve("{who", &ctx), "{who");
        assert_eq!(resolve("{{who}", &ctx), "{alice");
        assert_eq!(resolve("who}", &ctx), "who}");
    }

    #[test]
    fn required_and_optional() {
        let ctx = ctx();
        let props: Properties = [
            ("bits", " {parsedInput.bits} "),
            ("blank", "   "),
            ("dangling", "{nope}"),
        ]
        .into_iter()
        .collect();

        assert_eq!(props.required("bits", &ctx).unwrap(), "18");
        assert_eq!(props.optional("blank", &ctx), None);
        assert_eq!(props.optional("dangling", &ctx), None);
        assert_eq!(props.optional("absent", &ctx), None);
        for name in ["blank", "dangling", "absent"] {
            let err = props.required(name, &ctx).unwrap_err();
            assert_eq!(err.to_string(), format!("{name} resolves to an empty string."));
        }
    }

    #[test]
    fn flags() {
        let props: Properties = [("a", " TRUE "), ("b", "yes"), ("c", "{x}")]
            .into_iter()
            .collect();
        assert!(props.flag("a"));
        assert!(!props.flag("b"));
        assert!(!props.flag("c"));
        assert!(!props.flag("missing"));
    }
}
