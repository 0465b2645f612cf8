//! Dot-qualified name construction, centralized so every extractor and
//! drift rule builds identical identities.

/// Join non-empty parts with dots: `["pkg", "Cls", "meth"]` → `pkg.Cls.meth`.
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(part);
    }
    out
}

/// Qualified name of `name` inside the enclosing `context` scopes. With no
/// name, the context path itself (possibly empty).
pub fn qualify(context: &[String], name: Option<&str>) -> String {
    join(context.iter().map(String::as_str).chain(name))
}

/// Final dotted segment: `a.b.c` → `c`.
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Dotted prefix, if any: `a.b.c` → `a.b`.
pub fn parent_path(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(head, _)| head)
}
