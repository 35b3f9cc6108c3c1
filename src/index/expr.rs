//! Dependency expression stripping

/// Strip a Debian `Depends` item down to its first bare package name
///
/// `"libc (>= 2.7) | libc6"` becomes `"libc"`; multiarch qualifiers such as
/// `"python3:any"` lose their suffix.
pub fn strip_debian(expr: &str) -> &str {
    let first = expr.split('|').next().unwrap_or(expr);
    let name = first.split('(').next().unwrap_or(first).trim();
    name.split(':').next().unwrap_or(name)
}

/// Strip a pacman/apk style constraint (`name<1.0`, `name>=2`, `name=3`)
pub fn strip_operator(expr: &str) -> &str {
    let end = expr.find(['<', '>', '=']).unwrap_or(expr.len());
    expr[..end].trim()
}

/// Split a Debian `Depends` value into bare names, in order
pub fn debian_depends(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(strip_debian)
        .filter(|name| !name.is_empty())
}
