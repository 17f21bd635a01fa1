//! Detection of the stray markup tag some generators prepend to index paths,
//! e.g. `<Entry>Foo/Bar.html`.

/// Returns the path with its leading `<...>` tag removed, or `None` when the
/// path does not carry one.
///
/// Only the first tag is stripped: `<a><b>x` becomes `<b>x`. A `<` inside the
/// tag (`<a<b>x`) means the prefix is not a well-formed tag. A path that is
/// nothing but a tag (`<Entry>`) yields the empty string.
pub fn strip_leading_tag(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('<')?;
    let pos = rest.find(['<', '>'])?;
    if rest.as_bytes()[pos] == b'>' {
        Some(&rest[pos + 1..])
    } else {
        None
    }
}
