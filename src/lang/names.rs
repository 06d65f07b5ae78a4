/// A textual type reference exactly as written in the schema, possibly
/// wrapped in non-null (`!`) and list (`[...]`) markers, e.g. `[Foo!]!`.
///
/// The wrappers stay textual; the only algebra the compiler needs is
/// stripping them off to find the declared name, and since stripping only
/// ever trims the ends, the bare name is always a subslice of the original
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef<'a>(pub &'a str);

impl<'a> TypeRef<'a> {
    /// The reference as written, wrappers included.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// The bare declared name with all wrapper markers stripped:
    /// `[[Foo!]]!` and `Foo` both yield `Foo`. An unmatched bracket is not
    /// a wrapper and is left in place.
    pub fn name(&self) -> &'a str {
        let mut name = self.0;
        loop {
            if let Some(inner) = name.strip_suffix('!') {
                name = inner;
                continue;
            }
            match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
                Some(inner) => name = inner,
                None => return name,
            }
        }
    }
}
