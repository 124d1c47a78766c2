//! Unambiguous names built from a prefix path.
//!
//! Each prefix part is written with its underscores doubled, followed by a single `_`.
//! The name comes last, also with doubled underscores. `["my_lib", "util"]` and `min_x`
//! give `my__lib_util_min__x`.

use crate::symbol::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmangledName {
    pub prefix: Vec<String>,
    pub name: String,
}

pub fn write_mangled_name<S: AsRef<str>>(prefix: &[S], name: &str, output: &mut String) {
    for part in prefix {
        write_escaped(part.as_ref(), output);
        output.push('_');
    }
    write_escaped(name, output)
}

pub fn mangle_name<S: AsRef<str>>(prefix: &[S], name: &str) -> String {
    let mut output = String::with_capacity(name.len() + 8);
    write_mangled_name(prefix, name, &mut output);
    output
}

fn write_escaped(name: &str, output: &mut String) {
    for c in name.chars() {
        if c == '_' {
            output.push_str("__");
        } else {
            output.push(c);
        }
    }
}

/// Returns `name` if it is an identifier. Otherwise characters that can't continue an
/// identifier become `_`, and a leading `v` is added. `__tmp` gives `v__tmp`.
pub fn to_identifier(name: String) -> String {
    if is_identifier(&name) {
        return name;
    }
    let mut output = String::with_capacity(name.len() + 1);
    output.push('v');
    output.extend(name.chars().map(|c| {
        if unicode_ident::is_xid_continue(c) {
            c
        } else {
            '_'
        }
    }));
    output
}

pub fn unmangle_name(mangled: &str) -> UnmangledName {
    let mut prefix = Vec::new();
    let mut name = String::new();
    let mut chars = mangled.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            name.push(c);
            continue;
        }
        match chars.next() {
            Some('_') => name.push('_'),
            Some(c) => {
                prefix.push(std::mem::take(&mut name));
                name.push(c);
            }
            None => prefix.push(std::mem::take(&mut name)),
        }
    }
    UnmangledName { prefix, name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles() {
        assert_eq!(mangle_name(&["my_lib", "util"], "min_x"), "my__lib_util_min__x");
        assert_eq!(mangle_name::<&str>(&[], "a_b"), "a__b");
    }

    #[test]
    fn unmangles() {
        let unmangled = unmangle_name("my__lib_util_min__x");
        assert_eq!(unmangled.prefix, ["my_lib", "util"]);
        assert_eq!(unmangled.name, "min_x");
    }

    #[test]
    fn reserved_names_become_identifiers() {
        assert_eq!(to_identifier(mangle_name::<&str>(&[], "_tmp")), "v__tmp");
        assert_eq!(to_identifier("1st".to_string()), "v1st");
        assert_eq!(to_identifier("a-b".to_string()), "va_b");
        assert_eq!(to_identifier("_".to_string()), "v_");
        assert_eq!(to_identifier("ok".to_string()), "ok");
    }
}
