/// The type of a hash code
pub type HashCode = u64;

/// Checks whether an object with the full hashcode `object_full_hashcode` could be of,
/// or derive from, the type with the hashcode `type_hashcode`.
#[inline]
pub fn maybe(type_hashcode: HashCode, object_full_hashcode: HashCode) -> bool {
    (object_full_hashcode & type_hashcode) == type_hashcode
}

/// Checks whether an object with the full hashcode `object_full_hashcode` could be of,
/// or derive from, any of the types whose hashcodes were OR'd into `combined_hashcode`.
#[inline]
pub fn maybe_any_of(combined_hashcode: HashCode, object_full_hashcode: HashCode) -> bool {
    let mask = object_full_hashcode & combined_hashcode;
    // Every hashcode has two bits set, so a mask with a single bit can't be a match.
    let two_bits = mask & mask.wrapping_sub(1);
    two_bits != 0
}

/// Type information for a Castable type.
///
/// One `static` instance exists per type, generated by [`castable!`](crate::castable!).
/// Types are identified by the address of that static.
#[derive(Debug)]
pub struct TypeInfo {
    /// The type this one derives from.
    pub base: Option<&'static TypeInfo>,
    /// The short type name, for diagnostics.
    pub name: &'static str,
    /// The fully qualified type name.
    pub path: &'static str,
    /// Two bits, derived from `path`.
    pub hashcode: HashCode,
    /// `hashcode` bitwise-or'd with the hashcodes of all ancestors.
    pub full_hashcode: HashCode,
}

impl TypeInfo {
    pub const fn new(
        base: Option<&'static TypeInfo>,
        name: &'static str,
        path: &'static str,
    ) -> Self {
        let hashcode = hash_code_of(path);
        let full_hashcode = match base {
            Some(base) => hashcode | base.full_hashcode,
            None => hashcode,
        };
        Self {
            base,
            name,
            path,
            hashcode,
            full_hashcode,
        }
    }

    /// Returns true if this type is, or derives from, `ty`.
    pub fn is(&self, ty: &TypeInfo) -> bool {
        if !maybe(ty.hashcode, self.full_hashcode) {
            return false;
        }
        self.ancestors().any(|t| std::ptr::eq(t, ty))
    }

    /// Returns true if this type is, or derives from, any of `types`.
    pub fn is_any_of(&self, types: &[&'static TypeInfo]) -> bool {
        match types {
            [] => false,
            [ty] => self.is(ty),
            _ => {
                if !maybe_any_of(combined_hash_code(types), self.full_hashcode) {
                    return false;
                }
                // Possibly one of `types`. Split the search in two and scan each half.
                let (low, high) = types.split_at(types.len() / 2);
                self.is_any_of(low) || self.is_any_of(high)
            }
        }
    }

    /// This type followed by its base chain, up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &TypeInfo> {
        std::iter::successors(Some(self), |t| t.base.map(|base| base as &TypeInfo))
    }

    /// Compile-time check that `derived` is `ancestor` or derives from it.
    pub const fn derives(derived: &TypeInfo, ancestor: &TypeInfo) -> bool {
        let mut current = Some(derived);
        while let Some(ty) = current {
            if str_eq(ty.path, ancestor.path) {
                return true;
            }
            current = ty.base;
        }
        false
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The bitwise-or of the hashcodes of `types`.
pub fn combined_hash_code(types: &[&'static TypeInfo]) -> HashCode {
    types.iter().fold(0, |acc, ty| acc | ty.hashcode)
}

/// Returns a hashcode with exactly two bits set.
/// Two bits keep the bloom filters from saturating when many hashcodes are OR'd together.
pub const fn hash_code_of(path: &str) -> HashCode {
    let crc = crc32(path.as_bytes());
    let bit_a = crc & 63;
    let bit_b = (crc >> 6) & 63;
    let bit_c = if bit_a == bit_b { (bit_a + 1) & 63 } else { bit_b };
    (1 << bit_a) | (1 << bit_c)
}

const fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    let mut i = 0;
    while i < bytes.len() {
        crc ^= bytes[i] as u32;
        let mut bit = 0;
        while bit < 8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            bit += 1;
        }
        i += 1;
    }
    !crc
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashcodes_have_two_bits() {
        for path in ["a", "Animal", "wgsl_rewriter::ast::Node", "", "ab_cd"] {
            assert_eq!(hash_code_of(path).count_ones(), 2, "{path}");
        }
    }

    #[test]
    fn crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn single_bit_mask_is_rejected() {
        assert!(!maybe_any_of(0b1, 0b1));
        assert!(maybe_any_of(0b11, 0b111));
        assert!(!maybe_any_of(0b1100, 0b0011));
    }

    static ROOT: TypeInfo = TypeInfo::new(None, "Root", "tests::Root");
    static CHILD: TypeInfo = TypeInfo::new(Some(&ROOT), "Child", "tests::Child");
    static OTHER: TypeInfo = TypeInfo::new(None, "Other", "tests::Other");

    #[test]
    fn full_hashcode_contains_ancestors() {
        assert_eq!(CHILD.full_hashcode & ROOT.full_hashcode, ROOT.full_hashcode);
        assert!(CHILD.is(&ROOT));
        assert!(!ROOT.is(&CHILD));
        assert!(!CHILD.is(&OTHER));
        assert!(CHILD.is_any_of(&[&OTHER, &ROOT]));
        assert!(!ROOT.is_any_of(&[]));
    }

    #[test]
    fn relations() {
        assert!(TypeInfo::derives(&CHILD, &ROOT));
        assert!(!TypeInfo::derives(&ROOT, &CHILD));
        assert!(!TypeInfo::derives(&OTHER, &CHILD));
    }
}
