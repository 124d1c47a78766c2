//! Hand-rolled RTTI for the node hierarchy.
//!
//! A type joins the hierarchy through [`castable!`](crate::castable!), which gives it a
//! static [`TypeInfo`]. Derived types embed their base as a `base` field, first in a
//! `#[repr(C)]` struct:
//!
//! ```
//! use wgsl_rewriter::castable;
//! use wgsl_rewriter::castable::{Castable, CastableExt};
//!
//! #[derive(Default)]
//! pub struct Animal;
//! castable!(Animal);
//!
//! #[derive(Default)]
//! #[repr(C)]
//! pub struct Sheep {
//!     pub base: Animal,
//! }
//! castable!(final Sheep: Animal);
//!
//! let sheep = Sheep::default();
//! let animal: &dyn Castable = &sheep;
//! assert!(animal.is::<Sheep>());
//! assert!(sheep.cast::<Animal>().is_some());
//! ```

mod switch;
mod type_info;

use std::any::Any;

pub use switch::{switch, Case, CaseMarker, Cases, DefaultCase, Fallback, Single, Typed};
pub use type_info::{
    combined_hash_code, hash_code_of, maybe, maybe_any_of, HashCode, TypeInfo,
};

/// Disables the compile-time check that a cast between two static types is possible.
/// Useful for generic code that gets instantiated with unrelated types.
pub const DONT_ERROR_ON_IMPOSSIBLE_CAST: u32 = 1;

/// An object that knows its own dynamic type.
///
/// Implemented by [`castable!`](crate::castable!), never by hand.
pub trait Castable: Any {
    /// The most derived type of this object.
    fn type_info(&self) -> &'static TypeInfo;
    fn as_any(&self) -> &dyn Any;
    fn as_castable(&self) -> &dyn Castable;
    /// Returns the part of this object that is of type `ty`: the object itself, or one
    /// of its embedded bases.
    fn upcast(&self, ty: &'static TypeInfo) -> Option<&dyn Any>;
}

/// A concrete type in the hierarchy.
pub trait Kind: Castable + Sized {
    const INFO: &'static TypeInfo;
    /// Nothing derives from a final type, so `is` is a pointer comparison.
    const FINAL: bool;
}

impl dyn Castable {
    /// Returns true if this object is of, or derives from, `T`.
    pub fn is<T: Kind>(&self) -> bool {
        is_type::<T>(self.type_info())
    }

    /// Returns true if this object is of, or derives from, `T`, and `pred` holds.
    pub fn is_and<T: Kind>(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        self.cast::<T>().is_some_and(pred)
    }

    /// Returns true if this object is of, or derives from, any of the types in `L`.
    pub fn is_any_of<L: KindList>(&self) -> bool {
        self.type_info().is_any_of(L::INFOS)
    }

    /// Returns this object as a `T`, or `None` if it isn't one.
    pub fn cast<T: Kind>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        self.upcast(T::INFO)?.downcast_ref::<T>()
    }
}

/// Typed queries, answered from the static type alone.
///
/// A `&T` may be the embedded base of a more derived object, so these only look up the
/// hierarchy. Downcasts go through `dyn Castable`, which knows the most derived type.
/// Casting to a type that `Self` does not derive from fails to compile:
///
/// ```compile_fail
/// use wgsl_rewriter::castable;
/// use wgsl_rewriter::castable::CastableExt;
///
/// pub struct Animal;
/// castable!(Animal);
/// #[repr(C)]
/// pub struct Sheep {
///     pub base: Animal,
/// }
/// castable!(Sheep: Animal);
///
/// let sheep = Sheep { base: Animal };
/// let animal: &Animal = &sheep.base;
/// animal.is::<Sheep>();
/// ```
pub trait CastableExt: Kind {
    fn is<TO: Kind>(&self) -> bool {
        self.is_flagged::<TO, 0>()
    }

    fn is_flagged<TO: Kind, const FLAGS: u32>(&self) -> bool {
        const {
            assert!(
                FLAGS & DONT_ERROR_ON_IMPOSSIBLE_CAST != 0 || TypeInfo::derives(Self::INFO, TO::INFO),
                "typed casts only go up the hierarchy, downcast through `dyn Castable`"
            )
        };
        const { TypeInfo::derives(Self::INFO, TO::INFO) }
    }

    fn is_and<TO: Kind>(&self, pred: impl FnOnce(&TO) -> bool) -> bool {
        self.cast::<TO>().is_some_and(pred)
    }

    /// Returns true if `Self` is, or derives from, any of the types in `L`.
    fn is_any_of<L: KindList>(&self) -> bool {
        Self::INFO.is_any_of(L::INFOS)
    }

    fn cast<TO: Kind>(&self) -> Option<&TO> {
        self.cast_flagged::<TO, 0>()
    }

    fn cast_flagged<TO: Kind, const FLAGS: u32>(&self) -> Option<&TO> {
        if !self.is_flagged::<TO, FLAGS>() {
            return None;
        }
        self.upcast(TO::INFO)?.downcast_ref::<TO>()
    }
}

impl<T: Kind> CastableExt for T {}

fn is_type<T: Kind>(object: &'static TypeInfo) -> bool {
    if T::FINAL {
        std::ptr::eq(object, T::INFO)
    } else {
        object.is(T::INFO)
    }
}

/// A tuple of [`Kind`]s, for [`is_any_of`](CastableExt::is_any_of).
pub trait KindList {
    const INFOS: &'static [&'static TypeInfo];
}

macro_rules! impl_kind_list {
    ($($T:ident),+) => {
        impl<$($T: Kind),+> KindList for ($($T,)+) {
            const INFOS: &'static [&'static TypeInfo] = &[$($T::INFO),+];
        }
    };
}

impl_kind_list!(A);
impl_kind_list!(A, B);
impl_kind_list!(A, B, C);
impl_kind_list!(A, B, C, D);
impl_kind_list!(A, B, C, D, E);
impl_kind_list!(A, B, C, D, E, F);
impl_kind_list!(A, B, C, D, E, F, G);
impl_kind_list!(A, B, C, D, E, F, G, H);
impl_kind_list!(A, B, C, D, E, F, G, H, I);
impl_kind_list!(A, B, C, D, E, F, G, H, I, J);

/// Adds a type to the Castable hierarchy.
///
/// - `castable!(Root)` declares a root type.
/// - `castable!(Derived: Base)` declares a type whose first field is `base: Base`.
/// - `castable!(final Leaf: Base)` additionally forbids deriving from `Leaf`.
///
/// A derived type whose `base` is not at offset zero is rejected:
///
/// ```compile_fail
/// use wgsl_rewriter::castable;
///
/// pub struct Animal {
///     pub legs: u32,
/// }
/// castable!(Animal);
/// #[repr(C)]
/// pub struct Sheep {
///     pub wool: u32,
///     pub base: Animal,
/// }
/// castable!(Sheep: Animal);
/// ```
#[macro_export]
macro_rules! castable {
    ($ty:ident) => {
        $crate::castable!(@kind $ty, ::core::option::Option::None, false);

        impl $crate::castable::Castable for $ty {
            fn type_info(&self) -> &'static $crate::castable::TypeInfo {
                <Self as $crate::castable::Kind>::INFO
            }
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
            fn as_castable(&self) -> &dyn $crate::castable::Castable {
                self
            }
            fn upcast(
                &self,
                ty: &'static $crate::castable::TypeInfo,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                if ::core::ptr::eq(ty, <Self as $crate::castable::Kind>::INFO) {
                    ::core::option::Option::Some(self)
                } else {
                    ::core::option::Option::None
                }
            }
        }
    };
    (final $ty:ident : $base:ty) => {
        $crate::castable!(@derived $ty, $base, true);
    };
    ($ty:ident : $base:ty) => {
        $crate::castable!(@derived $ty, $base, false);
    };
    (@derived $ty:ident, $base:ty, $final:expr) => {
        const _: () = assert!(
            !<$base as $crate::castable::Kind>::FINAL,
            concat!(stringify!($ty), " derives from a final type")
        );
        const _: () = assert!(
            ::core::mem::offset_of!($ty, base) == 0,
            concat!(stringify!($ty), " must be #[repr(C)] with `base` as its first field")
        );

        $crate::castable!(
            @kind $ty,
            ::core::option::Option::Some(<$base as $crate::castable::Kind>::INFO),
            $final
        );

        impl $crate::castable::Castable for $ty {
            fn type_info(&self) -> &'static $crate::castable::TypeInfo {
                <Self as $crate::castable::Kind>::INFO
            }
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
            fn as_castable(&self) -> &dyn $crate::castable::Castable {
                self
            }
            fn upcast(
                &self,
                ty: &'static $crate::castable::TypeInfo,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                if ::core::ptr::eq(ty, <Self as $crate::castable::Kind>::INFO) {
                    ::core::option::Option::Some(self)
                } else {
                    <$base as $crate::castable::Castable>::upcast(&self.base, ty)
                }
            }
        }
    };
    (@kind $ty:ident, $base:expr, $final:expr) => {
        impl $crate::castable::Kind for $ty {
            const INFO: &'static $crate::castable::TypeInfo = {
                static INFO: $crate::castable::TypeInfo = $crate::castable::TypeInfo::new(
                    $base,
                    stringify!($ty),
                    concat!(module_path!(), "::", stringify!($ty)),
                );
                &INFO
            };
            const FINAL: bool = $final;
        }
    };
}
