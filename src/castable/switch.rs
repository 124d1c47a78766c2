//! `switch()`: calls the first case whose parameter type matches an object.
//!
//! ```
//! use wgsl_rewriter::castable;
//! use wgsl_rewriter::castable::{switch, Castable, DefaultCase};
//!
//! pub struct Animal;
//! castable!(Animal);
//! #[repr(C)]
//! pub struct Frog {
//!     pub base: Animal,
//! }
//! castable!(Frog: Animal);
//!
//! let frog = Frog { base: Animal };
//! let name = switch(
//!     frog.as_castable(),
//!     (
//!         |_: &Frog| "frog",
//!         |_: &Animal| "animal",
//!         |_: DefaultCase| "unknown",
//!     ),
//! );
//! assert_eq!(name, "frog");
//! ```

use std::marker::PhantomData;

use super::{maybe_any_of, Castable, Kind, TypeInfo};

/// The parameter type of the catch-all case. Must be the last case.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCase;

/// Marker for a case taking `&T`.
pub struct Typed<T>(PhantomData<fn(&T)>);

/// Marker for a case taking [`DefaultCase`].
pub struct Fallback;

/// Marker for a single case passed without a tuple.
pub struct Single<M>(PhantomData<M>);

pub trait CaseMarker {
    /// `None` for the default case.
    const INFO: Option<&'static TypeInfo>;
    const IS_DEFAULT: bool = Self::INFO.is_none();
}

impl<T: Kind> CaseMarker for Typed<T> {
    const INFO: Option<&'static TypeInfo> = Some(T::INFO);
}

impl CaseMarker for Fallback {
    const INFO: Option<&'static TypeInfo> = None;
}

/// A single switch case.
pub trait Case<'a, R, M: CaseMarker> {
    fn call(self, object: Option<&'a dyn Castable>) -> R;
}

impl<'a, R, T: Kind, F: FnOnce(&'a T) -> R> Case<'a, R, Typed<T>> for F {
    fn call(self, object: Option<&'a dyn Castable>) -> R {
        match object.and_then(|o| o.cast::<T>()) {
            Some(object) => self(object),
            None => crate::ice!("switch case for {} called with another type", T::INFO),
        }
    }
}

impl<'a, R, F: FnOnce(DefaultCase) -> R> Case<'a, R, Fallback> for F {
    fn call(self, _object: Option<&'a dyn Castable>) -> R {
        self(DefaultCase)
    }
}

/// An ordered list of cases.
pub trait Cases<'a, R, M> {
    fn dispatch(self, object: Option<&'a dyn Castable>) -> R;
}

/// Calls the first case of `cases` whose parameter type `object` is, or derives from.
///
/// A `None` object only matches the [`DefaultCase`]. Without a matching case and without a
/// [`DefaultCase`], nothing is called and `R::default()` is returned.
pub fn switch<'a, R, M, C>(object: impl Into<Option<&'a dyn Castable>>, cases: C) -> R
where
    C: Cases<'a, R, M>,
{
    cases.dispatch(object.into())
}

/// Index of the first case matching `object`. `cases` holds no default case.
fn first_match(object: &TypeInfo, cases: &[Option<&'static TypeInfo>]) -> Option<usize> {
    match cases {
        [] => None,
        [Some(ty)] if object.is(ty) => Some(0),
        [_] => None,
        _ => {
            let combined = cases.iter().flatten().fold(0, |acc, ty| acc | ty.hashcode);
            if !maybe_any_of(combined, object.full_hashcode) {
                return None;
            }
            // The low half is searched first, so the earliest case wins.
            let mid = cases.len() / 2;
            first_match(object, &cases[..mid])
                .or_else(|| first_match(object, &cases[mid..]).map(|i| i + mid))
        }
    }
}

fn no_match<R: Default>(object: Option<&dyn Castable>) -> R {
    tracing::trace!(
        object = ?object.map(|o| o.type_info().name),
        "switch matched no case and has no default"
    );
    R::default()
}

impl<'a, R: Default, T: Kind, F> Cases<'a, R, Single<Typed<T>>> for F
where
    F: Case<'a, R, Typed<T>>,
{
    fn dispatch(self, object: Option<&'a dyn Castable>) -> R {
        match object {
            Some(o) if o.is::<T>() => self.call(object),
            _ => no_match(object),
        }
    }
}

impl<'a, R, F> Cases<'a, R, Single<Fallback>> for F
where
    F: Case<'a, R, Fallback>,
{
    fn dispatch(self, object: Option<&'a dyn Castable>) -> R {
        self.call(object)
    }
}

macro_rules! impl_cases {
    ($($C:ident $M:ident $idx:tt),* ; $L:ident $lidx:tt) => {
        // The last case is typed: no match yields `R::default()`.
        impl<'a, R: Default, $($C, $M: CaseMarker,)* $L, T: Kind>
            Cases<'a, R, ($($M,)* Typed<T>,)> for ($($C,)* $L,)
        where
            $($C: Case<'a, R, $M>,)*
            $L: Case<'a, R, Typed<T>>,
        {
            fn dispatch(self, object: Option<&'a dyn Castable>) -> R {
                const { $(assert!(!$M::IS_DEFAULT, "DefaultCase must be the last case");)* }
                let Some(o) = object else {
                    return no_match(object);
                };
                let infos: &[Option<&'static TypeInfo>] = &[$($M::INFO,)* Some(T::INFO)];
                match first_match(o.type_info(), infos) {
                    $(Some($idx) => self.$idx.call(object),)*
                    Some($lidx) => self.$lidx.call(object),
                    _ => no_match(object),
                }
            }
        }

        // The last case is the default.
        impl<'a, R, $($C, $M: CaseMarker,)* $L>
            Cases<'a, R, ($($M,)* Fallback,)> for ($($C,)* $L,)
        where
            $($C: Case<'a, R, $M>,)*
            $L: Case<'a, R, Fallback>,
        {
            fn dispatch(self, object: Option<&'a dyn Castable>) -> R {
                const { $(assert!(!$M::IS_DEFAULT, "DefaultCase must be the last case");)* }
                let infos: &[Option<&'static TypeInfo>] = &[$($M::INFO,)*];
                let index = match object {
                    Some(o) => first_match(o.type_info(), infos),
                    None => None,
                };
                match index {
                    $(Some($idx) => self.$idx.call(object),)*
                    _ => self.$lidx.call(object),
                }
            }
        }
    };
}

impl_cases!(; A0 0);
impl_cases!(A0 M0 0; A1 1);
impl_cases!(A0 M0 0, A1 M1 1; A2 2);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2; A3 3);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3; A4 4);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4; A5 5);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5; A6 6);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5, A6 M6 6; A7 7);
impl_cases!(A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5, A6 M6 6, A7 M7 7; A8 8);
impl_cases!(
    A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5, A6 M6 6, A7 M7 7, A8 M8 8; A9 9
);
impl_cases!(
    A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5, A6 M6 6, A7 M7 7, A8 M8 8, A9 M9 9;
    A10 10
);
impl_cases!(
    A0 M0 0, A1 M1 1, A2 M2 2, A3 M3 3, A4 M4 4, A5 M5 5, A6 M6 6, A7 M7 7, A8 M8 8, A9 M9 9,
    A10 M10 10; A11 11
);
