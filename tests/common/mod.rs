#![allow(dead_code)]

use wgsl_rewriter::castable;
use wgsl_rewriter::castable::{Castable, Kind, TypeInfo};

#[derive(Debug, Default)]
pub struct Animal {
    pub name: &'static str,
}
castable!(Animal);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Amphibian {
    pub base: Animal,
}
castable!(Amphibian: Animal);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Mammal {
    pub base: Animal,
}
castable!(Mammal: Animal);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Reptile {
    pub base: Animal,
}
castable!(Reptile: Animal);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Frog {
    pub base: Amphibian,
}
castable!(final Frog: Amphibian);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Bear {
    pub base: Mammal,
}
castable!(final Bear: Mammal);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Lizard {
    pub base: Reptile,
}
castable!(Lizard: Reptile);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Gecko {
    pub base: Lizard,
}
castable!(final Gecko: Lizard);

#[derive(Debug, Default)]
#[repr(C)]
pub struct Iguana {
    pub base: Lizard,
}
castable!(final Iguana: Lizard);

/// One instance of every animal, in the order of [`infos`].
pub fn zoo() -> Vec<Box<dyn Castable>> {
    vec![
        Box::new(Animal::default()),
        Box::new(Amphibian::default()),
        Box::new(Mammal::default()),
        Box::new(Reptile::default()),
        Box::new(Frog::default()),
        Box::new(Bear::default()),
        Box::new(Lizard::default()),
        Box::new(Gecko::default()),
        Box::new(Iguana::default()),
    ]
}

pub fn infos() -> [&'static TypeInfo; 9] {
    [
        Animal::INFO,
        Amphibian::INFO,
        Mammal::INFO,
        Reptile::INFO,
        Frog::INFO,
        Bear::INFO,
        Lizard::INFO,
        Gecko::INFO,
        Iguana::INFO,
    ]
}

/// Index in [`infos`] of the base of each animal.
pub const PARENT: [Option<usize>; 9] = [
    None,
    Some(0),
    Some(0),
    Some(0),
    Some(1),
    Some(2),
    Some(3),
    Some(6),
    Some(6),
];

/// Whether animal `derived` is animal `ancestor`, or derives from it.
pub fn derives(derived: usize, ancestor: usize) -> bool {
    std::iter::successors(Some(derived), |&i| PARENT[i]).any(|i| i == ancestor)
}
