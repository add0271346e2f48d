//! Type bits for tiles and bodies, and the name registry for them.
//!
//! A body's _type_ says what it is and its _collision mask_ says what it
//! reacts to. Both are `TypeMask`s. The built-in bits are known at compile
//! time. Games may register further named bits at startup through
//! `TypeRegistry`, which then gets finalized into a read-only `TypeTable`
//! before any collision test runs.

use bitflags::bitflags;


bitflags! {
    /// Bitmask of type bits.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct TypeMask: u32 {
        /// Other bodies may dock to (stand on, be carried by) this.
        const DOCKABLE = 1 << 0;
        /// Ordinary solid geometry, including the tile grid.
        const DEFAULT = 1 << 1;
        /// Only collides with bodies coming from above.
        const ONE_WAY_PLATFORM = 1 << 2;
        /// Arrows, shots, fireballs.
        const PARTICLE = 1 << 3;
        const FRIENDLY = 1 << 4;
        const ENEMY = 1 << 5;
        const LADDER = 1 << 6;
        const LIQUID = 1 << 7;
        const EXIT = 1 << 8;

        // bits past the built-ins are handed out by `TypeRegistry`
        const _ = !0;
    }
}

/// Hard cap on the number of distinct type bits.
pub const MAX_TYPE_BITS: u32 = u32::BITS;

const BUILTINS: [(&str, TypeMask); 11] = [
    ("none", TypeMask::empty()),
    ("dockable", TypeMask::DOCKABLE),
    ("default", TypeMask::DEFAULT),
    ("one_way_platform", TypeMask::ONE_WAY_PLATFORM),
    ("particle", TypeMask::PARTICLE),
    ("friendly", TypeMask::FRIENDLY),
    ("enemy", TypeMask::ENEMY),
    ("ladder", TypeMask::LADDER),
    ("liquid", TypeMask::LIQUID),
    ("exit", TypeMask::EXIT),
    ("all", TypeMask::all()),
];

const FIRST_FREE_BIT: u32 = 9;


/// Registry of type names to type bits, used during startup.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: Vec<(String, TypeMask)>,
    next_bit: u32,
}

impl TypeRegistry {
    /// Construct with the built-in names already registered.
    pub fn new() -> Self {
        TypeRegistry {
            entries: BUILTINS
                .iter()
                .map(|&(name, mask)| (name.to_owned(), mask))
                .collect(),
            next_bit: FIRST_FREE_BIT,
        }
    }

    /// Get the mask for `name`, assigning it a fresh bit if it's new.
    ///
    /// Panics if all bits are used up.
    pub fn register(&mut self, name: &str) -> TypeMask {
        let name = name.trim();
        if let Some(mask) = lookup(&self.entries, name) {
            return mask;
        }
        assert!(
            self.next_bit < MAX_TYPE_BITS,
            "too many type bits registered (registering {:?})", name,
        );
        let mask = TypeMask::from_bits_retain(1 << self.next_bit);
        self.next_bit += 1;
        self.entries.push((name.to_owned(), mask));
        mask
    }

    /// Register every name in a comma-separated list and union the results.
    pub fn register_all(&mut self, names: &str) -> TypeMask {
        names
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .fold(TypeMask::empty(), |mask, name| mask | self.register(name))
    }

    /// Freeze into a read-only table.
    pub fn finalize(self) -> TypeTable {
        TypeTable {
            entries: self.entries,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}


/// Finalized, read-only mapping of type names to type bits.
#[derive(Debug, Clone)]
pub struct TypeTable {
    entries: Vec<(String, TypeMask)>,
}

impl TypeTable {
    pub fn get(&self, name: &str) -> Option<TypeMask> {
        lookup(&self.entries, name.trim())
    }

    /// Union of the masks of a comma-separated list of names, or `None` if any
    /// name isn't registered.
    pub fn parse(&self, names: &str) -> Option<TypeMask> {
        names
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .try_fold(TypeMask::empty(), |mask, name| Some(mask | self.get(name)?))
    }

    /// Comma-separated names of the single-bit types in `mask`, for logging.
    pub fn describe(&self, mask: TypeMask) -> String {
        self.entries
            .iter()
            .filter(|&&(_, bit)| bit.bits().count_ones() == 1 && mask.contains(bit))
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn lookup(entries: &[(String, TypeMask)], name: &str) -> Option<TypeMask> {
    entries
        .iter()
        .find(|(name2, _)| name2 == name)
        .map(|&(_, mask)| mask)
}
