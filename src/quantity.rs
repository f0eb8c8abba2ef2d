//! Quantity catalog
//!
//! Static mapping from the human-readable field names used by callers
//! (`"px"`, `"pdg_id"`, ...) to the [`Quantity`] tags written in stream
//! headers and the [`QuantityType`] that decides how many bytes a field
//! occupies inside a particle record.
//!
//! Tags are part of the wire format. New quantities are only ever appended;
//! existing tags never change meaning, so older runs keep decoding.

use std::fmt;

/// Storage type of a quantity inside a particle record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityType {
    /// 8-byte little-endian IEEE 754 double
    Double,
    /// 4-byte little-endian signed integer
    Int32,
}

impl QuantityType {
    /// Number of bytes the value occupies in a record
    pub const fn width(self) -> usize {
        match self {
            QuantityType::Double => 8,
            QuantityType::Int32 => 4,
        }
    }
}

impl fmt::Display for QuantityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityType::Double => f.write_str("double"),
            QuantityType::Int32 => f.write_str("int32"),
        }
    }
}

macro_rules! quantities {
    ($($(#[$doc:meta])* $variant:ident = $tag:literal, $name:literal, $ty:ident;)+) => {
        /// Physical field a particle record can carry
        ///
        /// The discriminant is the tag used in stream headers.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum Quantity {
            $($(#[$doc])* $variant = $tag,)+
        }

        impl Quantity {
            /// Every known quantity, in tag order
            pub const ALL: &'static [Quantity] = &[$(Quantity::$variant,)+];

            /// Look up a quantity by its header tag
            pub fn from_tag(tag: u32) -> Option<Self> {
                match tag {
                    $($tag => Some(Quantity::$variant),)+
                    _ => None,
                }
            }

            /// Field name used by callers and in collector columns
            pub const fn name(self) -> &'static str {
                match self {
                    $(Quantity::$variant => $name,)+
                }
            }

            /// Declared storage type
            pub const fn quantity_type(self) -> QuantityType {
                match self {
                    $(Quantity::$variant => QuantityType::$ty,)+
                }
            }

            /// Look up a quantity by field name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Quantity::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

quantities! {
    /// Time coordinate (fm)
    T = 0, "t", Double;
    /// Spatial x coordinate (fm)
    X = 1, "x", Double;
    /// Spatial y coordinate (fm)
    Y = 2, "y", Double;
    /// Spatial z coordinate (fm)
    Z = 3, "z", Double;
    /// Particle mass (GeV)
    Mass = 4, "mass", Double;
    /// Energy component of the four-momentum (GeV)
    P0 = 5, "p0", Double;
    /// Momentum x component (GeV)
    Px = 6, "px", Double;
    /// Momentum y component (GeV)
    Py = 7, "py", Double;
    /// Momentum z component (GeV)
    Pz = 8, "pz", Double;
    /// PDG Monte Carlo particle code
    PdgId = 9, "pdg_id", Int32;
    /// Unique particle id within the event
    Id = 10, "id", Int32;
    /// Electric charge
    Charge = 11, "charge", Int32;
    /// Number of collisions the particle took part in
    Ncoll = 12, "ncoll", Int32;
    /// Formation time (fm)
    FormTime = 13, "form_time", Double;
    /// Cross-section scaling factor
    Xsecfac = 14, "xsecfac", Double;
    /// Id of the process that produced the particle
    ProcIdOrigin = 15, "proc_id_origin", Int32;
    /// Type of the process that produced the particle
    ProcTypeOrigin = 16, "proc_type_origin", Int32;
    /// Time of the last collision (fm)
    TimeLastColl = 17, "time_last_coll", Double;
    /// PDG code of the first mother
    PdgMother1 = 18, "pdg_mother1", Int32;
    /// PDG code of the second mother
    PdgMother2 = 19, "pdg_mother2", Int32;
    /// Baryon number
    BaryonNumber = 20, "baryon_number", Int32;
    /// Strangeness
    Strangeness = 21, "strangeness", Int32;
    /// Spin projection (in units of hbar/2)
    SpinProjection = 22, "spin_projection", Int32;
}

impl Quantity {
    /// Header tag of this quantity
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Catalog entry for this quantity
    pub const fn info(self) -> QuantityInfo {
        QuantityInfo {
            quantity: self,
            ty: self.quantity_type(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable catalog entry: which quantity a name refers to and how it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantityInfo {
    /// Quantity tag
    pub quantity: Quantity,
    /// Storage type
    pub ty: QuantityType,
}

/// Requested field name that is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown quantity '{name}'")]
pub struct UnknownQuantity {
    /// The name as given by the caller
    pub name: String,
}

/// Look up a field name in the catalog
pub fn lookup(name: &str) -> Option<QuantityInfo> {
    Quantity::from_name(name).map(Quantity::info)
}

/// Look up a field name, failing with [`UnknownQuantity`] if it is not cataloged
pub fn resolve(name: &str) -> Result<QuantityInfo, UnknownQuantity> {
    lookup(name).ok_or_else(|| UnknownQuantity {
        name: name.to_string(),
    })
}

/// Resolve an ordered list of names, keeping the first occurrence of duplicates
pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Quantity>, UnknownQuantity> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let info = resolve(name.as_ref())?;
        if !resolved.contains(&info.quantity) {
            resolved.push(info.quantity);
        }
    }
    Ok(resolved)
}

/// Iterate over `(name, info)` pairs of the whole catalog in tag order
pub fn catalog() -> impl Iterator<Item = (&'static str, QuantityInfo)> {
    Quantity::ALL.iter().map(|q| (q.name(), q.info()))
}
