use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier handed over by the assembly framework.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// `u32::MAX` saturates onto the last representable id.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type ElemId = Id;
pub type SubdomainId = Id;
pub type BoundaryId = Id;

/// Local side number of a face within its owning element.
pub type SideIndex = u32;

/// Key under which a face evaluation is memoized: the owning element and the
/// local side of that element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub side: SideIndex,
    pub elem: ElemId,
}

impl FaceKey {
    pub fn new(side: SideIndex, elem: ElemId) -> Self {
        Self { side, elem }
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elem {} side {}", self.elem, self.side)
    }
}
