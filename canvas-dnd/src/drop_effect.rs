//! Per-bit mapping between [`DropOperation`] and the native effect masks.
//!
//! Native bits without a counterpart are dropped on the way in.

use crate::drag_drop::DropOperation;

pub mod win32 {
    use crate::drag_drop::DropOperation;

    pub const DROPEFFECT_NONE: u32 = 0;
    pub const DROPEFFECT_COPY: u32 = 1;
    pub const DROPEFFECT_MOVE: u32 = 2;
    pub const DROPEFFECT_LINK: u32 = 4;

    const MAPPING: [(DropOperation, u32); 3] = [
        (DropOperation::COPY, DROPEFFECT_COPY),
        (DropOperation::MOVE, DROPEFFECT_MOVE),
        (DropOperation::LINK, DROPEFFECT_LINK),
    ];

    pub fn to_native(operation: DropOperation) -> u32 {
        super::map_to_native(&MAPPING, operation, DROPEFFECT_NONE)
    }

    pub fn from_native(effect: u32) -> DropOperation {
        super::map_from_native(&MAPPING, effect)
    }
}

pub mod appkit {
    use crate::drag_drop::DropOperation;

    pub const NS_DRAG_OPERATION_NONE: usize = 0;
    pub const NS_DRAG_OPERATION_COPY: usize = 1;
    pub const NS_DRAG_OPERATION_LINK: usize = 2;
    pub const NS_DRAG_OPERATION_MOVE: usize = 16;

    const MAPPING: [(DropOperation, usize); 3] = [
        (DropOperation::COPY, NS_DRAG_OPERATION_COPY),
        (DropOperation::MOVE, NS_DRAG_OPERATION_MOVE),
        (DropOperation::LINK, NS_DRAG_OPERATION_LINK),
    ];

    pub fn to_native(operation: DropOperation) -> usize {
        super::map_to_native(&MAPPING, operation, NS_DRAG_OPERATION_NONE)
    }

    pub fn from_native(operation: usize) -> DropOperation {
        super::map_from_native(&MAPPING, operation)
    }
}

fn map_to_native<N>(mapping: &[(DropOperation, N)], operation: DropOperation, none: N) -> N
where
    N: Copy + std::ops::BitOr<Output = N>,
{
    mapping
        .iter()
        .filter(|(flag, _)| operation.contains(*flag))
        .fold(none, |native, (_, bit)| native | *bit)
}

fn map_from_native<N>(mapping: &[(DropOperation, N)], native: N) -> DropOperation
where
    N: Copy + PartialEq + Default + std::ops::BitAnd<Output = N>,
{
    mapping
        .iter()
        .filter(|(_, bit)| native & *bit != N::default())
        .fold(DropOperation::empty(), |operation, (flag, _)| operation | *flag)
}
