//! Buffer and transfer-buffer create-info and the frontend-side wrapper types handed back to
//! callers (§3).

use crate::usage::{BufferUsageFlags, TransferBufferUsage};

#[derive(Clone, Debug)]
pub struct BufferCreateInfo {
    pub usage: BufferUsageFlags,
    pub size: u32,
    pub name: Option<String>,
}

impl BufferCreateInfo {
    /// Boundary behavior (§8): a zero-size buffer must fail creation.
    pub fn is_valid(&self) -> bool {
        self.size > 0 && self.usage.is_valid_combination()
    }
}

#[derive(Clone, Debug)]
pub struct TransferBufferCreateInfo {
    pub usage: TransferBufferUsage,
    pub size: u32,
}

impl TransferBufferCreateInfo {
    pub fn is_valid(&self) -> bool {
        self.size > 0
    }
}

/// `{transfer_buffer, offset, size}`, the unit addressed by copy-pass uploads and the immediate
/// `set_transfer_data` / `get_transfer_data` calls.
#[derive(Copy, Clone, Debug)]
pub struct TransferBufferLocation {
    pub transfer_buffer: crate::handle::TransferBufferHandle,
    pub offset: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct TransferBufferRegion {
    pub transfer_buffer: crate::handle::TransferBufferHandle,
    pub offset: u32,
    pub size: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct BufferLocation {
    pub buffer: crate::handle::BufferHandle,
    pub offset: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct BufferRegion {
    pub buffer: crate::handle::BufferHandle,
    pub offset: u32,
    pub size: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct IndirectDrawCommand {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct IndexedIndirectDrawCommand {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_buffer_is_invalid() {
        let info = BufferCreateInfo {
            usage: BufferUsageFlags::VERTEX,
            size: 0,
            name: None,
        };
        assert!(!info.is_valid());
    }

    #[test]
    fn vertex_index_combo_is_invalid() {
        let info = BufferCreateInfo {
            usage: BufferUsageFlags::VERTEX | BufferUsageFlags::INDEX,
            size: 16,
            name: None,
        };
        assert!(!info.is_valid());
    }
}
