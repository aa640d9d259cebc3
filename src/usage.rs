//! Usage-flag bitmasks for buffers and textures, and the combinations the validation layer
//! rejects before a creation call ever reaches a backend (§7).

use bitflags::bitflags;

bitflags! {
    /// How a buffer may be bound. Bit values are carried over unchanged from the format this
    /// crate's data model was distilled from, so masks serialized anywhere upstream keep meaning.
    pub struct BufferUsageFlags: u32 {
        const VERTEX = 0x1;
        const INDEX = 0x2;
        const INDIRECT = 0x4;
        const GRAPHICS_STORAGE_READ = 0x8;
        const COMPUTE_STORAGE_READ = 0x20;
        const COMPUTE_STORAGE_WRITE = 0x40;
    }
}

bitflags! {
    pub struct TextureUsageFlags: u32 {
        const SAMPLER = 0x1;
        const COLOR_TARGET = 0x2;
        const DEPTH_STENCIL_TARGET = 0x4;
        const GRAPHICS_STORAGE_READ = 0x8;
        const COMPUTE_STORAGE_READ = 0x20;
        const COMPUTE_STORAGE_WRITE = 0x40;
    }
}

impl BufferUsageFlags {
    /// `VERTEX` and `INDEX` describe mutually exclusive binding points on the pipeline; a buffer
    /// requesting both is a validation error, not a backend concern (§7 invalid-argument class).
    pub fn is_valid_combination(self) -> bool {
        !(self.contains(BufferUsageFlags::VERTEX) && self.contains(BufferUsageFlags::INDEX))
    }
}

impl TextureUsageFlags {
    /// A texture cannot be both a color target and a depth-stencil target.
    pub fn is_valid_combination(self) -> bool {
        !(self.contains(TextureUsageFlags::COLOR_TARGET)
            && self.contains(TextureUsageFlags::DEPTH_STENCIL_TARGET))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TransferBufferUsage {
    Upload,
    Download,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_together_is_invalid() {
        let flags = BufferUsageFlags::VERTEX | BufferUsageFlags::INDEX;
        assert!(!flags.is_valid_combination());
    }

    #[test]
    fn vertex_alone_is_valid() {
        assert!(BufferUsageFlags::VERTEX.is_valid_combination());
    }

    #[test]
    fn color_and_depth_target_together_is_invalid() {
        let flags = TextureUsageFlags::COLOR_TARGET | TextureUsageFlags::DEPTH_STENCIL_TARGET;
        assert!(!flags.is_valid_combination());
    }
}
