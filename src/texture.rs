//! Texture create-info and the copy-pass region/location types addressing texture contents.

use crate::format::{SampleCount, TextureFormat, TextureType};
use crate::handle::{TextureHandle, TransferBufferHandle};
use crate::usage::TextureUsageFlags;

#[derive(Clone, Debug)]
pub struct TextureCreateInfo {
    pub ty: TextureType,
    pub format: TextureFormat,
    pub usage: TextureUsageFlags,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub layer_count: u32,
    pub level_count: u32,
    pub sample_count: SampleCount,
    pub name: Option<String>,
}

impl TextureCreateInfo {
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.depth > 0
            && self.layer_count > 0
            && self.level_count > 0
            && self.usage.is_valid_combination()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Copy, Clone, Debug)]
pub struct TextureRegion {
    pub slice: crate::handle::TextureSlice,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

/// Source location for `upload_to_texture`: a transfer buffer plus the row/layer pitch the
/// staged data was written with (§4.6).
#[derive(Copy, Clone, Debug)]
pub struct TextureTransferInfo {
    pub transfer_buffer: TransferBufferHandle,
    pub offset: u32,
    pub pixels_per_row: u32,
    pub rows_per_layer: u32,
}

impl TextureTransferInfo {
    /// The source offset must align to the destination format's texel block size (§4.6).
    pub fn is_aligned_for(&self, format: TextureFormat) -> bool {
        self.offset % format.texel_block_size() == 0
    }
}

#[derive(Copy, Clone, Debug)]
pub struct DepthStencilValue {
    pub depth: f32,
    pub stencil: u8,
}

#[derive(Copy, Clone, Debug)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> TextureCreateInfo {
        TextureCreateInfo {
            ty: TextureType::Tex2D,
            format: TextureFormat::R8G8B8A8,
            usage: TextureUsageFlags::COLOR_TARGET,
            width: 256,
            height: 256,
            depth: 1,
            layer_count: 1,
            level_count: 1,
            sample_count: SampleCount::Sample1,
            name: None,
        }
    }

    #[test]
    fn zero_extent_is_invalid() {
        let mut i = info();
        i.width = 0;
        assert!(!i.is_valid());
    }

    #[test]
    fn sensible_info_is_valid() {
        assert!(info().is_valid());
    }

    #[test]
    fn transfer_alignment() {
        let t = TextureTransferInfo {
            transfer_buffer: TransferBufferHandle::default(),
            offset: 8,
            pixels_per_row: 256,
            rows_per_layer: 256,
        };
        assert!(t.is_aligned_for(TextureFormat::R8G8B8A8));
        let t2 = TextureTransferInfo { offset: 3, ..t };
        assert!(!t2.is_aligned_for(TextureFormat::R8G8B8A8));
    }
}
