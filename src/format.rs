//! Texture format enumeration and the static tables derived from it.
//!
//! The ordering below is load-bearing: backends and serialized pipeline caches key off of the
//! discriminant, so variants are only ever appended, never renumbered or reordered (§6).

use crate::usage::TextureUsageFlags;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum TextureFormat {
    // Unsigned normalized float color formats.
    R8G8B8A8,
    B8G8R8A8,
    R5G6B5,
    A1R5G5B5,
    B4G4R4A4,
    A2R10G10B10,
    A2B10G10R10,
    R16G16,
    R16G16B16A16,
    R8,
    A8,
    // Compressed unsigned normalized float color formats.
    Bc1,
    Bc2,
    Bc3,
    Bc7,
    // Signed normalized float color formats.
    R8G8Snorm,
    R8G8B8A8Snorm,
    // Signed float color formats.
    R16Sfloat,
    R16G16Sfloat,
    R16G16B16A16Sfloat,
    R32Sfloat,
    R32G32Sfloat,
    R32G32B32A32Sfloat,
    // Unsigned integer color formats.
    R8Uint,
    R8G8Uint,
    R8G8B8A8Uint,
    R16Uint,
    R16G16Uint,
    R16G16B16A16Uint,
    // SRGB color formats.
    R8G8B8A8Srgb,
    B8G8R8A8Srgb,
    // Compressed SRGB color formats.
    Bc3Srgb,
    Bc7Srgb,
    // Depth formats.
    D16Unorm,
    D24Unorm,
    D32Sfloat,
    D24UnormS8Uint,
    D32SfloatS8Uint,
}

impl TextureFormat {
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::D16Unorm
                | TextureFormat::D24Unorm
                | TextureFormat::D32Sfloat
                | TextureFormat::D24UnormS8Uint
                | TextureFormat::D32SfloatS8Uint
        )
    }

    pub fn has_stencil(self) -> bool {
        matches!(
            self,
            TextureFormat::D24UnormS8Uint | TextureFormat::D32SfloatS8Uint
        )
    }

    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            TextureFormat::Bc1
                | TextureFormat::Bc2
                | TextureFormat::Bc3
                | TextureFormat::Bc7
                | TextureFormat::Bc3Srgb
                | TextureFormat::Bc7Srgb
        )
    }

    /// Texel block size in bytes, per the glossary table. Constant for a given format,
    /// independent of backend (testable property #7).
    pub fn texel_block_size(self) -> u32 {
        use TextureFormat::*;
        match self {
            R8 | A8 | R8Uint => 1,
            R5G6B5 | A1R5G5B5 | B4G4R4A4 | R8G8Snorm | R8G8Uint | D16Unorm | R16Sfloat
            | R16Uint => 2,
            R8G8B8A8 | B8G8R8A8 | A2R10G10B10 | A2B10G10R10 | R16G16 | R8G8B8A8Snorm
            | R16G16Sfloat | R32Sfloat | R8G8B8A8Uint | R16G16Uint | R8G8B8A8Srgb
            | B8G8R8A8Srgb | D24Unorm | D32Sfloat | D24UnormS8Uint => 4,
            R16G16B16A16 | R16G16B16A16Sfloat | R32G32Sfloat | R16G16B16A16Uint
            | D32SfloatS8Uint => 8,
            R32G32B32A32Sfloat => 16,
            Bc1 => 8,
            Bc2 | Bc3 | Bc7 | Bc3Srgb | Bc7Srgb => 16,
        }
    }
}

/// The fixed depth-format substitution table consulted when a backend doesn't support the
/// requested depth/stencil format at pipeline or texture creation time (§4.1, §7).
///
/// `D16_UNORM` is the ultimate fallback: every backend that supports depth at all is expected to
/// support it.
pub fn depth_format_fallback(requested: TextureFormat) -> Option<TextureFormat> {
    match requested {
        TextureFormat::D24Unorm => Some(TextureFormat::D32Sfloat),
        TextureFormat::D32Sfloat => Some(TextureFormat::D24Unorm),
        TextureFormat::D24UnormS8Uint => Some(TextureFormat::D32SfloatS8Uint),
        TextureFormat::D32SfloatS8Uint => Some(TextureFormat::D24UnormS8Uint),
        _ => None,
    }
}

pub const ULTIMATE_DEPTH_FALLBACK: TextureFormat = TextureFormat::D16Unorm;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TextureType {
    Tex2D,
    Tex3D,
    Cube,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SampleCount {
    Sample1,
    Sample2,
    Sample4,
    Sample8,
}

impl SampleCount {
    pub fn as_u32(self) -> u32 {
        match self {
            SampleCount::Sample1 => 1,
            SampleCount::Sample2 => 2,
            SampleCount::Sample4 => 4,
            SampleCount::Sample8 => 8,
        }
    }
}

/// A backend's declared format/type/usage support, as consulted by
/// [`crate::device::Device::is_texture_format_supported`].
pub trait FormatSupportTable {
    fn supports(&self, format: TextureFormat, ty: TextureType, usage: TextureUsageFlags) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texel_block_size_is_stable() {
        assert_eq!(TextureFormat::R8.texel_block_size(), 1);
        assert_eq!(TextureFormat::A8.texel_block_size(), 1);
        assert_eq!(TextureFormat::D16Unorm.texel_block_size(), 2);
        assert_eq!(TextureFormat::R8G8B8A8.texel_block_size(), 4);
        assert_eq!(TextureFormat::D32Sfloat.texel_block_size(), 4);
        assert_eq!(TextureFormat::R16G16B16A16.texel_block_size(), 8);
        assert_eq!(TextureFormat::D32SfloatS8Uint.texel_block_size(), 8);
        assert_eq!(TextureFormat::R32G32B32A32Sfloat.texel_block_size(), 16);
        assert_eq!(TextureFormat::Bc1.texel_block_size(), 8);
        assert_eq!(TextureFormat::Bc2.texel_block_size(), 16);
        assert_eq!(TextureFormat::Bc3.texel_block_size(), 16);
        assert_eq!(TextureFormat::Bc7.texel_block_size(), 16);
    }

    #[test]
    fn depth_fallback_table_is_symmetric() {
        assert_eq!(
            depth_format_fallback(TextureFormat::D24Unorm),
            Some(TextureFormat::D32Sfloat)
        );
        assert_eq!(
            depth_format_fallback(TextureFormat::D32Sfloat),
            Some(TextureFormat::D24Unorm)
        );
        assert_eq!(depth_format_fallback(TextureFormat::R8G8B8A8), None);
    }

    #[test]
    fn depth_classification() {
        assert!(TextureFormat::D24UnormS8Uint.is_depth());
        assert!(TextureFormat::D24UnormS8Uint.has_stencil());
        assert!(!TextureFormat::D16Unorm.has_stencil());
        assert!(!TextureFormat::R8G8B8A8.is_depth());
    }
}
