//! Render pass attachment validation (§4.3).

use crate::usage::TextureUsageFlags;

/// Every slice listed as a color attachment must have been created with `COLOR_TARGET` usage.
pub fn validate_color_attachment_usage(texture_usage: TextureUsageFlags) -> bool {
    texture_usage.contains(TextureUsageFlags::COLOR_TARGET)
}

/// Every slice listed as the depth-stencil attachment must have `DEPTH_STENCIL_TARGET` usage.
pub fn validate_depth_stencil_attachment_usage(texture_usage: TextureUsageFlags) -> bool {
    texture_usage.contains(TextureUsageFlags::DEPTH_STENCIL_TARGET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_target_usage_is_required() {
        assert!(validate_color_attachment_usage(TextureUsageFlags::COLOR_TARGET));
        assert!(!validate_color_attachment_usage(TextureUsageFlags::SAMPLER));
    }
}
