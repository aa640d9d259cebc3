//! Copy-pass data-movement validation (§4.6).

use crate::format::TextureFormat;
use crate::texture::TextureTransferInfo;

/// Transfer-buffer offset must align to the destination format's texel block size (§4.6).
pub fn validate_upload_alignment(src: &TextureTransferInfo, dst_format: TextureFormat) -> bool {
    src.is_aligned_for(dst_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::TransferBufferHandle;

    #[test]
    fn misaligned_offset_is_rejected() {
        let info = TextureTransferInfo {
            transfer_buffer: TransferBufferHandle::default(),
            offset: 3,
            pixels_per_row: 64,
            rows_per_layer: 64,
        };
        assert!(!validate_upload_alignment(&info, TextureFormat::R8G8B8A8));
    }
}
