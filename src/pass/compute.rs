//! Compute pass storage-binding validation (§4.4).
//!
//! Resources bound for read-write within a pass must carry `compute-storage-write`; if also read
//! within the same pass they additionally need `compute-storage-read`. Write ordering between
//! independent dispatches in the same pass is intentionally left unspecified by the frontend —
//! there is nothing to validate there, only to document (§4.4).

use crate::usage::{BufferUsageFlags, TextureUsageFlags};

pub fn validate_storage_texture_readwrite_usage(usage: TextureUsageFlags, also_read: bool) -> bool {
    usage.contains(TextureUsageFlags::COMPUTE_STORAGE_WRITE)
        && (!also_read || usage.contains(TextureUsageFlags::COMPUTE_STORAGE_READ))
}

pub fn validate_storage_buffer_readwrite_usage(usage: BufferUsageFlags, also_read: bool) -> bool {
    usage.contains(BufferUsageFlags::COMPUTE_STORAGE_WRITE)
        && (!also_read || usage.contains(BufferUsageFlags::COMPUTE_STORAGE_READ))
}

pub fn validate_storage_texture_readonly_usage(usage: TextureUsageFlags) -> bool {
    usage.contains(TextureUsageFlags::COMPUTE_STORAGE_READ)
}

pub fn validate_storage_buffer_readonly_usage(usage: BufferUsageFlags) -> bool {
    usage.contains(BufferUsageFlags::COMPUTE_STORAGE_READ)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readwrite_requires_write_and_optionally_read() {
        assert!(validate_storage_buffer_readwrite_usage(
            BufferUsageFlags::COMPUTE_STORAGE_WRITE,
            false
        ));
        assert!(!validate_storage_buffer_readwrite_usage(
            BufferUsageFlags::COMPUTE_STORAGE_WRITE,
            true
        ));
        let both = BufferUsageFlags::COMPUTE_STORAGE_WRITE | BufferUsageFlags::COMPUTE_STORAGE_READ;
        assert!(validate_storage_buffer_readwrite_usage(both, true));
    }
}
