//! Ambient device configuration (§1: configuration loading is a host concern, but *reading* the
//! resulting values back is ambient plumbing every implementation of this scope carries).
//!
//! `DeviceConfig` can be assembled from a config file and/or environment via the `config` crate,
//! the same way the host chooses `preferred_backends`/`debug_mode` before calling
//! [`crate::device::Device::create`].

use config::{Config, ConfigError};

use crate::backend::BackendFlags;

pub const HINT_BACKEND_ENV_VAR: &str = "REFRESH_HINT_BACKEND";

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub preferred_backends: BackendFlags,
    pub debug_mode: bool,
    pub max_frames_in_flight: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            preferred_backends: BackendFlags::empty(),
            debug_mode: false,
            max_frames_in_flight: 2,
        }
    }
}

impl DeviceConfig {
    /// Loads overrides from `source` (typically a file layered under a `config::File`), falling
    /// back to [`DeviceConfig::default`] for anything unset.
    pub fn from_config(source: &Config) -> Result<DeviceConfig, ConfigError> {
        let mut cfg = DeviceConfig::default();
        if let Ok(debug_mode) = source.get_bool("debug_mode") {
            cfg.debug_mode = debug_mode;
        }
        if let Ok(max_frames) = source.get_int("max_frames_in_flight") {
            cfg.max_frames_in_flight = max_frames.max(1) as u32;
        }
        if let Ok(names) = source.get_array("preferred_backends") {
            for value in names {
                if let Ok(name) = value.into_str() {
                    cfg.preferred_backends |= backend_flag_from_name(&name);
                }
            }
        }
        Ok(cfg)
    }
}

pub fn backend_flag_from_name(name: &str) -> BackendFlags {
    match name.to_ascii_lowercase().as_str() {
        "vulkan" => BackendFlags::VULKAN,
        "d3d11" | "direct3d11" => BackendFlags::D3D11,
        "metal" => BackendFlags::METAL,
        _ => BackendFlags::empty(),
    }
}

/// Reads `REFRESH_HINT_BACKEND` from the process environment (§4.1 backend selection step 1,
/// §6 "Environment variables").
pub fn hint_backend_from_env() -> Option<String> {
    std::env::var(HINT_BACKEND_ENV_VAR).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_name_maps_to_empty() {
        assert_eq!(backend_flag_from_name("not-a-backend"), BackendFlags::empty());
    }

    #[test]
    fn known_backend_names_map_to_flags() {
        assert_eq!(backend_flag_from_name("Vulkan"), BackendFlags::VULKAN);
        assert_eq!(backend_flag_from_name("metal"), BackendFlags::METAL);
    }

    #[test]
    fn default_config_has_sensible_frame_count() {
        assert_eq!(DeviceConfig::default().max_frames_in_flight, 2);
    }
}
