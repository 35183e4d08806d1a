//! Audio input device enumeration.

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait};

/// Information about one input device.
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// List all available audio input devices on the system.
///
/// # Errors
/// Returns an error if no audio input devices are found.
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>> {
    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| d.description().ok())
        .map(|d| d.to_string());

    let mut devices = Vec::new();
    for device in host.input_devices()? {
        if let Ok(desc) = device.description() {
            let name = desc.to_string();
            devices.push(AudioDeviceInfo {
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
            });
        }
    }

    if devices.is_empty() {
        anyhow::bail!("No audio input devices found");
    }

    Ok(devices)
}

/// Resolve an input device by name, or the system default when `name` is None.
pub(super) fn find_input_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match name {
        None => host
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("No default audio input device available")),
        Some(wanted) => {
            for device in host.input_devices()? {
                if let Ok(desc) = device.description()
                    && desc.to_string() == wanted
                {
                    return Ok(device);
                }
            }
            anyhow::bail!(
                "Audio input device '{}' not found. Run 'vozlog devices' to list devices.",
                wanted
            )
        }
    }
}
