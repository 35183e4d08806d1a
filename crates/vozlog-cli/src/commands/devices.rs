//! `vozlog devices` — list audio input devices.

use anyhow::Result;
use vozlog_core::list_input_devices;

pub fn run() -> Result<()> {
    let devices = list_input_devices()?;

    println!("Audio input devices:");
    for device in devices {
        if device.is_default {
            println!("  {} (default)", device.name);
        } else {
            println!("  {}", device.name);
        }
    }

    Ok(())
}
