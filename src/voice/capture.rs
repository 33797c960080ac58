//! Audio capture from a selected microphone
//!
//! Capture is blocking (cpal stream plus a fixed sleep); callers on the
//! async side go through `spawn_blocking`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};
use serde::Serialize;

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Longest utterance captured per request
pub const PHRASE_LIMIT: Duration = Duration::from_secs(5);

/// An available input device
#[derive(Debug, Clone, Serialize)]
pub struct InputDevice {
    pub index: usize,
    pub name: String,
}

/// Enumerate input devices on the default host
///
/// Indices are positional within this listing and match what [`record`]
/// accepts. Returns an empty list when the host has no input devices or
/// enumeration fails (headless machines).
#[must_use]
pub fn list_input_devices() -> Vec<InputDevice> {
    let host = cpal::default_host();
    let Ok(devices) = host.input_devices() else {
        return Vec::new();
    };
    devices
        .enumerate()
        .map(|(index, device)| InputDevice {
            index,
            name: device
                .name()
                .unwrap_or_else(|_| format!("input device {index}")),
        })
        .collect()
}

fn device_at(index: usize) -> Result<Device> {
    let host = cpal::default_host();
    host.input_devices()
        .map_err(|e| Error::Audio(e.to_string()))?
        .nth(index)
        .ok_or_else(|| Error::Audio(format!("microphone index {index} out of range")))
}

/// Record one phrase window from the indexed input device
///
/// Captures mono 16kHz f32 samples for [`PHRASE_LIMIT`], then stops.
///
/// # Errors
///
/// Returns error if the device cannot be opened, supports no suitable mono
/// 16kHz configuration, or captures nothing.
pub fn record(index: usize) -> Result<Vec<f32>> {
    let device = device_at(index)?;

    let supported_config = device
        .supported_input_configs()
        .map_err(|e| Error::Audio(e.to_string()))?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
        })
        .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

    let config: StreamConfig = supported_config
        .with_sample_rate(SampleRate(SAMPLE_RATE))
        .config();

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate = SAMPLE_RATE,
        "recording phrase window"
    );

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buffer);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = sink.lock() {
                    buf.extend_from_slice(data);
                }
            },
            |err| {
                tracing::error!(error = %err, "audio capture error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;
    std::thread::sleep(PHRASE_LIMIT);
    drop(stream);

    let samples = match buffer.lock() {
        Ok(buf) => buf.clone(),
        Err(_) => Vec::new(),
    };

    if samples.is_empty() {
        return Err(Error::Audio("no audio captured".to_string()));
    }

    tracing::debug!(samples = samples.len(), "capture complete");
    Ok(samples)
}
