//! Audio resampling using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Resample mono audio to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let chunk_size = 1024;
    let sub_chunks = 1;
    let channels = 1;

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        chunk_size,
        sub_chunks,
        channels,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_per_chunk = resampler.input_frames_next();
    let mut output = Vec::with_capacity(scaled_len(samples.len(), from_rate, to_rate) + 1024);

    let mut pos = 0;
    while pos + frames_per_chunk <= samples.len() {
        let chunk = &samples[pos..pos + frames_per_chunk];
        output.extend_from_slice(&process_chunk(&mut resampler, chunk, frames_per_chunk)?);
        pos += frames_per_chunk;
    }

    // Zero-pad the tail to a full chunk and keep only the proportional
    // share of the resampler output.
    if pos < samples.len() {
        let remaining = samples.len() - pos;
        let mut padded = samples[pos..].to_vec();
        padded.resize(frames_per_chunk, 0.0);

        let tail = process_chunk(&mut resampler, &padded, frames_per_chunk)?;
        let wanted = scaled_len(remaining, from_rate, to_rate);
        output.extend_from_slice(&tail[..wanted.min(tail.len())]);
    }

    Ok(output)
}

/// Run one fixed-size chunk through the resampler.
fn process_chunk(
    resampler: &mut Fft<f32>,
    chunk: &[f32],
    frames: usize,
) -> Result<Vec<f32>> {
    let input = SequentialSlice::new(chunk, 1, frames).map_err(|e| Error::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    Ok(resampled.take_data())
}

/// Length of `input_len` frames after rate conversion, rounded up.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_rate_returns_input() {
        let samples = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let result = resample(samples.clone(), 44_100, 44_100);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), samples);
    }

    #[test]
    fn test_resample_upsample_to_target() {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f32> = (0..22_050).map(|i| (i as f32 * 0.001).sin()).collect();
        let output = resample(samples, 22_050, 44_100).unwrap();
        // One second of audio should stay roughly one second long.
        assert!(output.len() > 42_000);
        assert!(output.len() < 46_500);
    }

    #[test]
    fn test_resample_downsample_to_target() {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f32> = (0..48_000).map(|i| (i as f32 * 0.001).sin()).collect();
        let output = resample(samples, 48_000, 44_100).unwrap();
        assert!(output.len() > 42_000);
        assert!(output.len() < 46_500);
    }
}
