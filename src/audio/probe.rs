//! Container-level audio duration probing.

use std::fs::File;
use std::path::Path;

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioProbeError {
    #[error("failed to open audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported or corrupt audio container: {0}")]
    Format(String),

    #[error("no audio track found")]
    NoTrack,

    #[error("could not determine audio duration")]
    UnknownDuration,
}

/// Playback duration of the audio file at `path`, in milliseconds.
///
/// Prefers the frame count declared by the container. Formats that do not
/// declare one up front (mp3 without a Xing header) are walked packet by
/// packet instead.
pub fn probe_duration_ms(path: &Path) -> Result<u64, AudioProbeError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioProbeError::Format(format!("probe: {e}")))?;

    let mut format = probed.format;
    let track = format.default_track().ok_or(AudioProbeError::NoTrack)?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    if let (Some(n_frames), Some(rate)) = (params.n_frames, params.sample_rate) {
        if rate > 0 && n_frames > 0 {
            return Ok(n_frames * 1000 / rate as u64);
        }
    }

    let time_base = params.time_base.ok_or(AudioProbeError::UnknownDuration)?;

    let mut last_ts: u64 = 0;
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(AudioProbeError::Format(format!("packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }
        last_ts = last_ts.max(packet.ts() + packet.dur());
    }

    if last_ts == 0 {
        return Err(AudioProbeError::UnknownDuration);
    }

    let time = time_base.calc_time(last_ts);
    Ok(time.seconds * 1000 + (time.frac * 1000.0).round() as u64)
}
