/// Sound engine: procedural chiptune cues via rodio.
///
/// All fixed sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Build with the "sound" feature to enable audio; without it the stub
/// SoundEngine does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_toggle: Arc<Vec<u8>>,
        sfx_lift: Arc<Vec<u8>>,
        sfx_drop: Arc<Vec<u8>>,
        sfx_reject: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_toggle: Arc::new(make_wav(&gen_blip(880.0, 0.03, 0.2))),
                sfx_lift: Arc::new(make_wav(&gen_sweep(400.0, 700.0, 0.06))),
                sfx_drop: Arc::new(make_wav(&gen_sweep(700.0, 350.0, 0.07))),
                sfx_reject: Arc::new(make_wav(&gen_buzz())),
                sfx_win: Arc::new(make_wav(&gen_fanfare())),
            })
        }

        fn play_buf(&self, buf: Vec<u8>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = rodio::Decoder::new(Cursor::new(buf)) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            self.play_buf(buf.as_ref().clone());
        }

        /// Score chime: pitch rises with the share of correct slots.
        pub fn play_score(&self, correct: usize, total: usize) {
            let ratio = correct as f32 / total.max(1) as f32;
            let freq = 330.0 + ratio * 660.0;
            self.play_buf(make_wav(&gen_blip(freq, 0.12, 0.3)));
        }

        pub fn play_toggle(&self) { self.play(&self.sfx_toggle); }
        pub fn play_lift(&self) { self.play(&self.sfx_lift); }
        pub fn play_drop(&self) { self.play(&self.sfx_drop); }
        pub fn play_reject(&self) { self.play(&self.sfx_reject); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32); // linear fade out
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Linear pitch glide between two frequencies
    fn gen_sweep(from: f32, to: f32, duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.6);
                (phase * TAU).sin() * env * 0.25
            })
            .collect()
    }

    /// Rejection: two low square-ish pulses
    fn gen_buzz() -> Vec<f32> {
        let mut samples = Vec::new();
        for _ in 0..2 {
            let n = (SAMPLE_RATE as f32 * 0.07) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = if (t * 140.0 * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                samples.push(wave * 0.15);
            }
            samples.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as f32 * 0.04) as usize));
        }
        samples
    }

    /// Win: ascending fanfare C5→E5→G5→C6 with a held last note
    fn gen_fanfare() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let note_dur = 0.1;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * TAU).sin() * 0.6
                    + (t * freq * 2.0 * TAU).sin() * 0.3
                    + (t * freq * 3.0 * TAU).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        let last_freq = 1047.0_f32;
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            samples.push((t * last_freq * TAU).sin() * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a 16-bit mono PCM buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_sizes() {
            let wav = make_wav(&gen_blip(440.0, 0.01, 0.5));
            let n = (SAMPLE_RATE as f32 * 0.01) as usize;
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + n * 2);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_score(&self, _correct: usize, _total: usize) {}
    pub fn play_toggle(&self) {}
    pub fn play_lift(&self) {}
    pub fn play_drop(&self) {}
    pub fn play_reject(&self) {}
    pub fn play_win(&self) {}
}
