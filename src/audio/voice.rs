use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

/// Playback cursor for one pad's sample.
#[derive(Clone, Copy, Debug)]
pub struct Voice {
    pub pos: usize,
    pub gain: f32,
    pub active: bool,
}

impl Voice {
    // `offset` frames are skipped so a late start stays on the beat
    pub fn new(offset: usize, gain: f32) -> Self {
        Self { pos: offset, gain, active: true }
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        if remaining.is_empty() {
            self.active = false;
            return;
        }
        let n = remaining.len().min(out.len());
        for (frame, &sample) in out.iter_mut().zip(&remaining[..n]) {
            frame.mix(sample, self.gain);
        }
        self.pos += n;
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleBuffer {
        SampleBuffer { data: (0..len).map(|i| StereoFrame::mono(i as f32)).collect() }
    }

    #[test]
    fn renders_and_finishes() {
        let buf = ramp(3);
        let mut voice = Voice::new(0, 1.0);
        let mut out = vec![StereoFrame::zero(); 4];
        voice.render_into(&buf, &mut out);
        assert_eq!(out[2], StereoFrame::mono(2.0));
        assert_eq!(out[3], StereoFrame::zero());
        assert!(!voice.active);
    }

    #[test]
    fn offset_skips_ahead() {
        let buf = ramp(10);
        let mut voice = Voice::new(4, 0.5);
        let mut out = vec![StereoFrame::zero(); 2];
        voice.render_into(&buf, &mut out);
        assert_eq!(out[0], StereoFrame::mono(2.0));
        assert_eq!(voice.pos, 6);
        assert!(voice.active);
    }

    #[test]
    fn offset_past_end_is_silent() {
        let buf = ramp(2);
        let mut voice = Voice::new(5, 1.0);
        let mut out = vec![StereoFrame::zero(); 2];
        voice.render_into(&buf, &mut out);
        assert_eq!(out, vec![StereoFrame::zero(); 2]);
        assert!(!voice.active);
    }
}
