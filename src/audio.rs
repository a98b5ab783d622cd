// Looping background track. The effect never reads it; it only starts, pauses and mutes.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::info;

use crate::error::Error;

pub struct Soundtrack {
    _stream: OutputStream, // must outlive the sink or playback stops
    _handle: OutputStreamHandle,
    sink: Sink,
    volume: f32,
    muted: bool,
}

impl Soundtrack {
    /// Open the default output device and start `path` looping forever at `volume`.
    pub fn play_looped(path: &Path, volume: f32) -> Result<Self, Error> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| Error::Audio(format!("Output device: {e}")))?;
        let sink = Sink::try_new(&handle).map_err(|e| Error::Audio(format!("Sink: {e}")))?;

        let file = File::open(path)
            .map_err(|e| Error::Audio(format!("Open {}: {e}", path.display())))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| Error::Audio(format!("Decode {}: {e}", path.display())))?;

        let volume = volume.clamp(0.0, 1.0);
        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        sink.play();
        info!(path = %path.display(), volume, "soundtrack playing");

        Ok(Self { _stream: stream, _handle: handle, sink, volume, muted: false })
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.sink.set_volume(if self.muted { 0.0 } else { self.volume });
        info!(muted = self.muted, "soundtrack mute toggled");
    }

    pub fn toggle_pause(&mut self) {
        if self.sink.is_paused() {
            self.sink.play();
        } else {
            self.sink.pause();
        }
        info!(paused = self.sink.is_paused(), "soundtrack pause toggled");
    }
}
