use std::io::Write;
use std::sync::mpsc::Sender;
use tracing::warn;

/// Receives every labelled sample the learned policy produces.
pub trait ExampleCollector {
    fn collect_example(&mut self, features: &[f64], label: f64);
}

pub struct NullExampleCollector;

impl ExampleCollector for NullExampleCollector {
    fn collect_example(&mut self, _features: &[f64], _label: f64) {}
}

/// Appends every `sample_every`-th sample as little-endian `f32` features
/// followed by a single label byte.
pub struct FileExampleCollector<W: Write> {
    writer: W,
    sample_index: u32,
    sample_every: u32,
}

impl<W: Write> FileExampleCollector<W> {
    pub fn new(writer: W, sample_every: u32) -> Self {
        Self {
            writer,
            sample_index: 0,
            sample_every: sample_every.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_example(&mut self, features: &[f64], label: f64) {
        let mut bytes = Vec::with_capacity(features.len() * 4 + 1);

        for &feature in features {
            bytes.extend_from_slice(&(feature as f32).to_le_bytes());
        }
        bytes.push(if label > 0.5 { 1 } else { 0 });

        if let Err(err) = self.writer.write_all(&bytes) {
            warn!(%err, "failed to write training example");
        }
    }
}

impl<W: Write> ExampleCollector for FileExampleCollector<W> {
    fn collect_example(&mut self, features: &[f64], label: f64) {
        if self.sample_index == 0 {
            self.write_example(features, label);
        }

        self.sample_index = (self.sample_index + 1) % self.sample_every;
    }
}

#[derive(Clone)]
pub struct ChannelExampleCollector {
    tx: Sender<(Vec<f64>, f64)>,
}

impl ChannelExampleCollector {
    pub fn new(tx: Sender<(Vec<f64>, f64)>) -> Self {
        Self { tx }
    }
}

impl ExampleCollector for ChannelExampleCollector {
    fn collect_example(&mut self, features: &[f64], label: f64) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send((features.to_vec(), label));
    }
}
