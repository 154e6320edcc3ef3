//! Mock transport feeding speed samples from a background thread.

use pedalpower::input::{sample_channel, SampleFeed, SampleSender};
use std::thread::JoinHandle;

/// Simulated sensor transport.
pub struct MockTransport {
    handle: Option<JoinHandle<usize>>,
}

impl MockTransport {
    /// Spawn a transport pushing `samples` and return it with the tick-side feed.
    pub fn spawn(samples: Vec<f32>) -> (Self, SampleFeed) {
        let (tx, feed) = sample_channel();
        let handle = std::thread::spawn(move || push_all(&tx, &samples));
        (
            Self {
                handle: Some(handle),
            },
            feed,
        )
    }

    /// Wait for the transport to finish; returns how many samples were delivered.
    pub fn join(mut self) -> usize {
        self.handle
            .take()
            .map(|h| h.join().unwrap_or(0))
            .unwrap_or(0)
    }
}

fn push_all(tx: &SampleSender, samples: &[f32]) -> usize {
    samples
        .iter()
        .take_while(|raw| tx.send(**raw).is_ok())
        .count()
}

#[test]
fn test_mock_transport_delivers_everything() {
    let (transport, feed) = MockTransport::spawn(vec![1.0, 2.0, 3.0]);
    assert_eq!(transport.join(), 3);
    let values: Vec<f32> = feed.drain().map(|s| s.raw_value).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}
