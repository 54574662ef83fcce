//! Fan-out of media frames to several recorders
//!
//! Run with: cargo run --example frame_fanout
//!
//! Each frame is handed to every registered recorder. The value returned by
//! `invoke` is whatever the last recorder returned (its running byte total).

use bytes::Bytes;
use delegates_rs::{MultiCast, MultiCastConfig, Receiver};

/// Records frame sizes for one output
struct Recorder {
    name: &'static str,
    frames: u64,
    bytes: usize,
}

impl Recorder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            frames: 0,
            bytes: 0,
        }
    }

    fn on_frame(&mut self, frame: Bytes) -> usize {
        self.frames += 1;
        self.bytes += frame.len();
        tracing::debug!(recorder = self.name, size = frame.len(), "Frame recorded");
        self.bytes
    }
}

/// Checks frames without changing state
struct Inspector;

impl Inspector {
    fn inspect(&self, frame: Bytes) -> usize {
        let keyframe = frame.first().is_some_and(|b| b >> 4 == 1);
        tracing::trace!(size = frame.len(), keyframe = keyframe, "Frame inspected");
        frame.len()
    }
}

fn audit(frame: Bytes) -> usize {
    frame.len()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("delegates_rs=debug".parse()?)
                .add_directive("frame_fanout=debug".parse()?),
        )
        .init();

    let config = MultiCastConfig::default().receiver_capacity(4);
    let mut fanout: MultiCast<Bytes, usize> = MultiCast::with_config(config);

    let flv = Receiver::new(Recorder::new("flv"));
    let hls = Receiver::new(Recorder::new("hls"));
    let inspector = Receiver::new(Inspector);

    fanout.add(audit);
    fanout.add_method(&flv, Recorder::on_frame);
    fanout.add_method(&hls, Recorder::on_frame);
    fanout.add_method_ref(&inspector, Inspector::inspect);

    // A second registration of the same pair doubles its share of calls
    fanout.add_method(&hls, Recorder::on_frame);

    let frames = [
        Bytes::from_static(&[0x17, 0x00, 0x00, 0x00]),
        Bytes::from_static(&[0x27, 0x01, 0x00]),
        Bytes::from_static(&[0x27, 0x01]),
    ];

    for frame in &frames {
        let last = fanout.invoke(frame.clone());
        println!("frame of {} bytes, last result: {:?}", frame.len(), last);
    }

    for recorder in [&flv, &hls] {
        let recorder = recorder.borrow();
        println!(
            "{}: {} frames, {} bytes",
            recorder.name, recorder.frames, recorder.bytes
        );
    }

    // Dropping a receiver makes its registrations stale; they are skipped
    drop(hls);
    let last = fanout.invoke(Bytes::from_static(&[0x17, 0x01]));
    println!("after dropping hls, last result: {:?}", last);

    let purged = fanout.purge_stale();
    println!(
        "purged {} stale registrations, {} remain",
        purged,
        fanout.count()
    );

    Ok(())
}
