//! Parallel production of independent tracks.

use std::time::{Duration, Instant};

use log::{error, info};
use rayon::prelude::*;

use crate::error::{AudioError, AudioResult};
use crate::pipeline::{produce, TrackDescriptor, TrackOutput};

/// Outcome of one track in a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Track title.
    pub title: String,
    /// Finished track, or the error that stopped it.
    pub result: AudioResult<TrackOutput>,
    /// Wall time spent on the track.
    pub elapsed: Duration,
}

impl BatchResult {
    /// Returns true if the track was produced.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Produces every track, one rayon task per track.
///
/// Results are returned in input order. A failing track never stops the
/// others.
///
/// # Arguments
/// * `descriptors` - Tracks to produce
/// * `workers` - Thread count; 0 picks one per CPU
///
/// # Errors
/// Returns [`AudioError::WorkerPool`] only if the thread pool cannot start.
pub fn produce_all(
    descriptors: Vec<TrackDescriptor>,
    workers: usize,
) -> AudioResult<Vec<BatchResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("soundtrack-worker-{}", i))
        .build()
        .map_err(|e| AudioError::WorkerPool {
            message: e.to_string(),
        })?;

    info!(
        "producing {} track(s) on {} worker(s)",
        descriptors.len(),
        pool.current_num_threads()
    );

    let results = pool.install(|| {
        descriptors
            .into_par_iter()
            .map(|descriptor| {
                let start = Instant::now();
                let result = produce(&descriptor);
                if let Err(ref err) = result {
                    error!("'{}' failed: {}", descriptor.title, err);
                }
                BatchResult {
                    title: descriptor.title,
                    result,
                    elapsed: start.elapsed(),
                }
            })
            .collect::<Vec<_>>()
    });

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AudioBuffer;
    use crate::pipeline::Stem;
    use crate::segment::Segment;
    use soundtrack_spec::LoopSpec;

    fn track(title: &str, frames: usize) -> TrackDescriptor {
        let clip = AudioBuffer::mono(100, vec![0.25; frames]).unwrap();
        TrackDescriptor::new(title, vec![Stem::new(Segment::loop_only(clip))])
            .with_loop(LoopSpec::repeat(1))
    }

    #[test]
    fn test_results_keep_input_order() {
        let descriptors: Vec<_> = (0..16)
            .map(|i| track(&format!("Track {}", i), i + 1))
            .collect();

        let results = produce_all(descriptors, 4).unwrap();

        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.title, format!("Track {}", i));
            let output = result.result.as_ref().unwrap();
            assert_eq!(output.buffer.len(), 2 * (i + 1));
        }
    }

    #[test]
    fn test_failure_does_not_stop_others() {
        let descriptors = vec![track("Good", 4), track("Bad", 0), track("Also Good", 2)];

        let results = produce_all(descriptors, 2).unwrap();

        assert!(results[0].is_ok());
        assert!(matches!(
            results[1].result,
            Err(AudioError::InvalidLoopRegion { stem: 0, .. })
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_oversized_track_does_not_stop_others() {
        let clip = AudioBuffer::mono(100, vec![0.25; 1_000_000]).unwrap();
        let oversized = TrackDescriptor::new("Oversized", vec![Stem::new(Segment::loop_only(clip))])
            .with_loop(LoopSpec::repeat(u32::MAX));
        let descriptors = vec![track("Good", 4), oversized, track("Also Good", 2)];

        let results = produce_all(descriptors, 2).unwrap();

        assert!(results[0].is_ok());
        assert!(matches!(
            results[1].result,
            Err(AudioError::OutputTooLong { stem: 0, .. })
        ));
        assert_eq!(results[2].result.as_ref().unwrap().buffer.len(), 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let descriptors: Vec<_> = (0..6).map(|i| track(&format!("T{}", i), 3 + i)).collect();

        let parallel = produce_all(descriptors.clone(), 3).unwrap();
        for (descriptor, result) in descriptors.iter().zip(parallel) {
            let sequential = produce(descriptor).unwrap();
            assert_eq!(result.result.unwrap(), sequential);
        }
    }
}
