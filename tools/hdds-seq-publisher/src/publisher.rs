// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish loop.
//!
//! Two instances share the topic: `owner_instance` keeps the sequence memory
//! allocated by the sample, `borrower_instance` loans a caller-owned block.
//! Each round both get the same length and fresh random contents.

use crate::config::PublisherConfig;
use anyhow::{Context, Result};
use hdds_seq::dds::{DataWriter, InstanceHandle, Participant};
use hdds_seq::{Sequences, SequencesData, MAX_SEQUENCE_LEN, SEQUENCES_TYPE_NAME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

pub const OWNER_ID: &str = "owner_instance";
pub const BORROWER_ID: &str = "borrower_instance";

/// Outcome of a publisher run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Rounds started (one write per instance each).
    pub rounds: u64,
    pub samples_written: u64,
    pub write_errors: u64,
    /// Failed unloan / delete steps.
    pub teardown_errors: u64,
}

/// Register the sample type, create the topic and a writer on it.
pub fn open_writer(
    participant: &Participant,
    config: &PublisherConfig,
) -> Result<DataWriter<SequencesData>> {
    participant
        .register_type::<SequencesData>(SEQUENCES_TYPE_NAME)
        .context("Failed to register sample type")?;
    let topic = participant
        .create_topic::<SequencesData>(&config.topic_name, SEQUENCES_TYPE_NAME)
        .with_context(|| format!("Failed to create topic '{}'", config.topic_name))?;
    participant
        .create_writer(&topic)
        .context("Failed to create writer")
}

/// Full run: entities, publish loop, teardown.
pub fn run(config: &PublisherConfig, running: &AtomicBool) -> Result<PublishReport> {
    let participant = Participant::builder("hdds-seq-publisher")
        .domain_id(config.domain_id)
        .history_depth(config.history_depth)
        .build()
        .context("Failed to create participant")?;
    let writer = open_writer(&participant, config)?;

    let mut buffer = vec![0i16; MAX_SEQUENCE_LEN];
    let mut rng = fastrand::Rng::new();
    let mut report = publish_loop(&writer, config, &mut buffer, &mut rng, running)?;
    drop(buffer);

    if let Err(e) = participant.delete_contained_entities() {
        log::error!("[publisher] delete_contained_entities failed: {}", e);
        report.teardown_errors += 1;
    }
    Ok(report)
}

/// Publish both instances until `sample_count` rounds are done or `running`
/// goes false. `buffer` backs the borrower's sequence and is handed back
/// before this returns.
pub fn publish_loop(
    writer: &DataWriter<SequencesData>,
    config: &PublisherConfig,
    buffer: &mut [i16],
    rng: &mut fastrand::Rng,
    running: &AtomicBool,
) -> Result<PublishReport> {
    let mut owner = Sequences::new();
    let mut borrower = Sequences::new();
    owner.set_id(OWNER_ID)?;
    borrower.set_id(BORROWER_ID)?;

    // Drop the sample's own allocation so the block can be loaned
    borrower
        .data
        .set_capacity(0)
        .context("Failed to release borrower allocation")?;
    borrower
        .data
        .loan(buffer, 0, MAX_SEQUENCE_LEN)
        .context("Failed to loan borrower buffer")?;

    let period = config.send_period();
    let mut report = PublishReport::default();
    let mut count: u64 = 0;

    while running.load(Ordering::SeqCst)
        && (config.sample_count == 0 || count < config.sample_count)
    {
        println!("Writing sequences, count {}", count);
        let length = (count % MAX_SEQUENCE_LEN as u64) as usize + 1;
        println!("Instances length = {}", length);

        for sample in [&mut owner, &mut borrower] {
            match publish_one(writer, sample, count, length, rng) {
                Ok(()) => report.samples_written += 1,
                Err(e) => {
                    log::warn!("[publisher] write of '{}' failed: {}", sample.id(), e);
                    report.write_errors += 1;
                }
            }
        }

        report.rounds += 1;
        count += 1;
        if !period.is_zero() {
            thread::sleep(period);
        }
    }

    match borrower.data.unloan() {
        Ok(returned) => log::debug!(
            "[publisher] borrower buffer returned ({} elements)",
            returned.len()
        ),
        Err(e) => {
            log::error!("[publisher] unloan failed: {}", e);
            report.teardown_errors += 1;
        }
    }
    for sample in [owner, borrower] {
        let id = sample.id().to_string();
        if let Err(e) = sample.delete() {
            log::error!("[publisher] delete of '{}' failed: {}", id, e);
            report.teardown_errors += 1;
        }
    }

    Ok(report)
}

/// `count` as the sample's IDL `long`. Unlimited runs wrap back to 0 after
/// `i32::MAX`.
fn sample_counter(count: u64) -> i32 {
    i32::try_from(count % (i32::MAX as u64 + 1)).unwrap_or_default()
}

fn publish_one(
    writer: &DataWriter<SequencesData>,
    sample: &mut Sequences<'_>,
    count: u64,
    length: usize,
    rng: &mut fastrand::Rng,
) -> hdds_seq::Result<()> {
    sample.count = sample_counter(count);
    sample.data.set_length(length)?;
    for value in sample.data.as_mut_slice()? {
        *value = rng.i16(0..100);
    }
    writer.write(sample, InstanceHandle::nil())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdds_seq::dds::DataReader;
    use std::sync::Arc;

    fn test_config(sample_count: u64) -> PublisherConfig {
        PublisherConfig {
            sample_count,
            send_period_ms: 0,
            history_depth: 1024,
            ..PublisherConfig::default()
        }
    }

    fn entities(
        config: &PublisherConfig,
    ) -> (
        Arc<Participant>,
        DataWriter<SequencesData>,
        DataReader<SequencesData>,
    ) {
        let participant = Participant::builder("publisher_test")
            .history_depth(config.history_depth)
            .build()
            .expect("participant");
        let writer = open_writer(&participant, config).expect("writer");
        let topic = participant
            .create_topic::<SequencesData>(&config.topic_name, SEQUENCES_TYPE_NAME)
            .expect("topic");
        let reader = participant.create_reader(&topic).expect("reader");
        (participant, writer, reader)
    }

    #[test]
    fn test_writes_two_samples_per_round() {
        let config = test_config(25);
        let (_participant, writer, reader) = entities(&config);
        let mut buffer = vec![0i16; MAX_SEQUENCE_LEN];
        let mut rng = fastrand::Rng::with_seed(7);
        let running = AtomicBool::new(true);

        let report = publish_loop(&writer, &config, &mut buffer, &mut rng, &running).unwrap();

        assert_eq!(
            report,
            PublishReport {
                rounds: 25,
                samples_written: 50,
                write_errors: 0,
                teardown_errors: 0,
            }
        );
        assert_eq!(writer.stats().samples_written, 50);
        assert_eq!(reader.pending(), 50);
    }

    #[test]
    fn test_lengths_cycle_and_values_in_range() {
        let config = test_config(2 * MAX_SEQUENCE_LEN as u64);
        let (_participant, writer, reader) = entities(&config);
        let mut buffer = vec![0i16; MAX_SEQUENCE_LEN];
        let mut rng = fastrand::Rng::with_seed(42);
        let running = AtomicBool::new(true);

        publish_loop(&writer, &config, &mut buffer, &mut rng, &running).unwrap();

        let samples = reader.take_batch(usize::MAX).unwrap();
        assert_eq!(samples.len(), 4 * MAX_SEQUENCE_LEN);
        for (n, sample) in samples.iter().enumerate() {
            let count = n / 2;
            let expected_id = if n % 2 == 0 { OWNER_ID } else { BORROWER_ID };
            assert_eq!(sample.data.id, expected_id);
            assert_eq!(sample.data.count, count as i32);
            assert_eq!(sample.data.data.len(), count % MAX_SEQUENCE_LEN + 1);
            assert!(sample.data.data.iter().all(|v| (0..100).contains(v)));
        }
    }

    #[test]
    fn test_borrower_buffer_holds_last_round() {
        let config = test_config(4);
        let (_participant, writer, reader) = entities(&config);
        let mut buffer = vec![-1i16; MAX_SEQUENCE_LEN];
        let mut rng = fastrand::Rng::with_seed(3);
        let running = AtomicBool::new(true);

        publish_loop(&writer, &config, &mut buffer, &mut rng, &running).unwrap();

        let last = reader
            .take_batch(usize::MAX)
            .unwrap()
            .into_iter()
            .rev()
            .find(|s| s.data.id == BORROWER_ID)
            .expect("borrower sample");
        assert_eq!(last.data.data.len(), 4);
        assert_eq!(&buffer[..4], last.data.data.as_slice());
        assert!(buffer[4..].iter().all(|&v| v == -1));
    }

    #[test]
    fn test_stop_flag_ends_loop() {
        let config = test_config(0);
        let (_participant, writer, _reader) = entities(&config);
        let mut buffer = vec![0i16; MAX_SEQUENCE_LEN];
        let mut rng = fastrand::Rng::with_seed(1);
        let running = AtomicBool::new(false);

        let report = publish_loop(&writer, &config, &mut buffer, &mut rng, &running).unwrap();

        assert_eq!(report.rounds, 0);
        assert_eq!(report.teardown_errors, 0);
    }

    #[test]
    fn test_write_errors_are_counted_not_fatal() {
        let config = test_config(3);
        let (participant, writer, _reader) = entities(&config);
        participant.delete_contained_entities().unwrap();
        let mut buffer = vec![0i16; MAX_SEQUENCE_LEN];
        let mut rng = fastrand::Rng::with_seed(9);
        let running = AtomicBool::new(true);

        let report = publish_loop(&writer, &config, &mut buffer, &mut rng, &running).unwrap();

        assert_eq!(report.rounds, 3);
        assert_eq!(report.samples_written, 0);
        assert_eq!(report.write_errors, 6);
        assert_eq!(report.teardown_errors, 0);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let config = test_config(1);
        let (_participant, writer, _reader) = entities(&config);
        let mut buffer = vec![0i16; MAX_SEQUENCE_LEN - 1];
        let mut rng = fastrand::Rng::with_seed(5);
        let running = AtomicBool::new(true);

        let result = publish_loop(&writer, &config, &mut buffer, &mut rng, &running);

        assert!(result.is_err());
        assert_eq!(writer.stats().samples_written, 0);
    }

    #[test]
    fn test_sample_counter_wraps_instead_of_truncating() {
        assert_eq!(sample_counter(0), 0);
        assert_eq!(sample_counter(41), 41);
        assert_eq!(sample_counter(i32::MAX as u64), i32::MAX);
        assert_eq!(sample_counter(i32::MAX as u64 + 1), 0);
        assert_eq!(sample_counter(u64::from(u32::MAX) + 5), 4);
        assert!(sample_counter(u64::MAX) >= 0);
    }

    #[test]
    fn test_full_run() {
        let config = test_config(2);
        let running = AtomicBool::new(true);

        let report = run(&config, &running).unwrap();

        assert_eq!(report.samples_written, 4);
        assert_eq!(report.teardown_errors, 0);
    }
}
