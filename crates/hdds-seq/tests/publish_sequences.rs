// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish/take integration tests for `sequences` samples
//!
//! Exercises owned and loaned samples through the in-process writer and
//! reader, the way the publisher tool drives them.

use hdds_seq::dds::{DataReader, DataWriter, InstanceHandle, Participant};
use hdds_seq::{
    Error, SequenceState, Sequences, SequencesData, MAX_SEQUENCE_LEN, SEQUENCES_TYPE_NAME,
};
use std::sync::Arc;

fn setup(
    name: &str,
    depth: usize,
) -> (
    Arc<Participant>,
    DataWriter<SequencesData>,
    DataReader<SequencesData>,
) {
    let participant = Participant::builder(name)
        .domain_id(0)
        .history_depth(depth)
        .build()
        .expect("Failed to create participant");
    participant
        .register_type::<SequencesData>(SEQUENCES_TYPE_NAME)
        .expect("Failed to register type");
    let topic = participant
        .create_topic::<SequencesData>("Example sequences", SEQUENCES_TYPE_NAME)
        .expect("Failed to create topic");
    let writer = participant
        .create_writer(&topic)
        .expect("Failed to create writer");
    let reader = participant
        .create_reader(&topic)
        .expect("Failed to create reader");
    (participant, writer, reader)
}

#[test]
fn test_owner_and_borrower_publish_cycle() {
    let (participant, writer, reader) = setup("cycle", 64);

    let mut short_buffer = vec![0i16; MAX_SEQUENCE_LEN];
    let mut owner = Sequences::new();
    let mut borrower = Sequences::new();

    borrower.data.set_capacity(0).unwrap();
    borrower
        .data
        .loan(&mut short_buffer, 0, MAX_SEQUENCE_LEN)
        .unwrap();

    owner.set_id("owner_instance").unwrap();
    borrower.set_id("borrower_instance").unwrap();

    let rounds = 2 * MAX_SEQUENCE_LEN;
    for count in 0..rounds {
        let length = (count % MAX_SEQUENCE_LEN) + 1;
        owner.count = count as i32;
        borrower.count = count as i32;
        owner.data.set_length(length).unwrap();
        borrower.data.set_length(length).unwrap();

        for i in 0..length {
            owner.data.set(i, (count + i) as i16).unwrap();
            borrower.data.set(i, -((count + i) as i16)).unwrap();
        }

        writer.write(&owner, InstanceHandle::nil()).unwrap();
        writer.write(&borrower, InstanceHandle::nil()).unwrap();
    }

    let samples = reader.take_batch(usize::MAX).unwrap();
    assert_eq!(samples.len(), 2 * rounds);

    for (n, sample) in samples.iter().enumerate() {
        let count = n / 2;
        let length = (count % MAX_SEQUENCE_LEN) + 1;
        assert_eq!(sample.seq, n as u64 + 1);
        assert_eq!(sample.data.count, count as i32);
        assert_eq!(sample.data.data.len(), length);
        if n % 2 == 0 {
            assert_eq!(sample.data.id, "owner_instance");
            assert_eq!(sample.data.data[0], count as i16);
        } else {
            assert_eq!(sample.data.id, "borrower_instance");
            assert_eq!(sample.data.data[0], -(count as i16));
        }
    }

    let returned = borrower.data.unloan().expect("unloan");
    assert_eq!(returned[0], -((rounds - 1) as i16));
    assert_eq!(borrower.data.state(), SequenceState::Released);

    owner.delete().unwrap();
    borrower.delete().unwrap();
    participant.delete_contained_entities().unwrap();
}

#[test]
fn test_snapshot_is_independent_of_later_changes() {
    let (_participant, writer, reader) = setup("snapshot", 8);

    let mut block = vec![0i16; MAX_SEQUENCE_LEN];
    let mut sample = Sequences::new();
    sample.data.set_capacity(0).unwrap();
    sample.data.loan(&mut block, 0, MAX_SEQUENCE_LEN).unwrap();

    sample.data.assign(&[1, 2, 3]).unwrap();
    writer.write(&sample, InstanceHandle::nil()).unwrap();
    sample.data.assign(&[9, 9, 9, 9]).unwrap();
    let returned = sample.data.unloan().unwrap();

    let received = reader.take().unwrap().expect("sample");
    assert_eq!(received.data.data, vec![1, 2, 3]);
    assert_eq!(returned[..4], [9, 9, 9, 9]);
}

#[test]
fn test_nil_handle_resolves_to_key() {
    let (_participant, writer, reader) = setup("keys", 8);

    let mut a = Sequences::new();
    a.set_id("a").unwrap();
    let mut b = Sequences::new();
    b.set_id("b").unwrap();

    let handle_b = writer.register_instance(&b);
    writer.write(&a, InstanceHandle::nil()).unwrap();
    writer.write(&b, InstanceHandle::nil()).unwrap();
    writer.write(&a, InstanceHandle::nil()).unwrap();

    let sample = reader.take_instance(handle_b).unwrap().expect("instance b");
    assert_eq!(sample.data.id, "b");
    assert_eq!(sample.instance_handle, handle_b);
    assert_eq!(reader.pending(), 2);
}

#[test]
fn test_explicit_handle_is_kept() {
    let (_participant, writer, reader) = setup("explicit", 8);
    let handle = InstanceHandle::new([3u8; 16]);

    writer.write(&Sequences::new(), handle).unwrap();

    assert_eq!(reader.take().unwrap().map(|s| s.instance_handle), Some(handle));
}

#[test]
fn test_keep_last_history() {
    let (_participant, writer, reader) = setup("keep_last", 4);
    let mut sample = Sequences::new();

    for count in 0..10 {
        sample.count = count;
        writer.write(&sample, InstanceHandle::nil()).unwrap();
    }

    let counts: Vec<i32> = reader
        .take_batch(usize::MAX)
        .unwrap()
        .into_iter()
        .map(|s| s.data.count)
        .collect();
    assert_eq!(counts, vec![6, 7, 8, 9]);
    assert_eq!(reader.evicted(), 6);
    assert_eq!(writer.stats().samples_written, 10);
    assert_eq!(writer.stats().last_seq, 10);
}

#[test]
fn test_write_without_reader_still_counts() {
    let participant = Participant::new("no_reader").unwrap();
    participant
        .register_type::<SequencesData>(SEQUENCES_TYPE_NAME)
        .unwrap();
    let topic = participant
        .create_topic::<SequencesData>("lonely", SEQUENCES_TYPE_NAME)
        .unwrap();
    let writer = participant.create_writer(&topic).unwrap();

    writer.write(&Sequences::new(), InstanceHandle::nil()).unwrap();

    let stats = writer.stats();
    assert_eq!(stats.samples_written, 1);
    assert_eq!(stats.deliveries, 0);
}

#[test]
fn test_dropped_reader_is_pruned() {
    let (_participant, writer, reader) = setup("prune", 4);
    drop(reader);

    writer.write(&Sequences::new(), InstanceHandle::nil()).unwrap();

    assert_eq!(writer.stats().deliveries, 0);
}

#[test]
fn test_read_keeps_samples_and_advances() {
    let (participant, writer, reader) = setup("read", 8);
    let mut sample = Sequences::new();

    for count in 0..3 {
        sample.count = count;
        writer.write(&sample, InstanceHandle::nil()).unwrap();
    }

    let first = reader.read().unwrap().expect("first unread");
    let second = reader.read().unwrap().expect("second unread");
    assert_eq!((first.data.count, second.data.count), (0, 1));
    assert_eq!(reader.pending(), 3);

    // take still starts from the oldest sample
    assert_eq!(reader.take().unwrap().map(|s| s.data.count), Some(0));
    assert_eq!(reader.read().unwrap().map(|s| s.data.count), Some(2));
    assert!(reader.read().unwrap().is_none());

    participant.delete_contained_entities().unwrap();
    assert_eq!(reader.read().err(), Some(Error::AlreadyDeleted));
}

#[test]
fn test_reader_count_tracks_live_readers() {
    let participant = Participant::new("reader_count").unwrap();
    participant
        .register_type::<SequencesData>(SEQUENCES_TYPE_NAME)
        .unwrap();
    let topic = participant
        .create_topic::<SequencesData>("counted", SEQUENCES_TYPE_NAME)
        .unwrap();
    assert_eq!(topic.reader_count(), 0);

    let first = participant.create_reader(&topic).unwrap();
    let second = participant.create_reader(&topic).unwrap();
    assert_eq!(topic.reader_count(), 2);

    drop(first);
    assert_eq!(topic.reader_count(), 1);

    drop(second);
    assert_eq!(topic.reader_count(), 0);
}

#[test]
fn test_write_after_teardown_fails() {
    let (participant, writer, reader) = setup("teardown", 4);
    writer.write(&Sequences::new(), InstanceHandle::nil()).unwrap();

    participant.delete_contained_entities().unwrap();

    assert_eq!(
        writer.write(&Sequences::new(), InstanceHandle::nil()),
        Err(Error::AlreadyDeleted)
    );
    assert_eq!(reader.take().err(), Some(Error::AlreadyDeleted));
    assert_eq!(reader.pending(), 0);
}

#[test]
fn test_write_released_sample_fails() {
    let (_participant, writer, reader) = setup("released", 4);
    let mut block = vec![0i16; MAX_SEQUENCE_LEN];
    let mut sample = Sequences::new();
    sample.data.set_capacity(0).unwrap();
    sample.data.loan(&mut block, 1, MAX_SEQUENCE_LEN).unwrap();
    sample.data.unloan().unwrap();

    let result = writer.write(&sample, InstanceHandle::nil());

    assert!(matches!(result, Err(Error::InvalidState(_))));
    assert!(reader.take().unwrap().is_none());
    assert_eq!(writer.stats().samples_written, 0);
}
