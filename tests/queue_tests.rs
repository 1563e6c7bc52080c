use spsc_logger::spsc_queue::channel;
use spsc_logger::LogElement;
use std::thread;

#[test]
fn test_capacity_rounds_up_to_power_of_two() {
    assert_eq!(channel::<u8>(0).0.capacity(), 1);
    assert_eq!(channel::<u8>(1).0.capacity(), 1);
    assert_eq!(channel::<u8>(5).0.capacity(), 8);
    assert_eq!(channel::<u8>(16).1.capacity(), 16);
}

#[test]
fn test_fifo_order_single_thread() {
    let (mut tx, mut rx) = channel::<u32>(8);
    for i in 0..8 {
        tx.push(i);
    }
    assert_eq!(tx.len(), 8);
    for i in 0..8 {
        assert_eq!(rx.pop(), Some(i));
    }
    assert_eq!(rx.pop(), None);
    assert!(rx.is_empty());
}

#[test]
fn test_uncommitted_write_is_invisible() {
    let (mut tx, mut rx) = channel::<u32>(4);
    {
        let mut slot = tx.reserve();
        *slot = 99;
        // dropped without commit
    }
    assert!(rx.peek().is_none());
    assert_eq!(tx.len(), 0);

    let mut slot = tx.reserve();
    *slot = 7;
    slot.commit();
    assert_eq!(rx.pop(), Some(7));
}

#[test]
fn test_unreleased_read_is_returned_again() {
    let (mut tx, mut rx) = channel::<u32>(4);
    tx.push(1);
    tx.push(2);

    {
        let slot = rx.peek().unwrap();
        assert_eq!(*slot, 1);
    }
    let slot = rx.peek().unwrap();
    assert_eq!(*slot, 1);
    slot.release();
    assert_eq!(rx.len(), 1);
    assert_eq!(rx.pop(), Some(2));
}

#[test]
fn test_wraparound_keeps_occupancy_invariant() {
    const CAP: usize = 4;
    let (mut tx, mut rx) = channel::<usize>(CAP);
    let mut next_expected = 0;
    let mut next_value = 0;

    // Each round fills then partially drains, so both cursors wrap many times.
    for _ in 0..(CAP * 5) {
        while tx.len() < CAP {
            tx.push(next_value);
            next_value += 1;
            assert!(tx.len() <= CAP);
        }
        for _ in 0..3 {
            assert_eq!(rx.pop(), Some(next_expected));
            next_expected += 1;
        }
        assert_eq!(rx.len(), next_value - next_expected);
    }
    while let Some(v) = rx.pop() {
        assert_eq!(v, next_expected);
        next_expected += 1;
    }
    assert_eq!(next_expected, next_value);
    assert!(next_value > CAP * 2, "cursors should have wrapped at least twice");
    assert_eq!(rx.len(), 0);
}

fn transfer_concurrently(capacity: usize, count: usize) {
    let (mut tx, mut rx) = channel::<LogElement>(capacity);

    let consumer = thread::spawn(move || {
        let mut received = Vec::with_capacity(count);
        while received.len() < count {
            match rx.pop() {
                Some(element) => received.push(element),
                None => thread::yield_now(),
            }
        }
        assert!(rx.pop().is_none(), "nothing beyond what was sent");
        received
    });

    for i in 0..count {
        tx.push(LogElement::U64(i as u64));
    }

    let received = consumer.join().unwrap();
    assert_eq!(received.len(), count);
    for (i, element) in received.iter().enumerate() {
        assert_eq!(*element, LogElement::U64(i as u64));
    }
}

#[test]
fn test_no_loss_under_concurrency() {
    const CAP: usize = 16;
    for count in [0, 1, CAP - 1, CAP, CAP * 3, CAP * 64 + 5] {
        transfer_concurrently(CAP, count);
    }
}

#[test]
fn test_producer_blocks_until_consumer_frees_slot() {
    let (mut tx, mut rx) = channel::<u32>(2);
    tx.push(1);
    tx.push(2);

    let producer = thread::spawn(move || {
        // Ring is full; this waits for the consumer below.
        tx.push(3);
        tx
    });

    thread::sleep(std::time::Duration::from_millis(20));
    assert!(!producer.is_finished());
    assert_eq!(rx.pop(), Some(1));

    let tx = producer.join().unwrap();
    assert_eq!(tx.len(), 2);
    assert_eq!(rx.pop(), Some(2));
    assert_eq!(rx.pop(), Some(3));
}

#[test]
fn test_handles_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<spsc_logger::spsc_queue::Producer<LogElement>>();
    assert_send::<spsc_logger::spsc_queue::Consumer<LogElement>>();
}

#[test]
#[should_panic(expected = "consumer is gone")]
fn test_full_ring_without_consumer_is_fatal() {
    let (mut tx, rx) = channel::<u32>(2);
    tx.push(1);
    tx.push(2);
    drop(rx);
    tx.push(3);
}
