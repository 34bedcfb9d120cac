use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ring_buffer::BoundedBuffer;
use std::sync::Arc;
use std::thread;

fn bench_single_thread(c: &mut Criterion) {
    let buffer = BoundedBuffer::new(64).unwrap();
    c.bench_function("enqueue_dequeue_single_thread", |b| {
        b.iter(|| {
            buffer.enqueue(black_box(25.0f64));
            black_box(buffer.dequeue());
        })
    });
}

fn bench_producer_consumer(c: &mut Criterion) {
    c.bench_function("spsc_10k_capacity_16", |b| {
        b.iter(|| {
            let buffer = Arc::new(BoundedBuffer::new(16).unwrap());
            let producer = {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..10_000 {
                        buffer.enqueue(i as f64);
                    }
                })
            };
            for _ in 0..10_000 {
                black_box(buffer.dequeue());
            }
            producer.join().unwrap();
        })
    });
}

criterion_group!(benches, bench_single_thread, bench_producer_consumer);
criterion_main!(benches);
