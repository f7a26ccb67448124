mod common;

use criterion::{Criterion, criterion_group, criterion_main};

#[cfg(feature = "tokio")]
fn make_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread().worker_threads(24).enable_all().build().unwrap()
}

// Benchmark: Sync baseline with std::thread::scope (always runs, no features required)
fn bench_sync_concurrency(c: &mut Criterion) {
    use common::generate_random_passwords;
    use criterion::{BatchSize, black_box};
    use hibp_verifier::{Engine, EngineConfig, dataset_path_from_env, hashutil::sha1};

    let engine = Engine::open(EngineConfig::new(dataset_path_from_env()))
        .expect("set HIBP_DATABASE to a built pwned-passwords.bin to run this benchmark");
    let passwords = generate_random_passwords(10000);

    let mut group = c.benchmark_group("concurrent_10k");

    group.bench_function("sync_threads", |b| {
        b.iter_batched(
            || passwords.clone(),
            |data| {
                std::thread::scope(|s| {
                    let handles: Vec<_> = data
                        .iter()
                        .map(|password| {
                            let engine = &engine;
                            s.spawn(move || {
                                let hash = sha1(password.as_bytes());
                                engine.pwned(&hash)
                            })
                        })
                        .collect();

                    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
                    black_box(results)
                })
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// Benchmark: High concurrency comparison (10k concurrent lookups) - tokio spawn_blocking
#[cfg(feature = "tokio")]
fn bench_tokio_concurrency(c: &mut Criterion) {
    use common::generate_random_passwords;
    use criterion::{BatchSize, black_box};
    use futures::future::join_all;
    use hibp_verifier::{Engine, EngineConfig, dataset_path_from_env, hashutil::sha1};

    let rt = make_runtime();
    let engine = Engine::open(EngineConfig::new(dataset_path_from_env()))
        .expect("set HIBP_DATABASE to a built pwned-passwords.bin to run this benchmark");
    let passwords = generate_random_passwords(10000);

    let mut group = c.benchmark_group("concurrent_10k");

    group.bench_function("pwned_async", |b| {
        b.to_async(&rt).iter_batched(
            || passwords.clone(),
            |data| {
                let engine = engine.clone();
                async move {
                    let futs: Vec<_> = data
                        .into_iter()
                        .map(|password| {
                            let engine = engine.clone();
                            async move {
                                let hash = sha1(password.as_bytes());
                                engine.pwned_async(hash).await
                            }
                        })
                        .collect();

                    let results: Vec<_> = join_all(futs).await;
                    black_box(results)
                }
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

#[cfg(not(feature = "tokio"))]
fn bench_tokio_concurrency(_c: &mut Criterion) {}

criterion_group!(async_benches, bench_sync_concurrency, bench_tokio_concurrency);
criterion_main!(async_benches);
