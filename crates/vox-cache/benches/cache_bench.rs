use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use tokio::runtime::Runtime;
use vox_cache::{AudioStore, MemoryCache, SqliteStore, SynthesisCache};
use vox_core::{AudioBlob, KeyDeriver, SpeechRequest, SynthesisError};
use vox_engine::SpeechSynthesizer;

/// Motor que devuelve un buffer fijo del tamano dado
struct StaticSynth(AudioBlob);

#[async_trait]
impl SpeechSynthesizer for StaticSynth {
    async fn synthesize(&self, _request: &SpeechRequest) -> Result<AudioBlob, SynthesisError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn audio(size: usize) -> AudioBlob {
    let mut bytes = b"RIFF".to_vec();
    bytes.resize(size, 0x7f);
    AudioBlob::new(bytes)
}

/// Benchmark: derivacion de key por longitud de texto
fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_derivation");

    for len in [16, 256, 4096] {
        let request = SpeechRequest::new("a".repeat(len), "en-us", "150");
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &request, |b, request| {
            b.iter(|| std::hint::black_box(KeyDeriver::derive(request)));
        });
    }

    group.finish();
}

/// Benchmark: speak con hit en memoria
fn bench_speak_memory_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = SynthesisCache::builder()
        .store(Arc::new(SqliteStore::open_in_memory().unwrap()))
        .synthesizer(Arc::new(StaticSynth(audio(32 * 1024))))
        .build()
        .unwrap();
    let request = SpeechRequest::new("hello world", "en-us", "150");

    rt.block_on(async {
        cache.speak(&request).await.unwrap();
    });

    c.bench_function("speak_memory_hit", |b| {
        b.to_async(&rt).iter(|| async {
            std::hint::black_box(cache.speak(&request).await.unwrap())
        });
    });
}

/// Benchmark: speak con hit durable (memoria vacia en cada iteracion)
fn bench_speak_durable_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store: Arc<dyn AudioStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(StaticSynth(audio(32 * 1024)));
    let request = SpeechRequest::new("hello world", "en-us", "150");

    rt.block_on(async {
        let key = KeyDeriver::derive(&request);
        store.put(&key, &audio(32 * 1024)).await.unwrap();
    });

    c.bench_function("speak_durable_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let cache = SynthesisCache::builder()
                .memory(MemoryCache::new())
                .store(Arc::clone(&store))
                .synthesizer(Arc::clone(&synth))
                .build()
                .unwrap();
            std::hint::black_box(cache.speak(&request).await.unwrap())
        });
    });
}

/// Benchmark: escritura durable por tamano de audio
fn bench_store_put(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    let key = KeyDeriver::derive(&SpeechRequest::new("put", "en-us", "150"));

    let mut group = c.benchmark_group("store_put");

    for size in [1024, 64 * 1024, 512 * 1024] {
        let blob = audio(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &blob, |b, blob| {
            b.to_async(&rt)
                .iter(|| async { store.put(&key, blob).await.unwrap() });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_speak_memory_hit,
    bench_speak_durable_hit,
    bench_store_put,
);
criterion_main!(benches);
