use cbc_service::{EncryptionService, KeyMaterial};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_encrypt_decrypt(c: &mut Criterion) {
    let service: EncryptionService = EncryptionService::default();
    let material = KeyMaterial::new(&[0x42u8; 32], &[0x24u8; 16]).unwrap();

    let mut group = c.benchmark_group("aes256_cbc");
    for size in [64usize, 1024, 64 * 1024] {
        let plaintext = vec![0xA5u8; size];
        let ciphertext = service.encrypt_with(&plaintext, &material).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encrypt", size), &plaintext, |b, data| {
            b.iter(|| service.encrypt_with(black_box(data), &material).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decrypt", size), &ciphertext, |b, data| {
            b.iter(|| service.decrypt_with(black_box(data), &material).unwrap())
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let service: EncryptionService = EncryptionService::default();
    let material = KeyMaterial::new(&[0x42u8; 16], &[0x24u8; 16]).unwrap();
    let plaintext = vec![0x5Au8; 64 * 1024];

    c.bench_function("aes128_cbc_stream_4k_chunks", |b| {
        b.iter(|| {
            let mut enc = service.encryptor(&material).unwrap();
            let mut written = 0;
            for chunk in plaintext.chunks(4096) {
                written += enc.feed(black_box(chunk)).unwrap().len();
            }
            written + enc.finalize().unwrap().len()
        })
    });
}

criterion_group!(benches, bench_encrypt_decrypt, bench_streaming);
criterion_main!(benches);
