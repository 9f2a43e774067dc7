//! Argon2 密码哈希性能基准测试

use criterion::{Criterion, criterion_group, criterion_main};
use adorna::utils::password::{hash_password, verify_configured_password, verify_password};

fn bench_hash_password(c: &mut Criterion) {
    c.bench_function("password/hash", |b| {
        b.iter(|| {
            let _ = hash_password("shopper-pass-123");
        });
    });
}

fn bench_verify_password(c: &mut Criterion) {
    let password = "correct-password-456";
    let hash = hash_password(password).expect("hash should succeed");

    let mut group = c.benchmark_group("password/verify");

    group.bench_function("correct", |b| {
        b.iter(|| {
            let result = verify_password(password, &hash).expect("verify should succeed");
            assert!(result);
        });
    });

    group.bench_function("wrong", |b| {
        b.iter(|| {
            let result = verify_password("wrong-password", &hash).expect("verify should succeed");
            assert!(!result);
        });
    });

    group.finish();
}

/// 管理员密码：明文配置走常量时间比较，哈希配置走 Argon2
fn bench_verify_configured_password(c: &mut Criterion) {
    let hashed = hash_password("admin-pass-123").expect("hash should succeed");

    let mut group = c.benchmark_group("password/verify_configured");

    group.bench_function("plaintext", |b| {
        b.iter(|| {
            assert!(verify_configured_password("admin-pass-123", "admin-pass-123").unwrap());
        });
    });

    group.bench_function("argon2", |b| {
        b.iter(|| {
            assert!(verify_configured_password("admin-pass-123", &hashed).unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_password,
    bench_verify_password,
    bench_verify_configured_password,
);
criterion_main!(benches);
