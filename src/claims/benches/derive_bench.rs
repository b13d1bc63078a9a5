//! Role derivation benchmarks
//!
//! Runs once per authenticated request, so per-call cost and allocation
//! count matter more than throughput on large inputs.

use cretoai_claims::{ClaimSet, ClaimsPrincipal, RoleClaimDeriver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn job_title(segments: usize) -> String {
    (0..segments)
        .map(|i| if i % 4 == 3 { "  ".to_string() } else { format!(" role-{} ", i) })
        .collect::<Vec<_>>()
        .join(",")
}

fn roles_array(elements: usize) -> String {
    let roles: Vec<String> = (0..elements)
        .map(|i| if i % 4 == 3 { String::new() } else { format!("role-{}", i) })
        .collect();
    serde_json::to_string(&roles).unwrap()
}

fn bench_job_title(c: &mut Criterion) {
    let deriver = RoleClaimDeriver::default();
    let mut group = c.benchmark_group("add_roles_from_job_title");

    for segments in [1, 4, 16, 64].iter() {
        let value = job_title(*segments);
        group.bench_with_input(BenchmarkId::new("segments", segments), &value, |b, value| {
            b.iter_batched(
                || ClaimSet::new().with_claim("jobTitle", value.as_str()),
                |mut set| {
                    black_box(deriver.add_roles_from_job_title(&mut set));
                    set
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_roles(c: &mut Criterion) {
    let deriver = RoleClaimDeriver::default();
    let mut group = c.benchmark_group("add_roles_from_roles");

    for elements in [1, 4, 16, 64].iter() {
        let value = roles_array(*elements);
        group.bench_with_input(BenchmarkId::new("elements", elements), &value, |b, value| {
            b.iter_batched(
                || ClaimSet::new().with_claim("roles", value.as_str()),
                |mut set| {
                    black_box(deriver.add_roles_from_roles(&mut set).unwrap());
                    set
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_noop(c: &mut Criterion) {
    let deriver = RoleClaimDeriver::default();

    c.bench_function("add_roles_from_job_title/absent", |b| {
        let mut principal = ClaimsPrincipal::new("Bearer").with_claim("sub", "user:alice");
        b.iter(|| black_box(deriver.add_roles_from_job_title(&mut principal)));
    });
}

criterion_group!(benches, bench_job_title, bench_roles, bench_noop);
criterion_main!(benches);
