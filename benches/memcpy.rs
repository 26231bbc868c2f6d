use core::ffi::c_void;
use chunkcopy::memcpy::fast_copy;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::time::Duration;

unsafe extern "C" {
    #[link_name = "memcpy"]
    fn libc_memcpy(dest: *mut c_void, src: *const c_void, n: usize) -> *mut c_void;
}

#[derive(Clone)]
struct CopyCase {
    label: String,
    len: usize,
    src_off: usize,
    dst_off: usize,
}

fn configure_group_for_len(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    len: usize,
) {
    if len >= 1 << 16 {
        group.sample_size(30);
        group.warm_up_time(Duration::from_millis(250));
        group.measurement_time(Duration::from_millis(700));
    } else {
        group.sample_size(40);
        group.warm_up_time(Duration::from_millis(200));
        group.measurement_time(Duration::from_millis(500));
    }
}

fn fast_copy_benches(c: &mut Criterion) {
    let mut cases = Vec::new();

    // Size-class boundaries of the dispatcher and the unrolled loop.
    let sizes = [
        1usize, 3, 7, 8, 15, 16, 17, 63, 64, 65, 127, 128, 129, 255, 256, 257, 1024, 4096, 65536,
    ];

    for len in sizes {
        cases.push(CopyCase {
            label: format!("size_{len}"),
            len,
            src_off: 0,
            dst_off: 0,
        });
    }

    let align_sizes = [15usize, 64, 257, 4096];
    let align_pairs = [(1usize, 1usize), (7, 3), (15, 9)];
    for len in align_sizes {
        for (src_off, dst_off) in align_pairs {
            cases.push(CopyCase {
                label: format!("align_len{len}_s{src_off}_d{dst_off}"),
                len,
                src_off,
                dst_off,
            });
        }
    }

    let mut group = c.benchmark_group("fast_copy");

    for case in &cases {
        let len = case.len;
        let alloc_len = len + 32;
        let mut src = vec![0u8; alloc_len];
        let mut dst = vec![0u8; alloc_len];
        for (i, byte) in src.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let src_ptr = unsafe { src.as_ptr().add(case.src_off) };
        let dst_ptr = unsafe { dst.as_mut_ptr().add(case.dst_off) };

        configure_group_for_len(&mut group, len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("libc", &case.label), &len, |b, &n| {
            b.iter(|| unsafe {
                libc_memcpy(
                    black_box(dst_ptr as *mut c_void),
                    black_box(src_ptr as *const c_void),
                    black_box(n),
                );
                black_box(core::ptr::read_volatile(dst_ptr));
            });
        });

        group.bench_with_input(BenchmarkId::new("chunkcopy", &case.label), &len, |b, &n| {
            b.iter(|| unsafe {
                fast_copy(black_box(dst_ptr), black_box(src_ptr), black_box(n));
                black_box(core::ptr::read_volatile(dst_ptr));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, fast_copy_benches);
criterion_main!(benches);
