use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use turnscan_core::BoundedPointList;
use turnscan_image::Image;
use turnscan_imgproc::laser::{extract_laser_points, LaserParams};

// a diagonal stripe a few pixels wide, one run per row
fn stripe_frame(width: usize, height: usize) -> Image<u8, 3> {
    let mut frame = Image::<u8, 3>::from_size_val([width, height].into(), 20).unwrap();
    for y in 0..height {
        let x0 = (y * width / height).min(width.saturating_sub(5));
        for x in x0..x0 + 4 {
            frame.set_pixel(x, y, [200, 200, 240]).unwrap();
        }
    }
    frame
}

fn bench_laser(c: &mut Criterion) {
    let mut group = c.benchmark_group("LaserExtraction");

    for (width, height) in [(320, 240), (640, 480), (1280, 960)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let frame = stripe_frame(*width, *height);

        for row_stride in [1, 4] {
            let params = LaserParams {
                row_stride,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("stride_{row_stride}"), &parameter_string),
                &frame,
                |b, frame| {
                    b.iter(|| {
                        let mut points = BoundedPointList::new(frame.rows());
                        extract_laser_points(
                            black_box(frame),
                            frame.size(),
                            &params,
                            black_box(&mut points),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_laser);
criterion_main!(benches);
