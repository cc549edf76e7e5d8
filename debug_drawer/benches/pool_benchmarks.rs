use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use debug_overlay_core::math::{Transform3D, Vec3, look_at_rh, perspective_rh};
use debug_overlay_drawer::{
    CullingData, DebugDrawer, DrawerSettings, GeometryPool, InstanceDesc, NullSink, ProcessType,
    RenderView, ShapeKind, colors,
};

fn grid_position(i: u32) -> Vec3 {
    Vec3::new((i % 64) as f32 - 32.0, 0.0, (i / 64) as f32 - 32.0)
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

fn bench_keyed_updates(c: &mut Criterion) {
    let mut pool = GeometryPool::new();
    c.bench_function("pool_keyed_update_1024", |b| {
        b.iter(|| {
            for i in 0..1024u32 {
                pool.add_or_update_instance(
                    InstanceDesc::new(ShapeKind::Cube, Transform3D::from_translation(grid_position(i)))
                        .with_key(black_box(i as u64))
                        .with_duration(1.0),
                );
            }
        });
    });
}

fn bench_pool_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_tick");
    let view = look_at_rh(&Vec3::new(0.0, 10.0, 20.0), &Vec3::zeros(), &Vec3::y());
    let culling = CullingData::new(
        vec![debug_overlay_core::bounds::Frustum::from_view_projection(
            &(perspective_rh(1.0, 1.6, 0.1, 100.0) * view),
        )],
        vec![Vec3::new(0.0, 10.0, 20.0)],
        50.0,
    );

    for count in [256u32, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut pool = GeometryPool::new();
                for i in 0..count {
                    pool.add_or_update_instance(InstanceDesc::new(
                        ShapeKind::Sphere,
                        Transform3D::from_translation(grid_position(i)),
                    ));
                }
                pool.update_visibility(&culling);
                pool.fill_lines_data();
                pool.fill_instance_data();
                pool.scan_visible_instances();
                pool.update_expiration(ProcessType::Render);
                pool.reset_counter(0.016, ProcessType::Render);
                black_box(pool.stats().visible_instances)
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

fn bench_draw_and_process(c: &mut Criterion) {
    let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
    let view = RenderView::from_view_projection(
        &(perspective_rh(1.0, 1.6, 0.1, 100.0)
            * look_at_rh(&Vec3::new(0.0, 10.0, 20.0), &Vec3::zeros(), &Vec3::y())),
        Vec3::new(0.0, 10.0, 20.0),
        100.0,
    );

    c.bench_function("drawer_frame_1024_mixed", |b| {
        b.iter(|| {
            for i in 0..256u32 {
                let p = grid_position(i);
                drawer.draw_sphere(&p, 0.5, colors::EMPTY, 0.0);
                drawer.draw_line(&p, &(p + Vec3::y()), colors::EMPTY, 0.0);
                drawer.draw_arrow(&p, &(p + Vec3::x()), colors::EMPTY, 0.2, false, 0.0);
            }
            drawer.process(0.016, black_box(&[view]));
        });
    });
}

fn bench_thick_lines(c: &mut Criterion) {
    let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
    let path: Vec<Vec3> = (0..512).map(grid_position).collect();

    c.bench_function("drawer_thick_path_512", |b| {
        b.iter(|| {
            let _scope = drawer.new_scoped_config().with_thickness(0.05);
            drawer.draw_line_path(black_box(&path), colors::EMPTY, 0.0);
            drawer.process(0.016, &[]);
        });
    });
}

criterion_group!(
    benches,
    bench_keyed_updates,
    bench_pool_tick,
    bench_draw_and_process,
    bench_thick_lines,
);
criterion_main!(benches);
