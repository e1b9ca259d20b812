use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use quarry_core::config::EditorConfig;
use quarry_map::{EditOperation, EditorSession, GroupId, ObjectId};

/// A session with `count` objects under the root, every other one in `group`.
fn populated(count: usize) -> (EditorSession, GroupId, Vec<ObjectId>) {
    let mut session = EditorSession::new(&EditorConfig::default());
    let group = session.document_mut().add_group("Walls").expect("fresh registry");
    let other = session.document_mut().add_group("Detail").expect("fresh registry");
    let root = session.document().scene().root();
    let ids: Vec<ObjectId> = (0..count)
        .map(|i| {
            let groups = if i % 2 == 0 { vec![group, other] } else { vec![other] };
            session
                .document_mut()
                .spawn_in_visgroups(format!("brush{i}"), groups)
        })
        .collect();
    let create = EditOperation::create_under("Create", session.document().scene(), root, &ids);
    session.execute(create).expect("populate benchmark map");
    (session, group, ids)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn bench_destroy_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy_undo_redo");
    for count in [100, 1_000, 10_000] {
        let (mut session, _, ids) = populated(count);
        let selection: Vec<ObjectId> = ids.iter().copied().step_by(3).collect();
        let destroy = EditOperation::destroy("Delete", session.document().scene(), &selection)
            .expect("selection is attached");
        session.execute(destroy).expect("destroy applies");

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                session.undo().expect("undo");
                session.redo().expect("redo");
                black_box(session.document().scene().object_count())
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Visgroups
// ---------------------------------------------------------------------------

fn bench_toggle_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_group");
    for count in [100, 1_000, 10_000] {
        let (mut session, walls, _) = populated(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                session.toggle_group(walls, false).expect("known group");
                let report = session.toggle_group(walls, true).expect("known group");
                black_box(report.objects.len())
            });
        });
    }
    group.finish();
}

fn bench_refresh_indicators(c: &mut Criterion) {
    let (mut session, walls, _) = populated(10_000);
    session.toggle_group(walls, false).expect("known group");

    c.bench_function("refresh_indicators_10000", |b| {
        b.iter(|| {
            session.document_mut().refresh_indicators();
            black_box(session.document().group_visibility(walls))
        });
    });
}

criterion_group!(
    benches,
    bench_destroy_undo_redo,
    bench_toggle_group,
    bench_refresh_indicators,
);
criterion_main!(benches);
