//! Dispatch Performance Benchmarks
//!
//! Measures the cost of a full dispatch (method check, backend call and
//! HAL rendering) for single items and paginated collections of
//! increasing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use futures::executor::block_on;
use hal_resource::resource::{EventBackend, Operation, Paginator, ResourceItem};
use hal_resource::{QueryParams, ResourceConfig, ResourceController, ResourceRequest};

fn create_test_item(id: usize) -> ResourceItem {
    ResourceItem::new()
        .with_field("id", format!("item-{}", id))
        .with_field("name", format!("Item {}", id))
        .with_field("active", id % 2 == 0)
}

fn create_controller(total: usize) -> ResourceController<EventBackend> {
    let backend = EventBackend::new()
        .with_listener(Operation::Fetch, |context| {
            Ok(Some(
                ResourceItem::new()
                    .with_field("id", context.identifier_or_empty())
                    .into(),
            ))
        })
        .with_listener(Operation::FetchAll, move |_| {
            let items: Vec<ResourceItem> = (0..total).map(create_test_item).collect();
            Ok(Some(Paginator::new(items).into()))
        });

    ResourceController::new(backend)
        .with_config(
            ResourceConfig::new()
                .with_route("/items")
                .with_server_url("https://api.example.com"),
        )
        .expect("benchmark configuration is valid")
}

fn bench_fetch_item(c: &mut Criterion) {
    let controller = create_controller(0);

    c.bench_function("dispatch_fetch_item", |b| {
        b.iter(|| {
            let response = block_on(controller.dispatch(ResourceRequest::get("item-1")));
            black_box(response)
        })
    });
}

fn bench_fetch_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_fetch_collection");

    for total in [10, 100, 1000].iter() {
        let controller = create_controller(*total);
        group.throughput(Throughput::Elements(*total as u64));
        group.bench_with_input(BenchmarkId::new("page_2", total), total, |b, _| {
            b.iter(|| {
                let request = ResourceRequest::list()
                    .with_query(QueryParams::new().with("sort", "name").with("page", "2"));
                black_box(block_on(controller.dispatch(request)))
            })
        });
    }

    group.finish();
}

fn bench_rejected_method(c: &mut Criterion) {
    let controller = create_controller(0);

    c.bench_function("dispatch_method_not_allowed", |b| {
        b.iter(|| black_box(block_on(controller.dispatch(ResourceRequest::delete("")))))
    });
}

criterion_group!(
    benches,
    bench_fetch_item,
    bench_fetch_collection,
    bench_rejected_method
);
criterion_main!(benches);
