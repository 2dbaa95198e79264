use cart::Cart;
use common::Money;
use criterion::{Criterion, criterion_group, criterion_main};
use saga::{
    InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService, OrderCoordinator,
};

fn make_coordinator()
-> OrderCoordinator<InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService> {
    OrderCoordinator::new(
        InMemoryInventoryService::new(),
        InMemoryPaymentService::new(),
        InMemoryShippingService::new(),
    )
}

fn make_cart(items: usize, dollars_each: i64) -> Cart {
    let mut cart = Cart::new();
    for i in 0..items {
        cart.add_item(format!("SKU-{i:03}"), Money::from_dollars(dollars_each))
            .unwrap();
    }
    cart
}

fn bench_completed_order(c: &mut Criterion) {
    let coordinator = make_coordinator();
    let cart = make_cart(5, 10);

    c.bench_function("saga/place_order_completed", |b| {
        b.iter(|| coordinator.place_order(&cart, "1234-5678", "NY-Street"));
    });
}

fn bench_declined_order_rollback(c: &mut Criterion) {
    let coordinator = make_coordinator();
    let cart = make_cart(20, 100);

    c.bench_function("saga/place_order_declined_rollback", |b| {
        b.iter(|| coordinator.place_order(&cart, "1234-5678", "NY-Street"));
    });
}

fn bench_cart_total(c: &mut Criterion) {
    let cart = make_cart(100, 3);

    c.bench_function("cart/total_100_items", |b| {
        b.iter(|| cart.total());
    });
}

criterion_group!(
    benches,
    bench_completed_order,
    bench_declined_order_rollback,
    bench_cart_total
);
criterion_main!(benches);
