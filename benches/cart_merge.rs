//! 购物车合并与订单金额计算基准测试

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use adorna::payments::to_minor_units;
use adorna::storage::{Cart, OrderItem};

fn filled_cart(products: usize, sizes: &[&str]) -> Cart {
    let mut cart = Cart::new();
    for i in 0..products {
        let id = format!("product-{:04}", i);
        for size in sizes {
            cart.add_item(&id, size);
        }
    }
    cart
}

fn bench_add_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart/add_item");

    for products in [10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(products),
            &products,
            |b, &products| {
                b.iter(|| black_box(filled_cart(products, &["S", "M", "L"])));
            },
        );
    }

    group.finish();
}

fn bench_set_quantity(c: &mut Criterion) {
    let base = filled_cart(100, &["S", "M", "L", "XL"]);

    c.bench_function("cart/set_quantity_remove_all", |b| {
        b.iter(|| {
            let mut cart = base.clone();
            for i in 0..100 {
                let id = format!("product-{:04}", i);
                for size in ["S", "M", "L", "XL"] {
                    cart.set_quantity(&id, size, 0);
                }
            }
            assert!(cart.is_empty());
        });
    });
}

fn bench_cart_json(c: &mut Criterion) {
    let cart = filled_cart(200, &["S", "M", "L"]);
    let json = serde_json::to_string(&cart).expect("serialize cart");

    let mut group = c.benchmark_group("cart/json");

    group.bench_function("serialize", |b| {
        b.iter(|| black_box(serde_json::to_string(&cart).unwrap()));
    });

    group.bench_function("deserialize", |b| {
        b.iter(|| black_box(serde_json::from_str::<Cart>(&json).unwrap()));
    });

    group.finish();
}

fn bench_order_amount(c: &mut Criterion) {
    let items: Vec<OrderItem> = (0..50)
        .map(|i| OrderItem {
            product_id: format!("product-{:04}", i),
            name: format!("Product {}", i),
            price: 9.99 + i as f64,
            image: Vec::new(),
            category: "Women".to_string(),
            sub_category: "Topwear".to_string(),
            size: "M".to_string(),
            quantity: (i % 3 + 1) as u32,
        })
        .collect();

    c.bench_function("order/amount_minor_units", |b| {
        b.iter(|| {
            let subtotal: f64 = items.iter().map(OrderItem::line_total).sum();
            black_box(to_minor_units(subtotal + 10.0))
        });
    });
}

criterion_group!(
    benches,
    bench_add_item,
    bench_set_quantity,
    bench_cart_json,
    bench_order_amount,
);
criterion_main!(benches);
