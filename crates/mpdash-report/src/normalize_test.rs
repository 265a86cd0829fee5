use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// Wildberries
// -----------------------------------------------------------------------

fn wb_document(value: &Value) -> RawDocument {
    RawDocument::Wildberries(serde_json::from_value(value.clone()).unwrap())
}

fn ozon_document(value: &Value) -> RawDocument {
    RawDocument::Ozon(serde_json::from_value(value.clone()).unwrap())
}

#[test]
fn wb_order_maps_fields() {
    let data = normalize_document(&wb_document(&json!({
        "raw_orders": [{
            "srid": "abc",
            "warehouseName": " Коледино ",
            "regionName": "Московская",
            "supplierArticle": "SF0125",
            "priceWithDisc": 499.9,
            "date": "2024-06-10T08:00:00"
        }]
    })));
    let record = &data.orders[0];
    assert_eq!(record.order_id, "abc");
    assert_eq!(record.warehouse, "Коледино");
    assert_eq!(record.region_hint, "Московская");
    assert_eq!(record.article, "SF0125");
    assert_eq!(record.unit_price, Decimal::new(4999, 1));
    assert_eq!(record.quantity, 1);
    assert_eq!(record.occurred_at.as_deref(), Some("2024-06-10T08:00:00"));
}

#[test]
fn wb_order_missing_fields_default() {
    let data = normalize_document(&wb_document(&json!({"raw_orders": [{}]})));
    let record = &data.orders[0];
    assert_eq!(record.order_id, "wb-0");
    assert_eq!(record.warehouse, UNKNOWN);
    assert_eq!(record.region_hint, UNKNOWN);
    assert_eq!(record.article, UNKNOWN);
    assert_eq!(record.unit_price, Decimal::ZERO);
    assert!(record.occurred_at.is_none());
}

#[test]
fn wb_order_falls_back_to_g_number_and_date_full() {
    let data = normalize_document(&wb_document(&json!({
        "raw_orders": [{"srid": "", "gNumber": "g-1", "dateFull": "2024-06-01"}]
    })));
    assert_eq!(data.orders[0].order_id, "g-1");
    assert_eq!(data.orders[0].occurred_at.as_deref(), Some("2024-06-01"));
}

#[test]
fn wb_undecodable_row_becomes_default_record() {
    let data = normalize_document(&wb_document(&json!({
        "raw_orders": [{"priceWithDisc": {"nested": true}}, "garbage"]
    })));
    assert_eq!(data.orders.len(), 2);
    assert!(data.orders.iter().all(|r| r.warehouse == UNKNOWN));
    assert_eq!(data.orders[1].order_id, "wb-1");
}

#[test]
fn wb_order_with_bad_price_keeps_its_dimensions() {
    let data = normalize_document(&wb_document(&json!({
        "raw_orders": [{
            "srid": "a",
            "warehouseName": "Коледино",
            "priceWithDisc": "n/a",
            "date": "2024-06-10T09:00:00"
        }]
    })));
    let record = &data.orders[0];
    assert_eq!(record.order_id, "a");
    assert_eq!(record.warehouse, "Коледино");
    assert_eq!(record.unit_price, Decimal::ZERO);
    assert_eq!(record.occurred_at.as_deref(), Some("2024-06-10T09:00:00"));
}

#[test]
fn wb_stocks_and_sales() {
    let data = normalize_document(&wb_document(&json!({
        "raw_stocks": [{"warehouseName": "Тула", "supplierArticle": "SM0250", "quantityFull": 12}],
        "raw_sales": [{"forPay": -150.5, "date": "2024-06-09T12:00:00"}, {"date": "2024-06-09"}]
    })));
    assert_eq!(
        data.stocks,
        vec![StockRecord {
            warehouse: "Тула".to_string(),
            article: "SM0250".to_string(),
            quantity: 12,
        }]
    );
    assert_eq!(data.redemptions[0].amount, Decimal::new(-1505, 1));
    assert_eq!(data.redemptions[1].amount, Decimal::ZERO);
}

// -----------------------------------------------------------------------
// Ozon
// -----------------------------------------------------------------------

fn ozon_posting_json() -> Value {
    json!({
        "posting_number": "0101-1",
        "created_at": "2024-06-10T09:15:00Z",
        "products": [
            {"offer_id": "SF0125", "price": "100.10", "quantity": 2},
            {"offer_id": "SM0500", "price": "50.00"}
        ],
        "analytics_data": {"warehouse_name": "Хоругвино", "city": "Тверь"},
        "financial_data": {"cluster_to": "Москва, МО и Дальние регионы"}
    })
}

#[test]
fn ozon_posting_splits_line_items() {
    let data = normalize_document(&ozon_document(&json!({"raw_orders": [ozon_posting_json()]})));
    assert_eq!(data.orders.len(), 2);
    assert!(data.orders.iter().all(|r| r.order_id == "0101-1"));
    assert!(data.orders.iter().all(|r| r.warehouse == "Хоругвино"));
    assert!(data
        .orders
        .iter()
        .all(|r| r.region_hint == "Москва, МО и Дальние регионы"));
    assert_eq!(data.orders[0].quantity, 2);
    assert_eq!(data.orders[1].quantity, 1, "missing quantity defaults to 1");

    let posting_revenue: Decimal = data.orders.iter().map(NormalizedRecord::revenue).sum();
    assert_eq!(posting_revenue, Decimal::new(25_020, 2));
}

#[test]
fn ozon_line_with_overflowing_revenue_is_zero_priced() {
    let data = normalize_document(&ozon_document(&json!({
        "raw_orders": [{
            "posting_number": "0001-9",
            "created_at": "2024-06-10T07:00:00Z",
            "products": [
                {
                    "offer_id": "SF0250",
                    "price": "10000000000",
                    "quantity": 10_000_000_000_000_000_000_u64
                },
                {"offer_id": "SM0500", "price": "100", "quantity": 2.0}
            ]
        }]
    })));
    assert_eq!(data.orders.len(), 2);
    assert_eq!(data.orders[0].unit_price, Decimal::ZERO);
    assert_eq!(data.orders[0].quantity, 10_000_000_000_000_000_000);
    assert_eq!(data.orders[0].revenue(), Decimal::ZERO);
    assert_eq!(data.orders[1].quantity, 2);
    assert_eq!(data.orders[1].revenue(), Decimal::from(200));
}

#[test]
fn ozon_region_falls_back_to_city() {
    let mut posting = ozon_posting_json();
    posting["financial_data"]["cluster_to"] = json!("");
    let records = normalize_ozon_posting(&serde_json::from_value(posting).unwrap(), 0);
    assert_eq!(records[0].region_hint, "Тверь");
}

#[test]
fn ozon_posting_without_price_counts_quantity() {
    let posting: OzonPosting = serde_json::from_value(json!({
        "posting_number": "p",
        "products": [{"offer_id": "SF0250", "quantity": 3}]
    }))
    .unwrap();
    let records = normalize_ozon_posting(&posting, 0);
    assert_eq!(records[0].quantity, 3);
    assert_eq!(records[0].revenue(), Decimal::ZERO);
}

#[test]
fn ozon_posting_uses_financial_products_when_products_empty() {
    let posting: OzonPosting = serde_json::from_value(json!({
        "financial_data": {"products": [{"price": 10, "quantity": 4}]}
    }))
    .unwrap();
    let records = normalize_ozon_posting(&posting, 7);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].order_id, "ozon-7");
    assert_eq!(records[0].article, UNKNOWN);
    assert_eq!(records[0].revenue(), Decimal::from(40));
}

#[test]
fn ozon_posting_without_any_lines_still_counts() {
    let records = normalize_ozon_posting(&OzonPosting::default(), 3);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].order_id, "ozon-3");
    assert_eq!(records[0].unit_price, Decimal::ZERO);
    assert_eq!(records[0].warehouse, UNKNOWN);
}

#[test]
fn ozon_stocks_prefer_fbo_rows() {
    let data = normalize_document(&ozon_document(&json!({
        "fbo_stocks": [{"warehouse_name": "Казань", "item_code": "SF0125", "free_to_sell_amount": 9}],
        "stocks_warehouse_products": [{"name": "Ignored", "products": {"X": 1}}]
    })));
    assert_eq!(data.stocks.len(), 1);
    assert_eq!(data.stocks[0].warehouse, "Казань");
    assert_eq!(data.stocks[0].quantity, 9);
}

#[test]
fn ozon_stocks_flatten_matrix_when_no_fbo_rows() {
    let data = normalize_document(&ozon_document(&json!({
        "stocks_warehouse_products": [
            {"name": "Хоругвино", "products": {"SM0250": 4, "SF0125": 3}}
        ]
    })));
    assert_eq!(data.stocks.len(), 2);
    assert_eq!(data.stocks[0].article, "SF0125");
    assert_eq!(data.stocks[1].quantity, 4);
}

#[test]
fn ozon_finance_operations_take_absolute_amount_and_skip_other_types() {
    let data = normalize_document(&ozon_document(&json!({
        "finance_redemptions": [
            {"operation_type": OZON_DELIVERED_OPERATION, "operation_date": "2024-06-10 11:00:00", "amount": -320.5},
            {"operation_type": "OperationMarketplaceServiceStorage", "amount": -10},
            {"operation_date": "2024-06-09 08:00:00", "amount": 99}
        ]
    })));
    assert_eq!(data.redemptions.len(), 2);
    assert_eq!(data.redemptions[0].amount, Decimal::new(3205, 1));
    assert_eq!(
        data.redemptions[0].occurred_at.as_deref(),
        Some("2024-06-10 11:00:00")
    );
    assert_eq!(data.redemptions[1].amount, Decimal::from(99));
}
