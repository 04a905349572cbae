mod helpers;

use chrono::Utc;
use helpers::{InventoryItemBuilder, PropertyBuilder, TestDb, WarrantyBuilder};
use lodgebook::storage::{self, NewDamageReport, NewInspectionRecord, NewInspectionTemplate};
use lodgebook::warranty::{assemble, classify_stored, present, ExpirationStatus, StatusFilter};
use std::collections::HashMap;

#[tokio::test]
async fn test_warranty_hierarchy_with_active_filter() {
    let db = TestDb::new().await;
    let property = PropertyBuilder::new("Beach House").create(db.connection()).await;

    let w1 = WarrantyBuilder::new("Dishwasher")
        .for_property(&property.id)
        .expiring_in_days(10)
        .create(db.connection())
        .await;
    let w2 = WarrantyBuilder::new("Dishwasher pump")
        .for_property(&property.id)
        .with_parent(&w1.id)
        .expiring_in_days(5)
        .create(db.connection())
        .await;

    let today = Utc::now().date_naive();
    let all = storage::list_warranties(db.connection(), None)
        .await
        .expect("Failed to list warranties");
    let names = storage::property_names(db.connection())
        .await
        .expect("Failed to load property names");

    let nodes = present(assemble(all), StatusFilter::Active, None, &names, today);

    // One root with the sub-warranty nested under it; the two-way active
    // filter keeps both even though they classify as expiring-soon.
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].warranty.id, w1.id);
    assert_eq!(nodes[0].sub_warranties.len(), 1);
    assert_eq!(nodes[0].sub_warranties[0].id, w2.id);

    assert_eq!(
        classify_stored(nodes[0].warranty.expiration_date.as_deref(), today),
        Some(ExpirationStatus::ExpiringSoon)
    );
    assert_eq!(
        classify_stored(nodes[0].sub_warranties[0].expiration_date.as_deref(), today),
        Some(ExpirationStatus::ExpiringSoon)
    );
}

#[tokio::test]
async fn test_warranty_expiration_stored_and_recomputed() {
    let db = TestDb::new().await;

    let warranty = WarrantyBuilder::new("Fridge")
        .purchased_on("2023-06-15")
        .with_duration("2_years")
        .create(db.connection())
        .await;

    // 730 flat days from 2023-06-15; the 2024 leap day lands inside the
    // span, so the result is one day short of the calendar anniversary.
    assert_eq!(warranty.expiration_date.as_deref(), Some("2025-06-14"));

    let mut input = lodgebook::storage::NewWarranty {
        product_name: warranty.product_name.clone(),
        purchase_date: warranty.purchase_date.clone(),
        duration: "90_days".to_string(),
        ..Default::default()
    };
    input.property_id = warranty.property_id.clone();

    let updated = storage::update_warranty(db.connection(), &warranty.id, input)
        .await
        .expect("Failed to update warranty");
    assert_eq!(updated.expiration_date.as_deref(), Some("2023-09-13"));
}

#[tokio::test]
async fn test_deleting_parent_warranty_cascades() {
    let db = TestDb::new().await;

    let parent = WarrantyBuilder::new("HVAC system")
        .purchased_on("2024-01-01")
        .create(db.connection())
        .await;
    let child = WarrantyBuilder::new("Compressor")
        .with_parent(&parent.id)
        .purchased_on("2024-01-01")
        .create(db.connection())
        .await;

    storage::delete_warranty(db.connection(), &parent.id)
        .await
        .expect("Failed to delete warranty");

    assert!(storage::get_warranty(db.connection(), &parent.id)
        .await
        .expect("Lookup failed")
        .is_none());
    assert!(storage::get_warranty(db.connection(), &child.id)
        .await
        .expect("Lookup failed")
        .is_none());
}

#[tokio::test]
async fn test_master_item_copy_is_independent() {
    let db = TestDb::new().await;
    let property = PropertyBuilder::new("Cabin").create(db.connection()).await;

    let master = InventoryItemBuilder::new("Towels")
        .with_quantities(12, 4, 8)
        .with_supplier("Linen Co")
        .create(db.connection())
        .await;
    assert!(master.is_master());

    let copy = storage::copy_master_item(db.connection(), &master.id, &property.id)
        .await
        .expect("Failed to copy master item");

    assert_ne!(copy.id, master.id);
    assert_eq!(copy.property_id.as_deref(), Some(property.id.as_str()));
    assert_eq!(copy.name, master.name);
    assert_eq!(copy.restock_threshold, master.restock_threshold);

    // Mutating the copy leaves the master untouched
    storage::adjust_inventory_quantity(db.connection(), &copy.id, -10, "used", None)
        .await
        .expect("Failed to adjust copy");
    let master_after = storage::get_inventory_item(db.connection(), &master.id)
        .await
        .expect("Lookup failed")
        .expect("Master missing");
    assert_eq!(master_after.current_quantity, 12);

    // Copying an already-assigned item is rejected
    let result = storage::copy_master_item(db.connection(), &copy.id, &property.id).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_adjust_quantity_appends_change_log() {
    let db = TestDb::new().await;

    let item = InventoryItemBuilder::new("Coffee pods")
        .with_quantities(10, 5, 20)
        .create(db.connection())
        .await;

    let after_use = storage::adjust_inventory_quantity(
        db.connection(),
        &item.id,
        -4,
        "guest stay",
        Some("cleaner"),
    )
    .await
    .expect("Failed to adjust");
    assert_eq!(after_use.current_quantity, 6);

    // Quantity never goes below zero
    let drained =
        storage::adjust_inventory_quantity(db.connection(), &item.id, -100, "audit", None)
            .await
            .expect("Failed to adjust");
    assert_eq!(drained.current_quantity, 0);

    let changes = storage::list_inventory_changes(db.connection(), &item.id)
        .await
        .expect("Failed to list changes");
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().any(|c| c.delta == -4 && c.quantity_after == 6));
    assert!(changes.iter().any(|c| c.delta == -100 && c.quantity_after == 0));
}

#[tokio::test]
async fn test_backfill_assigns_only_orphaned_rows() {
    let db = TestDb::new().await;
    let property = PropertyBuilder::new("Loft").create(db.connection()).await;
    let other = PropertyBuilder::new("Villa").create(db.connection()).await;

    // Orphaned rows across the three tables
    let orphan_item = InventoryItemBuilder::new("Soap").create(db.connection()).await;
    let orphan_report = storage::create_damage_report(
        db.connection(),
        NewDamageReport {
            property_id: None,
            title: "Broken lamp".to_string(),
            description: None,
            severity: "minor".to_string(),
            status: "open".to_string(),
            responsible_party: "unknown".to_string(),
            guest_name: None,
            booking_reference: None,
            photo_urls: vec![],
            estimated_cost: None,
            notes: None,
        },
    )
    .await
    .expect("Failed to create damage report");
    let template = storage::create_inspection_template(
        db.connection(),
        NewInspectionTemplate {
            property_id: None,
            name: "Checkout".to_string(),
            items: vec![],
        },
    )
    .await
    .expect("Failed to create template");
    let orphan_record = storage::create_inspection_record(
        db.connection(),
        NewInspectionRecord {
            template_id: template.id.clone(),
            property_id: None,
            inspector: None,
            completed_on: "2025-05-01".to_string(),
            notes: None,
        },
    )
    .await
    .expect("Failed to create record");

    // Already-assigned row stays with its property
    let assigned_item = InventoryItemBuilder::new("Shampoo")
        .for_property(&other.id)
        .create(db.connection())
        .await;

    let touched = storage::backfill_unassigned(db.connection(), &property.id)
        .await
        .expect("Backfill failed");
    assert_eq!(touched, 3);

    let item = storage::get_inventory_item(db.connection(), &orphan_item.id)
        .await
        .expect("Lookup failed")
        .expect("Item missing");
    assert_eq!(item.property_id.as_deref(), Some(property.id.as_str()));

    let report = storage::get_damage_report(db.connection(), &orphan_report.id)
        .await
        .expect("Lookup failed")
        .expect("Report missing");
    assert_eq!(report.property_id.as_deref(), Some(property.id.as_str()));

    let records = storage::list_inspection_records(db.connection(), Some(&property.id))
        .await
        .expect("Failed to list records");
    assert!(records.iter().any(|r| r.id == orphan_record.id));

    let untouched = storage::get_inventory_item(db.connection(), &assigned_item.id)
        .await
        .expect("Lookup failed")
        .expect("Item missing");
    assert_eq!(untouched.property_id.as_deref(), Some(other.id.as_str()));

    // Second run finds nothing left to assign
    let again = storage::backfill_unassigned(db.connection(), &property.id)
        .await
        .expect("Backfill failed");
    assert_eq!(again, 0);
}

#[tokio::test]
async fn test_invitation_accept_is_one_shot() {
    let db = TestDb::new().await;

    let invitation =
        storage::create_invitation(db.connection(), "new.manager@example.com", "manager", None)
            .await
            .expect("Failed to create invitation");
    assert_eq!(invitation.status, "pending");
    assert!(!invitation.token.is_empty());

    let accepted = storage::accept_invitation(db.connection(), &invitation.token)
        .await
        .expect("Accept failed")
        .expect("Expected acceptance");
    assert_eq!(accepted.status, "accepted");

    // Token is single-use
    assert!(storage::accept_invitation(db.connection(), &invitation.token)
        .await
        .expect("Accept failed")
        .is_none());

    // A revoked invitation can no longer be accepted
    let second =
        storage::create_invitation(db.connection(), "new.staff@example.com", "staff", None)
            .await
            .expect("Failed to create invitation");
    storage::revoke_invitation(db.connection(), &second.id)
        .await
        .expect("Revoke failed");
    assert!(storage::accept_invitation(db.connection(), &second.token)
        .await
        .expect("Accept failed")
        .is_none());
}

#[tokio::test]
async fn test_digest_covers_only_expiring_soon() {
    let db = TestDb::new().await;
    let property = PropertyBuilder::new("Chalet").create(db.connection()).await;

    WarrantyBuilder::new("Water heater")
        .for_property(&property.id)
        .expiring_in_days(7)
        .create(db.connection())
        .await;
    WarrantyBuilder::new("Roof")
        .for_property(&property.id)
        .expiring_in_days(400)
        .create(db.connection())
        .await;
    WarrantyBuilder::new("Old stove")
        .for_property(&property.id)
        .purchased_on("2020-01-01")
        .with_duration("90_days")
        .create(db.connection())
        .await;

    let entries = lodgebook::jobs::collect_digest_entries(db.connection())
        .await
        .expect("Failed to collect digest entries");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product_name, "Water heater");
    assert_eq!(entries[0].property_name.as_deref(), Some("Chalet"));
}

#[tokio::test]
async fn test_search_matches_property_name() {
    let db = TestDb::new().await;
    let property = PropertyBuilder::new("Seaside Flat").create(db.connection()).await;

    WarrantyBuilder::new("Oven")
        .for_property(&property.id)
        .with_vendor("Acme Appliances")
        .purchased_on("2025-01-01")
        .create(db.connection())
        .await;
    WarrantyBuilder::new("Sofa")
        .purchased_on("2025-01-01")
        .create(db.connection())
        .await;

    let today = Utc::now().date_naive();
    let all = storage::list_warranties(db.connection(), None)
        .await
        .expect("Failed to list warranties");
    let names: HashMap<String, String> = storage::property_names(db.connection())
        .await
        .expect("Failed to load property names");

    let by_property = present(
        assemble(all.clone()),
        StatusFilter::All,
        Some("seaside"),
        &names,
        today,
    );
    assert_eq!(by_property.len(), 1);
    assert_eq!(by_property[0].warranty.product_name, "Oven");

    let by_vendor = present(
        assemble(all),
        StatusFilter::All,
        Some("acme"),
        &names,
        today,
    );
    assert_eq!(by_vendor.len(), 1);
}
