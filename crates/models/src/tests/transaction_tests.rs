use crate::db::connect_in_memory;
use crate::{category, menu_item};
use anyhow::Result;
use sea_orm::TransactionTrait;

/// Deleting categories removes their items through the FK cascade
#[tokio::test]
async fn test_category_delete_cascades_to_items() -> Result<()> {
    let db = connect_in_memory().await?;
    let a = category::create(&db, 42, "A").await?;
    let b = category::create(&db, 42, "B").await?;
    let keep = category::create(&db, 5, "Keep").await?;
    menu_item::create(&db, a.id, "a1", 100).await?;
    menu_item::create(&db, b.id, "b1", 200).await?;
    menu_item::create(&db, keep.id, "k1", 300).await?;

    let removed = category::delete_many(&db, &[a.id, b.id]).await?;
    assert_eq!(removed, 2);

    assert_eq!(menu_item::count_for_categories(&db, &[a.id, b.id]).await?, 0);
    assert_eq!(menu_item::count_for_categories(&db, &[keep.id]).await?, 1);
    assert_eq!(category::find_by_bus(&db, 5).await?.len(), 1);
    Ok(())
}

/// Test transaction rollback
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = connect_in_memory().await?;
    let cat = category::create(&db, 3, "Rolled back").await?;

    let txn = db.begin().await?;
    category::delete_many(&txn, &[cat.id]).await?;
    txn.rollback().await?;

    assert!(category::find(&db, cat.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_delete_many_counts_only_existing_rows() -> Result<()> {
    let db = connect_in_memory().await?;
    let cat = category::create(&db, 3, "Gone").await?;
    assert_eq!(category::delete_many(&db, &[cat.id, cat.id + 100]).await?, 1);
    assert!(category::find(&db, cat.id).await?.is_none());
    assert_eq!(category::delete_many(&db, &[cat.id]).await?, 0);
    assert_eq!(category::delete_many(&db, &[]).await?, 0);
    Ok(())
}
