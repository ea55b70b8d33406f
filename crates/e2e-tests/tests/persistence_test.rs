//! Data, ids and indices survive closing the database.

use pretty_assertions::assert_eq;

use e2e_tests::{sample_recipes, Recipe, TestHarness};
use indigo::{EntitiesInfo, INFO_ID};
use indigo_storage::TypedStoreReads;

#[test]
fn test_reopen_keeps_records_and_indices() {
    let harness = TestHarness::new();
    {
        let recipes = harness.recipes();
        recipes.put(&mut sample_recipes()).unwrap();
        recipes.delete(5).unwrap();
    }

    let harness = harness.reopen();
    let recipes = harness.recipes();

    assert_eq!(recipes.list().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(
        recipes.get(4).unwrap().map(|r| r.title),
        Some("Onion Tart".to_string())
    );
    assert_eq!(recipes.search("ingredients", "basil").unwrap().len(), 1);

    let info: Option<EntitiesInfo> = harness.store.get_as("recipes", INFO_ID).unwrap();
    assert_eq!(info.map(|i| i.max_id()), Some(5));
    assert_eq!(
        recipes
            .put_one(&mut Recipe::new("Pea Soup", &["peas", "mint"]))
            .unwrap(),
        6
    );
}
