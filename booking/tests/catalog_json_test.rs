//! Loading catalogs from JSON.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use serde_json::json;
use tablewise_booking::seed::{ids, reference_catalog};
use tablewise_booking::types::{AddonKind, SessionId};
use tablewise_booking::{AddonContext, AddonId, Catalog, CatalogError, ChargeBasis, Money, UsagePolicy};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn small_catalog() -> serde_json::Value {
    json!({
        "restaurants": [
            { "id": "harbour", "name": "Harbour House", "is_sister": false }
        ],
        "sessions": [
            {
                "id": "supper",
                "name": "Supper",
                "menu_policy": 2,
                "times": ["6:00 PM", "6:30 PM"]
            }
        ],
        "addons": [
            {
                "id": 10,
                "name": "Tasting Menu",
                "price": 9000,
                "basis": "Guest",
                "kind": "Menu",
                "min_party": 1,
                "max_party": 10,
                "session_ids": ["supper"]
            },
            {
                "id": 11,
                "name": "Matched Wines",
                "price": 5500,
                "basis": "Guest",
                "kind": "Option",
                "min_party": 1,
                "max_party": 10,
                "parent": 10,
                "session_ids": ["supper"]
            }
        ],
        "experiences": [
            {
                "id": "oyster-night",
                "restaurant_id": "harbour",
                "date": "2025-01-10",
                "session_id": "supper",
                "name": "Oyster Night",
                "price_per_person": 4000,
                "available_times": ["7:00 PM"],
                "menu_policy": 0
            }
        ]
    })
}

#[test]
fn reference_catalog_survives_a_json_round_trip() {
    let catalog = reference_catalog(today()).unwrap();
    let json = catalog.to_json_pretty().unwrap();
    let reloaded = Catalog::from_json_str(&json).unwrap();

    assert_eq!(reloaded.data(), catalog.data());
    assert_eq!(
        reloaded.addon(ids::WINE_PAIRING).and_then(|addon| addon.parent),
        Some(ids::SET_MENU_4)
    );
}

#[test]
fn policies_are_stored_as_codes() {
    let catalog = reference_catalog(today()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&catalog.to_json_pretty().unwrap()).unwrap();
    let policies: Vec<_> = value["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|session| session["menu_policy"].as_u64().unwrap())
        .collect();
    assert_eq!(policies, [3, 3, 1]);
}

#[test]
fn hand_written_catalog_loads() {
    let catalog = Catalog::from_json_str(&small_catalog().to_string()).unwrap();

    let menu = catalog.addon(AddonId::new(10)).unwrap();
    assert_eq!(menu.kind, AddonKind::Menu);
    assert_eq!(menu.basis, ChargeBasis::Guest);
    assert_eq!(menu.price, Money::from_dollars(90));
    assert_eq!(catalog.session_policy(&SessionId::new("supper")), Some(UsagePolicy::PerGuest));

    let experience = catalog.experiences().first().unwrap();
    assert_eq!(experience.menu_policy, UsagePolicy::NoMenu);
    assert!(catalog.sister_of(&experience.restaurant_id).is_none());

    let offered = tablewise_booking::eligibility::resolve_offerable(
        &catalog,
        Some(&AddonContext::Session(SessionId::new("supper"))),
        2,
    );
    assert_eq!(offered.menus.len(), 1);
    assert_eq!(offered.options.len(), 1);
}

#[test]
fn unknown_policy_code_is_a_parse_error() {
    let mut document = small_catalog();
    document["sessions"][0]["menu_policy"] = json!(7);
    let error = Catalog::from_json_str(&document.to_string()).unwrap_err();
    assert!(matches!(error, CatalogError::Parse(_)), "{error}");
}

#[test]
fn dangling_experience_session_is_rejected() {
    let mut document = small_catalog();
    document["experiences"][0]["session_id"] = json!("brunch");
    let error = Catalog::from_json_str(&document.to_string()).unwrap_err();
    assert!(matches!(error, CatalogError::UnknownSession { .. }), "{error}");
}

#[test]
fn option_parent_must_exist() {
    let mut document = small_catalog();
    document["addons"][1]["parent"] = json!(99);
    let error = Catalog::from_json_str(&document.to_string()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Addon 11 depends on unknown addon 99"
    );
}

#[test]
fn catalog_file_is_read_from_disk() {
    let path = std::env::temp_dir().join(format!("tablewise-catalog-{}.json", std::process::id()));
    std::fs::write(&path, small_catalog().to_string()).unwrap();

    let loaded = Catalog::from_path(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.unwrap().addons().len(), 2);

    let missing = Catalog::from_path(&path).unwrap_err();
    assert!(matches!(missing, CatalogError::Io(_)));
}
