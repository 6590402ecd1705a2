use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_new_ids_are_time_ordered_v7() {
    let first = JournalEntryId::new();
    let second = JournalEntryId::new();
    assert_eq!(first.into_inner().get_version_num(), 7);
    assert!(first.into_inner() <= second.into_inner());
}

#[test]
fn test_uuid_conversions_round_trip_through_from() {
    let uuid = Uuid::new_v4();
    let koperasi = KoperasiId::from(uuid);
    assert_eq!(Uuid::from(koperasi), uuid);
    assert_eq!(KoperasiId::from_uuid(uuid), koperasi);
}

#[test]
fn test_display_matches_inner_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(AccountId::from_uuid(uuid).to_string(), uuid.to_string());
}

#[test]
fn test_from_str_parses_path_segments() {
    let uuid = Uuid::new_v4();
    let id = TenantId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(UserId::from_str("bukan-uuid").is_err());
}

#[test]
fn test_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&AccountId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
