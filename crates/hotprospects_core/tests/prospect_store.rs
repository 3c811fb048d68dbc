use hotprospects_core::db::open_db_in_memory;
use hotprospects_core::{
    ProspectFilter, ProspectService, ProspectSort, ProspectUpdate, SqliteProspectRepository,
};
use uuid::Uuid;

fn names(prospects: &[hotprospects_core::Prospect]) -> Vec<&str> {
    prospects.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn add_starts_uncontacted_and_appears_in_everyone() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));

    let added = service.add_prospect("Ada", "ada@example.com").unwrap();
    assert!(!added.is_contacted);

    let everyone = service
        .list_prospects(ProspectFilter::All, ProspectSort::Name)
        .unwrap();
    assert_eq!(everyone, vec![added.clone()]);

    let contacted = service
        .list_prospects(ProspectFilter::Contacted, ProspectSort::Name)
        .unwrap();
    assert!(contacted.is_empty());
}

#[test]
fn name_sort_is_stable_for_duplicates_and_insertion_sort_keeps_add_order() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));

    let first_bob = service.add_prospect("Bob", "bob1@example.com").unwrap();
    service.add_prospect("Alice", "alice@example.com").unwrap();
    let second_bob = service.add_prospect("Bob", "bob2@example.com").unwrap();

    let by_name = service
        .list_prospects(ProspectFilter::All, ProspectSort::Name)
        .unwrap();
    assert_eq!(names(&by_name), vec!["Alice", "Bob", "Bob"]);
    assert_eq!(by_name[1].id, first_bob.id);
    assert_eq!(by_name[2].id, second_bob.id);

    let by_insertion = service
        .list_prospects(ProspectFilter::All, ProspectSort::InsertionOrder)
        .unwrap();
    assert_eq!(names(&by_insertion), vec!["Bob", "Alice", "Bob"]);
}

#[test]
fn filters_partition_everyone() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));

    let a = service.add_prospect("A", "a@example.com").unwrap();
    service.add_prospect("B", "b@example.com").unwrap();
    let c = service.add_prospect("C", "c@example.com").unwrap();
    service.set_contacted(a.id, true).unwrap();
    service.set_contacted(c.id, true).unwrap();

    let all = service
        .list_prospects(ProspectFilter::All, ProspectSort::Name)
        .unwrap();
    let contacted = service
        .list_prospects(ProspectFilter::Contacted, ProspectSort::Name)
        .unwrap();
    let uncontacted = service
        .list_prospects(ProspectFilter::Uncontacted, ProspectSort::Name)
        .unwrap();

    assert_eq!(names(&contacted), vec!["A", "C"]);
    assert_eq!(names(&uncontacted), vec!["B"]);
    assert_eq!(contacted.len() + uncontacted.len(), all.len());
    assert!(contacted.iter().all(|p| ProspectFilter::Contacted.matches(p)));
}

#[test]
fn toggle_twice_restores_original_state() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    let prospect = service.add_prospect("Ada", "ada@example.com").unwrap();

    assert_eq!(service.toggle_contacted(prospect.id).unwrap(), Some(true));
    assert_eq!(service.toggle_contacted(prospect.id).unwrap(), Some(false));

    let stored = service.get_prospect(prospect.id).unwrap().unwrap();
    assert_eq!(stored, prospect);
}

#[test]
fn delete_removes_from_every_view() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    let prospect = service.add_prospect("Ada", "ada@example.com").unwrap();
    service.set_contacted(prospect.id, true).unwrap();

    assert!(service.delete_prospect(prospect.id).unwrap());

    for filter in [
        ProspectFilter::All,
        ProspectFilter::Contacted,
        ProspectFilter::Uncontacted,
    ] {
        let listed = service.list_prospects(filter, ProspectSort::Name).unwrap();
        assert!(listed.is_empty(), "{} still lists prospect", filter.as_str());
    }
}

#[test]
fn bulk_delete_skips_unknown_ids_and_keeps_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    let a = service.add_prospect("A", "a@example.com").unwrap();
    let b = service.add_prospect("B", "b@example.com").unwrap();
    service.add_prospect("C", "c@example.com").unwrap();

    let removed = service
        .delete_prospects(&[a.id, Uuid::new_v4(), b.id])
        .unwrap();
    assert_eq!(removed, 2);

    let remaining = service
        .list_prospects(ProspectFilter::All, ProspectSort::Name)
        .unwrap();
    assert_eq!(names(&remaining), vec!["C"]);
    assert_eq!(service.delete_prospects(&[]).unwrap(), 0);
}

#[test]
fn edit_keeps_id_and_contacted_flag() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    let prospect = service.add_prospect("Ada", "ada@example.com").unwrap();
    service.set_contacted(prospect.id, true).unwrap();

    let update = ProspectUpdate {
        name: Some("Ada Lovelace".to_string()),
        ..ProspectUpdate::default()
    };
    let saved = service.update_prospect(prospect.id, &update).unwrap().unwrap();

    assert_eq!(saved.id, prospect.id);
    assert_eq!(saved.name, "Ada Lovelace");
    assert_eq!(saved.email_address, "ada@example.com");
    assert!(saved.is_contacted);
    assert_eq!(service.get_prospect(prospect.id).unwrap(), Some(saved));
}

#[test]
fn unknown_ids_are_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    service.add_prospect("Ada", "ada@example.com").unwrap();
    let missing = Uuid::new_v4();

    let update = ProspectUpdate {
        name: Some("Ghost".to_string()),
        ..ProspectUpdate::default()
    };
    assert_eq!(service.update_prospect(missing, &update).unwrap(), None);
    assert_eq!(service.toggle_contacted(missing).unwrap(), None);
    assert!(!service.set_contacted(missing, true).unwrap());
    assert!(!service.delete_prospect(missing).unwrap());

    let all = service
        .list_prospects(ProspectFilter::All, ProspectSort::Name)
        .unwrap();
    assert_eq!(names(&all), vec!["Ada"]);
}

#[test]
fn prospects_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotprospects.sqlite3");

    let id = {
        let conn = hotprospects_core::db::open_db(&path).unwrap();
        let service = ProspectService::new(SqliteProspectRepository::new(&conn));
        let prospect = service.add_prospect("Ada", "ada@example.com").unwrap();
        service.toggle_contacted(prospect.id).unwrap();
        prospect.id
    };

    let conn = hotprospects_core::db::open_db(&path).unwrap();
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    let stored = service.get_prospect(id).unwrap().unwrap();
    assert!(stored.is_contacted);
}
