use schemagate_core::db::open_db_in_memory;
use schemagate_core::{
    Company, CompanyGroupId, CompanyId, CompanyInput, CompanyListQuery, CompanyRepository,
    CompanyService, CompanyValidationError, Money, RepoError, ServiceError,
    SqliteCompanyRepository,
};
use rusqlite::Connection;

fn named(name: &str) -> Company {
    let mut company = Company::new(11);
    company.company_name = Some(name.to_string());
    company
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let mut company = named("Acme Trading");
    company.base_rate = Some("1250.1234".parse().unwrap());
    company.tax_rate = Some(0.0825);
    let id = repo.create_company(&company).unwrap();

    let loaded = repo.get_company(id).unwrap().unwrap();
    assert_eq!(loaded.company_id, Some(id));
    assert_eq!(loaded.company_name.as_deref(), Some("Acme Trading"));
    assert_eq!(loaded.base_rate, Some(Money::from_minor_units(12_501_234)));
    assert_eq!(loaded.default_currency_id, Some(1));
    assert_eq!(loaded.enter_user_id, 11);
    assert_eq!(loaded.tax_rate, Some(0.0825));
    assert_eq!(
        loaded.enter_date.timestamp_millis(),
        company.enter_date.timestamp_millis()
    );
}

#[test]
fn generated_ids_increase() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let first = repo.create_company(&named("first")).unwrap();
    let second = repo.create_company(&named("second")).unwrap();
    assert!(second.get() > first.get());
}

#[test]
fn duplicate_company_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let mut company = named("original");
    company.company_id = Some(CompanyId::new(7));
    repo.create_company(&company).unwrap();

    company.company_name = Some("copy".to_string());
    let err = repo.create_company(&company).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(id) if id == CompanyId::new(7)));

    let stored = repo.get_company(CompanyId::new(7)).unwrap().unwrap();
    assert_eq!(stored.company_name.as_deref(), Some("original"));
}

#[test]
fn generated_id_past_smallint_range_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let mut last = named("last slot");
    last.company_id = Some(CompanyId::new(i16::MAX));
    assert_eq!(repo.create_company(&last).unwrap(), CompanyId::new(i16::MAX));

    let err = repo.create_company(&named("one too many")).unwrap_err();
    assert!(matches!(err, RepoError::IdSpaceExhausted), "{err:?}");
    let stored = repo.list_companies(&CompanyListQuery::default()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn create_rejects_long_name_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let err = repo.create_company(&named(&"n".repeat(61))).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(CompanyValidationError::NameTooLong { .. })
    ));
    assert!(repo
        .list_companies(&CompanyListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn update_existing_company() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let mut company = named("draft");
    company.company_id = Some(repo.create_company(&company).unwrap());

    company.company_name = Some("final".to_string());
    company.default_currency_id = Some(2);
    company.company_group_id = Some(CompanyGroupId::new(3));
    repo.update_company(&company).unwrap();

    let loaded = repo
        .get_company(company.company_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.company_name.as_deref(), Some("final"));
    assert_eq!(loaded.default_currency_id, Some(2));
    assert_eq!(loaded.company_group_id, Some(CompanyGroupId::new(3)));
}

#[test]
fn update_requires_persisted_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let err = repo.update_company(&named("unsaved")).unwrap_err();
    assert!(matches!(err, RepoError::MissingId));

    let mut ghost = named("ghost");
    ghost.company_id = Some(CompanyId::new(99));
    let err = repo.update_company(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == CompanyId::new(99)));
}

#[test]
fn delete_removes_row_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let id = repo.create_company(&named("short-lived")).unwrap();
    repo.delete_company(id).unwrap();
    assert!(repo.get_company(id).unwrap().is_none());

    let err = repo.delete_company(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn list_filters_by_group_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    for index in 0..5 {
        let mut company = named(&format!("company-{index}"));
        if index % 2 == 0 {
            company.company_group_id = Some(CompanyGroupId::new(1));
        }
        repo.create_company(&company).unwrap();
    }

    let grouped = repo
        .list_companies(&CompanyListQuery {
            company_group_id: Some(CompanyGroupId::new(1)),
            ..CompanyListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = grouped
        .iter()
        .filter_map(|company| company.company_name.as_deref())
        .collect();
    assert_eq!(names, vec!["company-0", "company-2", "company-4"]);

    let page = repo
        .list_companies(&CompanyListQuery {
            limit: Some(2),
            offset: 1,
            ..CompanyListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = page
        .iter()
        .filter_map(|company| company.company_name.as_deref())
        .collect();
    assert_eq!(names, vec!["company-1", "company-2"]);

    let tail = repo
        .list_companies(&CompanyListQuery {
            offset: 4,
            ..CompanyListQuery::default()
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteCompanyRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(actual_version, 0);
            assert!(expected_version > 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}

#[test]
fn try_new_rejects_missing_join_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "DROP INDEX IX_Company_List_CompanyGroupId;
         ALTER TABLE Company_List DROP COLUMN CompanyGroupId;",
    )
    .unwrap();

    match SqliteCompanyRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredColumn { table, column }) => {
            assert_eq!(table, "Company_List");
            assert_eq!(column, "CompanyGroupId");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("incomplete table must be rejected"),
    }
}

#[test]
fn corrupt_enter_date_is_not_masked_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO Company_List (CompanyId, EnterUserId, EnterDate) VALUES (5, 1, 'garbage');",
        [],
    )
    .unwrap();
    let repo = SqliteCompanyRepository::try_new(&conn).unwrap();

    let err = repo.get_company(CompanyId::new(5)).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_registers_input_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = CompanyService::new(SqliteCompanyRepository::try_new(&conn).unwrap());

    let company = service
        .register(CompanyInput {
            company_name: Some("Registered".to_string()),
            enter_user_id: Some(3),
            enter_date: Some("2024-06-30 17:45:00".to_string()),
            ..CompanyInput::default()
        })
        .unwrap();

    assert!(company.company_id.is_some());
    assert_eq!(company.base_rate, Some(Money::ZERO));
    assert_eq!(company.default_currency_id, Some(1));
    assert_eq!(service.list(&CompanyListQuery::default()).unwrap().len(), 1);
}

#[test]
fn service_reports_all_violations_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = CompanyService::new(SqliteCompanyRepository::try_new(&conn).unwrap());

    let err = service
        .register(CompanyInput {
            company_name: Some("y".repeat(70)),
            ..CompanyInput::default()
        })
        .unwrap_err();

    match err {
        ServiceError::Validation(errors) => assert_eq!(errors.errors().len(), 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list(&CompanyListQuery::default()).unwrap().is_empty());
}

#[test]
fn service_update_and_remove() {
    let conn = open_db_in_memory().unwrap();
    let service = CompanyService::new(SqliteCompanyRepository::try_new(&conn).unwrap());

    let mut company = service
        .register(CompanyInput {
            enter_user_id: Some(1),
            enter_date: Some("2024-01-01".to_string()),
            ..CompanyInput::default()
        })
        .unwrap();
    let id = company.company_id.unwrap();

    company.tax_rate = Some(0.15);
    let updated = service.update(&company).unwrap();
    assert_eq!(updated.tax_rate, Some(0.15));

    service.remove(id).unwrap();
    assert!(service.get(id).unwrap().is_none());
    assert!(matches!(
        service.remove(id),
        Err(ServiceError::Repo(RepoError::NotFound(_)))
    ));
}
