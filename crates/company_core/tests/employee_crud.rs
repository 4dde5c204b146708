use company_core::{
    DepartmentRepository, EmployeeChanges, EmployeeFilter, EmployeeRepository, EmployeeRows,
    NewDepartment, NewEmployee, Populate, RecordId, RepoError, Store,
};

const FINANCE_ID: &str = "62dd9723a3569272a44c2812";
const MARK_DEPARTMENT_ID: &str = "62dd9734a3569272a44c2813";
const JULY_DEPARTMENT_ID: &str = "62dd973ea3569272a44c2814";

fn id(value: &str) -> RecordId {
    RecordId::parse(value).unwrap()
}

fn seed_employees(store: &Store) {
    let repo = store.employees().unwrap();
    let cases = [
        ("John", "Doe", FINANCE_ID),
        ("Mark", "Bernt", MARK_DEPARTMENT_ID),
        ("July", "May", JULY_DEPARTMENT_ID),
    ];
    for (first_name, last_name, department_id) in cases {
        repo.create(&NewEmployee::new(first_name, last_name, id(department_id)))
            .unwrap();
    }
}

#[test]
fn find_all_returns_every_employee_in_insertion_order() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let employees = repo.find_all(&EmployeeFilter::all()).unwrap();
    assert_eq!(employees.len(), 3);
    let first_names: Vec<_> = employees.iter().map(|e| e.first_name.as_str()).collect();
    assert_eq!(first_names, vec!["John", "Mark", "July"]);
}

#[test]
fn populated_find_resolves_existing_departments_and_tolerates_dangling_ones() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    store
        .departments()
        .unwrap()
        .create(&NewDepartment::with_id(id(FINANCE_ID), "Finance"))
        .unwrap();
    let repo = store.employees().unwrap();

    let employees = repo.find_all_populated(&EmployeeFilter::all()).unwrap();
    assert_eq!(employees.len(), 3);

    let department = employees[0].department.as_ref().unwrap();
    assert_eq!(department.id, employees[0].department_id);
    assert_eq!(department.id.as_str(), FINANCE_ID);
    assert_eq!(department.name, "Finance");

    assert!(employees[1].department.is_none());
    assert_eq!(employees[1].department_id.as_str(), MARK_DEPARTMENT_ID);
    assert!(employees[2].department.is_none());
}

#[test]
fn find_dispatches_on_populate_mode() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let raw = repo.find(&EmployeeFilter::all(), Populate::None).unwrap();
    assert!(matches!(&raw, EmployeeRows::Raw(rows) if rows.len() == 3));

    let populated = repo
        .find(&EmployeeFilter::all(), Populate::Department)
        .unwrap();
    assert!(matches!(&populated, EmployeeRows::Populated(rows) if rows.len() == 3));
    assert_eq!(populated.len(), 3);
}

#[test]
fn find_one_matches_all_given_fields() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let employee = repo
        .find_one(
            &EmployeeFilter::all()
                .first_name("Mark")
                .last_name("Bernt")
                .department_id(id(MARK_DEPARTMENT_ID)),
        )
        .unwrap();
    assert!(employee.is_some());

    let mismatched = repo
        .find_one(
            &EmployeeFilter::all()
                .first_name("Mark")
                .department_id(id(FINANCE_ID)),
        )
        .unwrap();
    assert!(mismatched.is_none());
}

#[test]
fn find_one_populated_returns_first_match() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    store
        .departments()
        .unwrap()
        .create(&NewDepartment::with_id(id(FINANCE_ID), "Finance"))
        .unwrap();
    let repo = store.employees().unwrap();

    let john = repo
        .find_one_populated(&EmployeeFilter::all().department_id(id(FINANCE_ID)))
        .unwrap()
        .unwrap();
    assert_eq!(john.first_name, "John");
    assert_eq!(john.department.unwrap().name, "Finance");
}

#[test]
fn create_persists_and_returns_generated_id() {
    let store = Store::open_in_memory().unwrap();
    let repo = store.employees().unwrap();

    let created = repo
        .create(&NewEmployee::new("John", "Doe", id(MARK_DEPARTMENT_ID)))
        .unwrap();

    let loaded = repo
        .find_one(&EmployeeFilter::by_id(created.id.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn invalid_employee_is_never_persisted() {
    let store = Store::open_in_memory().unwrap();
    let repo = store.employees().unwrap();

    let err = repo
        .create(&NewEmployee::new("", "Doe", id(FINANCE_ID)))
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => assert!(errors.get("firstName").is_some()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 0);
}

#[test]
fn update_one_changes_only_the_first_match() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let matched = repo
        .update_one(
            &EmployeeFilter::all().first_name("July"),
            &EmployeeChanges::new().first_name("=July="),
        )
        .unwrap();
    assert!(matched);

    let updated = repo
        .find_one(&EmployeeFilter::all().first_name("=July="))
        .unwrap();
    assert!(updated.is_some());
    assert!(repo
        .find_one(&EmployeeFilter::all().first_name("July"))
        .unwrap()
        .is_none());

    let updated_all = repo
        .update_one(
            &EmployeeFilter::all(),
            &EmployeeChanges::new().last_name("First"),
        )
        .unwrap();
    assert!(updated_all);
    assert_eq!(
        repo.count(&EmployeeFilter::all().last_name("First")).unwrap(),
        1
    );
    assert_eq!(
        repo.find_one(&EmployeeFilter::all().last_name("First"))
            .unwrap()
            .unwrap()
            .first_name,
        "John"
    );
}

#[test]
fn update_one_without_match_is_a_no_op() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let matched = repo
        .update_one(
            &EmployeeFilter::all().first_name("Nobody"),
            &EmployeeChanges::new().first_name("Somebody"),
        )
        .unwrap();
    assert!(!matched);
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 3);
}

#[test]
fn update_rejects_blank_values_without_writing() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let err = repo
        .update_many(&EmployeeFilter::all(), &EmployeeChanges::new().last_name(""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count(&EmployeeFilter::all().last_name("")).unwrap(), 0);
}

#[test]
fn empty_change_set_reports_matches_without_writing() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    assert_eq!(
        repo.update_many(&EmployeeFilter::all(), &EmployeeChanges::new())
            .unwrap(),
        3
    );
    assert!(repo
        .update_one(&EmployeeFilter::all(), &EmployeeChanges::new())
        .unwrap());
}

#[test]
fn save_persists_mutation_of_fetched_record() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let mut employee = repo
        .find_one(&EmployeeFilter::all().first_name("July"))
        .unwrap()
        .unwrap();
    employee.first_name = "=July=".to_string();
    assert!(repo.save(&employee).unwrap());

    let updated = repo
        .find_one(&EmployeeFilter::all().first_name("=July="))
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, employee.id);
}

#[test]
fn save_rejects_invalid_record_and_keeps_stored_row() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let mut employee = repo
        .find_one(&EmployeeFilter::all().first_name("Mark"))
        .unwrap()
        .unwrap();
    employee.last_name = String::new();

    let err = repo.save(&employee).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    let stored = repo
        .find_one(&EmployeeFilter::by_id(employee.id.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_name, "Bernt");
}

#[test]
fn save_of_removed_record_matches_nothing() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let employee = repo
        .find_one(&EmployeeFilter::all().first_name("John"))
        .unwrap()
        .unwrap();
    assert!(repo.remove(&employee).unwrap());
    assert!(!repo.save(&employee).unwrap());
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 2);
}

#[test]
fn update_many_changes_every_match() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let updated = repo
        .update_many(
            &EmployeeFilter::all(),
            &EmployeeChanges::new().last_name("Updated!"),
        )
        .unwrap();
    assert_eq!(updated, 3);

    let employees = repo
        .find_all(&EmployeeFilter::all().last_name("Updated!"))
        .unwrap();
    assert_eq!(employees.len(), 3);
}

#[test]
fn delete_one_removes_exactly_the_first_match() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    assert!(repo
        .delete_one(&EmployeeFilter::all().first_name("Mark"))
        .unwrap());
    assert!(repo
        .find_one(&EmployeeFilter::all().first_name("Mark"))
        .unwrap()
        .is_none());
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 2);

    assert!(repo.delete_one(&EmployeeFilter::all()).unwrap());
    let remaining = repo.find_all(&EmployeeFilter::all()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].first_name, "July");

    assert_eq!(repo.delete_many(&EmployeeFilter::all()).unwrap(), 1);
    assert!(repo.find_all(&EmployeeFilter::all()).unwrap().is_empty());
}

#[test]
fn delete_one_without_match_is_a_no_op() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    assert!(!repo
        .delete_one(&EmployeeFilter::all().first_name("Nobody"))
        .unwrap());
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 3);
}

#[test]
fn remove_deletes_the_fetched_record() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let employee = repo
        .find_one(&EmployeeFilter::all().last_name("May"))
        .unwrap()
        .unwrap();
    assert!(repo.remove(&employee).unwrap());

    assert!(repo
        .find_one(&EmployeeFilter::all().last_name("May"))
        .unwrap()
        .is_none());
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 2);
}

#[test]
fn delete_many_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    assert_eq!(
        repo.delete_many(&EmployeeFilter::all().first_name("Nobody"))
            .unwrap(),
        0
    );
    assert_eq!(repo.delete_many(&EmployeeFilter::all()).unwrap(), 3);
    assert_eq!(repo.delete_many(&EmployeeFilter::all()).unwrap(), 0);
    assert!(repo.find_all(&EmployeeFilter::all()).unwrap().is_empty());
}

#[test]
fn delete_many_with_filter_keeps_non_matching_records() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    let repo = store.employees().unwrap();

    let deleted = repo
        .delete_many(&EmployeeFilter::all().department_id(id(FINANCE_ID)))
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(repo.count(&EmployeeFilter::all()).unwrap(), 2);
}

#[test]
fn corrupted_row_is_reported_as_invalid_data() {
    let store = Store::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO Employee (id, first_name, last_name, department_id)
             VALUES ('e1', '', 'Doe', 'IT');",
            [],
        )
        .unwrap();
    let repo = store.employees().unwrap();

    let err = repo.find_all(&EmployeeFilter::all()).unwrap_err();
    match err {
        RepoError::InvalidData(message) => {
            assert!(message.contains("e1"), "unexpected message: {message}");
            assert!(message.contains("firstName"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = repo
        .find_one_populated(&EmployeeFilter::all())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn corrupted_department_in_populated_read_is_reported_as_invalid_data() {
    let store = Store::open_in_memory().unwrap();
    seed_employees(&store);
    store
        .connection()
        .execute(
            "INSERT INTO Department (id, name) VALUES (?1, ' ');",
            [FINANCE_ID],
        )
        .unwrap();
    let repo = store.employees().unwrap();

    assert_eq!(repo.find_all(&EmployeeFilter::all()).unwrap().len(), 3);
    let err = repo.find_all_populated(&EmployeeFilter::all()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains(FINANCE_ID)));
}
