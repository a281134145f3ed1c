use rusqlite::Connection;
use tracker_core::db::open_db_in_memory;
use tracker_core::{
    Dependency, DependencyScope, EntityId, EntityRepository, Link, LinkKind, LinkRepository,
    ProjectInput, RepoError, RiskInput, SqliteLinkRepository, SqliteProjectRepository,
    SqliteRiskRepository, SqliteTaskRepository, TaskInput, ValidationError,
};

fn project(conn: &Connection, name: &str) -> EntityId {
    SqliteProjectRepository::new(conn)
        .create(&ProjectInput {
            name: name.to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            owner: "pmo".to_string(),
            description: None,
        })
        .unwrap()
}

fn task(conn: &Connection, name: &str, project_id: Option<EntityId>) -> EntityId {
    SqliteTaskRepository::new(conn)
        .create(&TaskInput {
            name: name.to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-05".to_string(),
            duration: Some(4.0),
            progress: Some(0.0),
            project_id,
            description: None,
        })
        .unwrap()
}

fn risk(conn: &Connection) -> EntityId {
    SqliteRiskRepository::new(conn)
        .create(&RiskInput {
            name: "Supplier delay".to_string(),
            description: None,
            pre_impact: 3.0,
            post_impact: 2.0,
            pre_likelihood: 3.0,
            post_likelihood: 1.0,
            pre_score: 9.0,
            post_score: 2.0,
            preparedness: 4.0,
            date: "2024-01-15".to_string(),
        })
        .unwrap()
}

fn finish_to_start(source_id: EntityId, target_id: EntityId) -> Dependency {
    Dependency {
        source_id,
        target_id,
        dependency_type: "FS".to_string(),
        lag: 0.0,
    }
}

#[test]
fn link_create_get_list_delete() {
    let conn = open_db_in_memory().unwrap();
    let project_id = project(&conn, "Apollo");
    let risk_id = risk(&conn);
    let links = SqliteLinkRepository::new(&conn);

    let link = Link::new(LinkKind::ProjectRisk, project_id, risk_id);
    links.create_link(&link).unwrap();

    assert_eq!(
        links
            .get_link(LinkKind::ProjectRisk, project_id, risk_id)
            .unwrap(),
        Some(link)
    );
    assert_eq!(links.list_links(LinkKind::ProjectRisk).unwrap(), vec![link]);
    assert!(links.list_links(LinkKind::TaskRisk).unwrap().is_empty());

    links.delete_link(&link).unwrap();
    assert!(links
        .get_link(LinkKind::ProjectRisk, project_id, risk_id)
        .unwrap()
        .is_none());
}

#[test]
fn duplicate_link_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let task_id = task(&conn, "t", None);
    let risk_id = risk(&conn);
    let links = SqliteLinkRepository::new(&conn);

    let link = Link::new(LinkKind::TaskRisk, task_id, risk_id);
    links.create_link(&link).unwrap();
    match links.create_link(&link).unwrap_err() {
        RepoError::Db(err) => assert!(err.is_constraint_violation()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rekey_moves_the_row() {
    let conn = open_db_in_memory().unwrap();
    let first_task = task(&conn, "first", None);
    let second_task = task(&conn, "second", None);
    let risk_id = risk(&conn);
    let links = SqliteLinkRepository::new(&conn);

    let current = Link::new(LinkKind::TaskRisk, first_task, risk_id);
    let replacement = Link::new(LinkKind::TaskRisk, second_task, risk_id);
    links.create_link(&current).unwrap();

    links.rekey_link(&current, &replacement).unwrap();
    assert_eq!(
        links.list_links(LinkKind::TaskRisk).unwrap(),
        vec![replacement]
    );

    let err = links.rekey_link(&current, &replacement).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "Task risk", .. }));
}

#[test]
fn deleting_an_endpoint_cascades_to_links() {
    let conn = open_db_in_memory().unwrap();
    let task_id = task(&conn, "t", None);
    let risk_id = risk(&conn);
    let links = SqliteLinkRepository::new(&conn);

    links
        .create_link(&Link::new(LinkKind::TaskRisk, task_id, risk_id))
        .unwrap();
    SqliteTaskRepository::new(&conn).delete(task_id).unwrap();

    assert!(links.list_links(LinkKind::TaskRisk).unwrap().is_empty());
}

#[test]
fn dependency_crud_including_key_change() {
    let conn = open_db_in_memory().unwrap();
    let a = task(&conn, "a", None);
    let b = task(&conn, "b", None);
    let c = task(&conn, "c", None);
    let links = SqliteLinkRepository::new(&conn);

    links
        .create_dependency(DependencyScope::Task, &finish_to_start(a, b))
        .unwrap();
    assert_eq!(
        links.get_dependency(DependencyScope::Task, a, b).unwrap(),
        Some(finish_to_start(a, b))
    );

    let mut moved = finish_to_start(a, c);
    moved.dependency_type = "SS".to_string();
    moved.lag = 2.0;
    links
        .update_dependency(DependencyScope::Task, a, b, &moved)
        .unwrap();
    assert_eq!(
        links.list_dependencies(DependencyScope::Task).unwrap(),
        vec![moved]
    );

    links.delete_dependency(DependencyScope::Task, a, c).unwrap();
    assert!(links
        .list_dependencies(DependencyScope::Task)
        .unwrap()
        .is_empty());
    assert!(matches!(
        links.delete_dependency(DependencyScope::Task, a, c),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn self_dependency_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let a = task(&conn, "a", None);
    let links = SqliteLinkRepository::new(&conn);

    let err = links
        .create_dependency(DependencyScope::Task, &finish_to_start(a, a))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::SelfDependency)
    ));
}

#[test]
fn risk_reaches_projects_directly_and_through_tasks() {
    let conn = open_db_in_memory().unwrap();
    let apollo = project(&conn, "Apollo");
    let gemini = project(&conn, "Gemini");
    let mercury = project(&conn, "Mercury");
    let gemini_task = task(&conn, "g", Some(gemini));
    let loose_task = task(&conn, "loose", None);
    let apollo_task = task(&conn, "a", Some(apollo));
    let risk_id = risk(&conn);
    let links = SqliteLinkRepository::new(&conn);

    links
        .create_link(&Link::new(LinkKind::ProjectRisk, apollo, risk_id))
        .unwrap();
    for task_id in [gemini_task, loose_task, apollo_task] {
        links
            .create_link(&Link::new(LinkKind::TaskRisk, task_id, risk_id))
            .unwrap();
    }

    let reached = SqliteRiskRepository::new(&conn)
        .list_project_ids_for_risk(risk_id)
        .unwrap();
    assert_eq!(reached, vec![apollo, gemini]);
    assert!(!reached.contains(&mercury));
}
