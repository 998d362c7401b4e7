//! Permission matrix mutations: cascades, grant replacement and concurrency.

use std::collections::BTreeSet;

use estate_admin::common::database;
use estate_admin::config::DatabaseConfig;
use estate_admin::entities::v1::permissions::Action;
use estate_admin::entities::v1::{modules, permission_role, permissions, submodules};
use estate_admin::rbac::{Actor, Grant, MatrixError, PermissionMatrix};
use estate_admin::testing::setup;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use tempfile::TempDir;

const PROPERTIES_MANAGEMENT: &str = "Properties Management";

fn grants(
    effective: &BTreeSet<estate_admin::rbac::EffectivePermission>,
) -> Vec<(&str, &str, Action)> {
    effective
        .iter()
        .map(|p| (p.module.as_str(), p.submodule.as_str(), p.action))
        .collect()
}

#[tokio::test]
async fn manager_sees_exactly_the_granted_actions_while_active() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let hasher = setup::password_hasher();

    let role = setup::create_role(&db, "Manager").await;
    let user = setup::create_user(&db, &hasher, role.id).await;
    let actor = Actor::new(user.id, role.id);
    let module = setup::module(&db, PROPERTIES_MANAGEMENT).await;
    let properties = setup::submodule(&db, module.id, "Properties").await;

    matrix
        .replace_role_permissions(
            role.id,
            vec![Grant {
                module_id: module.id,
                submodule_id: properties.id,
                actions: vec![Action::Read, Action::Update],
            }],
        )
        .await
        .unwrap();

    let expected = vec![
        (PROPERTIES_MANAGEMENT, "Properties", Action::Read),
        (PROPERTIES_MANAGEMENT, "Properties", Action::Update),
    ];
    let effective = matrix.effective_permissions(&actor).await.unwrap();
    assert_eq!(grants(&effective), expected);
    assert!(
        matrix
            .has_permission(&actor, module.id, properties.id, Action::Read)
            .await
            .unwrap()
    );
    assert!(
        !matrix
            .has_permission(&actor, module.id, properties.id, Action::Delete)
            .await
            .unwrap()
    );

    let toggled = matrix.toggle_submodule_active(properties.id).await.unwrap();
    assert!(!toggled.is_active);
    assert!(matrix.effective_permissions(&actor).await.unwrap().is_empty());
    assert!(
        !matrix
            .has_permission(&actor, module.id, properties.id, Action::Read)
            .await
            .unwrap()
    );

    // rows survive deactivation
    let rows = permissions::Entity::find()
        .filter(permissions::Column::SubmoduleId.eq(properties.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(rows, 4);

    matrix.toggle_submodule_active(properties.id).await.unwrap();
    let effective = matrix.effective_permissions(&actor).await.unwrap();
    assert_eq!(grants(&effective), expected);

    matrix.toggle_module_active(module.id).await.unwrap();
    assert!(matrix.effective_permissions(&actor).await.unwrap().is_empty());
    let err = matrix
        .authorize(&actor, PROPERTIES_MANAGEMENT, "Properties", Action::Read)
        .await
        .unwrap_err();
    assert!(matches!(err, MatrixError::Forbidden { .. }));
}

#[tokio::test]
async fn deleting_a_module_leaves_no_dangling_rows() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let module = setup::module(&db, PROPERTIES_MANAGEMENT).await;

    let submodule_ids: Vec<i32> = submodules::Entity::find()
        .select_only()
        .column(submodules::Column::Id)
        .filter(submodules::Column::ModuleId.eq(module.id))
        .into_tuple()
        .all(&db)
        .await
        .unwrap();
    let permission_ids: Vec<i32> = permissions::Entity::find()
        .select_only()
        .column(permissions::Column::Id)
        .filter(permissions::Column::SubmoduleId.is_in(submodule_ids.clone()))
        .into_tuple()
        .all(&db)
        .await
        .unwrap();
    assert_eq!(permission_ids.len(), 8);

    let report = matrix.delete_module(module.id).await.unwrap();
    assert_eq!(report.submodules, 2);
    assert_eq!(report.permissions, 8);
    // super admin and property manager
    assert_eq!(report.assignments, 16);

    let permissions_left = permissions::Entity::find()
        .filter(permissions::Column::SubmoduleId.is_in(submodule_ids))
        .count(&db)
        .await
        .unwrap();
    let assignments_left = permission_role::Entity::find()
        .filter(permission_role::Column::PermissionId.is_in(permission_ids))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(permissions_left, 0);
    assert_eq!(assignments_left, 0);

    let err = matrix.delete_module(module.id).await.unwrap_err();
    assert!(matches!(err, MatrixError::NotFound { entity: "Module", .. }));
}

#[tokio::test]
async fn deleting_a_submodule_spares_its_siblings() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let module = setup::module(&db, "Blog Management").await;
    let comments = setup::submodule(&db, module.id, "Comments").await;
    let blogs = setup::submodule(&db, module.id, "Blogs").await;

    let report = matrix.delete_submodule(comments.id).await.unwrap();
    assert_eq!(report.submodules, 1);
    assert_eq!(report.permissions, 4);
    assert_eq!(report.assignments, 8);

    let siblings = permissions::Entity::find()
        .filter(permissions::Column::SubmoduleId.eq(blogs.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(siblings, 4);

    let err = matrix.delete_submodule(comments.id).await.unwrap_err();
    assert!(matches!(err, MatrixError::NotFound { entity: "Submodule", .. }));
}

#[tokio::test]
async fn concurrent_module_deletes_succeed_once() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let module = setup::module(&db, "Services Management").await;

    let first = matrix.clone();
    let second = matrix.clone();
    let (a, b) = tokio::join!(first.delete_module(module.id), second.delete_module(module.id));

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(MatrixError::NotFound { .. })))
    );
}

/// File-backed SQLite behind a pool of several connections, as deployed.
async fn pooled_database(dir: &TempDir) -> DatabaseConnection {
    let path = dir.path().join("estate-admin.sqlite");
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 4,
        min_connections: 2,
        ..DatabaseConfig::default()
    };

    database::connect(&config).await.unwrap()
}

/// Ok count and NotFound count; any other outcome fails the test.
async fn settle<T>(
    handles: Vec<tokio::task::JoinHandle<Result<T, MatrixError>>>,
) -> (usize, usize) {
    let (mut ok, mut not_found) = (0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(MatrixError::NotFound { .. }) => not_found += 1,
            Err(e) => panic!("unexpected outcome: {e:?}"),
        }
    }

    (ok, not_found)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_over_a_connection_pool_succeed_once() {
    let dir = TempDir::new().unwrap();
    let db = pooled_database(&dir).await;
    let matrix = PermissionMatrix::new(db.clone());

    let blog = setup::module(&db, "Blog Management").await;
    let comments = setup::submodule(&db, blog.id, "Comments").await.id;
    let handles = (0..4)
        .map(|_| {
            let matrix = matrix.clone();
            tokio::spawn(async move { matrix.delete_submodule(comments).await })
        })
        .collect();
    assert_eq!(settle(handles).await, (1, 3));

    let names = [
        PROPERTIES_MANAGEMENT,
        "Blog Management",
        "Services Management",
        "Testimonial Management",
        "User Management",
    ];
    for name in names {
        let module = setup::module(&db, name).await.id;
        let handles = (0..4)
            .map(|_| {
                let matrix = matrix.clone();
                tokio::spawn(async move { matrix.delete_module(module).await })
            })
            .collect();
        assert_eq!(settle(handles).await, (1, 3), "{name}");
    }

    assert_eq!(modules::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(submodules::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(permissions::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(permission_role::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_grant_replacements_leave_one_winner() {
    let dir = TempDir::new().unwrap();
    let db = pooled_database(&dir).await;
    let matrix = PermissionMatrix::new(db.clone());
    let blog = setup::module(&db, "Blog Management").await;
    let blogs = setup::submodule(&db, blog.id, "Blogs").await;
    let comments = setup::submodule(&db, blog.id, "Comments").await;

    let handles: Vec<_> = [blogs.id, comments.id, blogs.id, comments.id]
        .into_iter()
        .map(|submodule_id| {
            let matrix = matrix.clone();
            let grant = Grant {
                module_id: blog.id,
                submodule_id,
                actions: vec![Action::Read, Action::Update],
            };
            tokio::spawn(async move { matrix.replace_role_permissions(3, vec![grant]).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().len(), 2);
    }

    // whichever ran last, the role holds exactly one grant
    let attached = permission_role::Entity::find()
        .filter(permission_role::Column::RoleId.eq(3))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(attached, 2);
}

#[tokio::test]
async fn submodule_titles_are_unique_within_a_module_only() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let blog = setup::module(&db, "Blog Management").await;
    let services = setup::module(&db, "Services Management").await;

    let created = matrix
        .create_submodule(services.id, "Categories", Some("/admin/service-categories"))
        .await
        .unwrap();
    assert_eq!(created.module_id, services.id);
    assert!(created.is_active);

    let err = matrix
        .create_submodule(blog.id, "Categories", None)
        .await
        .unwrap_err();
    assert!(matches!(err, MatrixError::DuplicateTitle { .. }));

    let err = matrix.create_submodule(999, "Anything", None).await.unwrap_err();
    assert!(matches!(err, MatrixError::NotFound { entity: "Module", id: 999 }));
}

#[tokio::test]
async fn module_names_are_validated_and_unique() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());

    let err = matrix.create_module("   ").await.unwrap_err();
    assert!(matches!(err, MatrixError::Validation(_)));

    let err = matrix.create_module(&"x".repeat(256)).await.unwrap_err();
    assert!(matches!(err, MatrixError::Validation(_)));

    let err = matrix.create_module("Blog Management").await.unwrap_err();
    assert!(matches!(err, MatrixError::DuplicateName(_)));

    let module = matrix.create_module("  Agent Management ").await.unwrap();
    assert_eq!(module.name, "Agent Management");
}

#[tokio::test]
async fn replacing_grants_is_a_full_replace() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let actor = Actor::new(0, 3);
    let blog = setup::module(&db, "Blog Management").await;
    let blogs = setup::submodule(&db, blog.id, "Blogs").await;
    let services = setup::module(&db, "Services Management").await;
    let list = setup::submodule(&db, services.id, "Services List").await;

    let attached = matrix
        .replace_role_permissions(
            3,
            vec![
                Grant {
                    module_id: services.id,
                    submodule_id: list.id,
                    actions: vec![Action::Read, Action::Read, Action::Create],
                },
                Grant {
                    module_id: blog.id,
                    submodule_id: blogs.id,
                    actions: vec![Action::Delete],
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(attached.len(), 3);

    let effective = matrix.effective_permissions(&actor).await.unwrap();
    assert_eq!(
        grants(&effective),
        vec![
            ("Blog Management", "Blogs", Action::Delete),
            ("Services Management", "Services List", Action::Create),
            ("Services Management", "Services List", Action::Read),
        ]
    );

    matrix.replace_role_permissions(3, Vec::new()).await.unwrap();
    assert!(matrix.effective_permissions(&actor).await.unwrap().is_empty());

    // permission rows are kept for reuse
    let rows = permissions::Entity::find().count(&db).await.unwrap();
    assert_eq!(rows, 36);
}

#[tokio::test]
async fn invalid_grants_roll_back_the_replace() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let actor = Actor::new(0, 2);
    let before = matrix.effective_permissions(&actor).await.unwrap();
    assert_eq!(before.len(), 12);

    let blog = setup::module(&db, "Blog Management").await;
    let properties = setup::module(&db, PROPERTIES_MANAGEMENT).await;
    let blogs = setup::submodule(&db, blog.id, "Blogs").await;

    let err = matrix
        .replace_role_permissions(
            2,
            vec![
                Grant {
                    module_id: blog.id,
                    submodule_id: blogs.id,
                    actions: vec![Action::Read],
                },
                Grant {
                    module_id: properties.id,
                    submodule_id: blogs.id,
                    actions: vec![Action::Read],
                },
                Grant {
                    module_id: 999,
                    submodule_id: 998,
                    actions: vec![Action::Read],
                },
            ],
        )
        .await
        .unwrap_err();

    let MatrixError::Validation(validation) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(!validation.has("permissions.0.submodule_id"));
    assert!(validation.has("permissions.1.submodule_id"));
    assert!(validation.has("permissions.2.module_id"));
    assert!(validation.has("permissions.2.submodule_id"));

    assert_eq!(matrix.effective_permissions(&actor).await.unwrap(), before);

    let err = matrix.replace_role_permissions(999, Vec::new()).await.unwrap_err();
    assert!(matches!(err, MatrixError::NotFound { entity: "Role", .. }));
}

#[tokio::test]
async fn failure_after_detaching_keeps_the_old_grants() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let actor = Actor::new(0, 2);
    let before = matrix.effective_permissions(&actor).await.unwrap();
    let blog = setup::module(&db, "Blog Management").await;
    let blogs = setup::submodule(&db, blog.id, "Blogs").await;

    db.execute_unprepared(
        "CREATE TRIGGER frozen_grants BEFORE INSERT ON permission_role
         WHEN NEW.role_id = 2
         BEGIN SELECT RAISE(ABORT, 'grants are frozen'); END",
    )
    .await
    .unwrap();

    let err = matrix
        .replace_role_permissions(
            2,
            vec![Grant {
                module_id: blog.id,
                submodule_id: blogs.id,
                actions: vec![Action::Read],
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MatrixError::Transaction {
            operation: "replace_role_permissions",
            ..
        }
    ));

    assert_eq!(matrix.effective_permissions(&actor).await.unwrap(), before);
    let attached = permission_role::Entity::find()
        .filter(permission_role::Column::RoleId.eq(2))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(attached, 12);
}

#[tokio::test]
async fn failure_midway_through_a_cascade_deletes_nothing() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db.clone());
    let blog = setup::module(&db, "Blog Management").await;
    let assignments = permission_role::Entity::find().count(&db).await.unwrap();

    // permissions and their assignments are gone by the time submodules go
    db.execute_unprepared(
        "CREATE TRIGGER frozen_submodules BEFORE DELETE ON submodules
         BEGIN SELECT RAISE(ABORT, 'submodules are frozen'); END",
    )
    .await
    .unwrap();

    let err = matrix.delete_module(blog.id).await.unwrap_err();
    assert!(matches!(
        err,
        MatrixError::Transaction {
            operation: "delete_module",
            ..
        }
    ));

    assert_eq!(modules::Entity::find().count(&db).await.unwrap(), 5);
    assert_eq!(submodules::Entity::find().count(&db).await.unwrap(), 9);
    assert_eq!(permissions::Entity::find().count(&db).await.unwrap(), 36);
    assert_eq!(
        permission_role::Entity::find().count(&db).await.unwrap(),
        assignments
    );

    let comments = setup::submodule(&db, blog.id, "Comments").await;
    let err = matrix.delete_submodule(comments.id).await.unwrap_err();
    assert!(matches!(err, MatrixError::Transaction { .. }));
    assert_eq!(permissions::Entity::find().count(&db).await.unwrap(), 36);
}

#[tokio::test]
async fn toggling_unknown_rows_is_not_found() {
    let db = setup::database().await;
    let matrix = PermissionMatrix::new(db);

    assert!(matches!(
        matrix.toggle_module_active(999).await,
        Err(MatrixError::NotFound { entity: "Module", .. })
    ));
    assert!(matches!(
        matrix.toggle_submodule_active(999).await,
        Err(MatrixError::NotFound { entity: "Submodule", .. })
    ));
}
