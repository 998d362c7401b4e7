use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Instant;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Actor, MatrixError};
use crate::common::{Validation, now};
use crate::entities::v1::permissions::Action;
use crate::entities::v1::{modules, permission_role, permissions, roles, submodules};
use crate::metrics::AppMetrics;
use crate::security::Validator;

const LABEL_MAX: usize = 255;

/// Actions granted on one submodule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Grant {
    pub module_id: i32,
    pub submodule_id: i32,
    pub actions: Vec<Action>,
}

/// Rows removed by a cascading delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CascadeReport {
    pub submodules: u64,
    pub permissions: u64,
    /// Role ↔ permission associations
    pub assignments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleWithSubmodules {
    pub module: modules::Model,
    pub submodules: Vec<submodules::Model>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SubmoduleWithModule {
    pub id: i32,
    pub module_id: i32,
    pub module_name: String,
    pub module_is_active: bool,
    pub title: String,
    pub path: Option<String>,
    pub is_active: bool,
}

/// One `(module, submodule, action)` capability a role currently holds.
///
/// Ordered by module id, then submodule id, then action.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema, FromQueryResult,
)]
pub struct EffectivePermission {
    pub module_id: i32,
    #[schema(example = "Properties Management")]
    pub module: String,
    pub submodule_id: i32,
    #[schema(example = "Properties")]
    pub submodule: String,
    pub action: Action,
}

#[derive(Clone)]
pub struct PermissionMatrix {
    db: DatabaseConnection,
    metrics: Option<AppMetrics>,
}

impl PermissionMatrix {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: AppMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    #[::tracing::instrument(skip(self))]
    pub async fn create_module(&self, name: &str) -> Result<modules::Model, MatrixError> {
        let name = name.trim();
        let mut validation = Validation::new();
        Validator::required(&mut validation, "name", "Name", name, LABEL_MAX);
        validation.into_result().map_err(MatrixError::Validation)?;

        let taken = modules::Entity::find()
            .filter(modules::Column::Name.eq(name))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(MatrixError::DuplicateName(name.to_string()));
        }

        let now = now();
        let module = modules::ActiveModel {
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                MatrixError::DuplicateName(name.to_string())
            }
            _ => MatrixError::Database(e),
        })?;

        ::tracing::info!(module_id = module.id, "Module created");

        Ok(module)
    }

    /// Titles are unique per module only.
    #[::tracing::instrument(skip(self))]
    pub async fn create_submodule(
        &self,
        module_id: i32,
        title: &str,
        path: Option<&str>,
    ) -> Result<submodules::Model, MatrixError> {
        let title = title.trim();
        let path = path.map(str::trim).filter(|path| !path.is_empty());

        let mut validation = Validation::new();
        Validator::required(&mut validation, "title", "Title", title, LABEL_MAX);
        if path.is_some_and(|path| path.chars().count() > LABEL_MAX) {
            validation.add("path", "Path may not be greater than 255 characters");
        }
        validation.into_result().map_err(MatrixError::Validation)?;

        modules::Entity::find_by_id(module_id)
            .one(&self.db)
            .await?
            .ok_or(MatrixError::not_found("Module", module_id))?;

        let duplicate = || MatrixError::DuplicateTitle {
            module_id,
            title: title.to_string(),
        };

        let taken = submodules::Entity::find()
            .filter(submodules::Column::ModuleId.eq(module_id))
            .filter(submodules::Column::Title.eq(title))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(duplicate());
        }

        let now = now();
        let submodule = submodules::ActiveModel {
            module_id: Set(module_id),
            title: Set(title.to_string()),
            path: Set(path.map(str::to_string)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => duplicate(),
            _ => MatrixError::Database(e),
        })?;

        ::tracing::info!(submodule_id = submodule.id, "Submodule created");

        Ok(submodule)
    }

    /// Delete a module with its submodules, their permissions and every role
    /// association of those permissions. All or nothing.
    #[::tracing::instrument(skip(self), fields(module_id = id))]
    pub async fn delete_module(&self, id: i32) -> Result<CascadeReport, MatrixError> {
        let started = Instant::now();
        let result = self
            .cascade_module(id)
            .await
            .map_err(rolled_back("delete_module"));
        self.observe_cascade("delete_module", &result, started);

        if let Ok(report) = &result {
            ::tracing::info!(
                submodules = report.submodules,
                permissions = report.permissions,
                assignments = report.assignments,
                "Module deleted"
            );
        }

        result
    }

    async fn cascade_module(&self, id: i32) -> Result<CascadeReport, MatrixError> {
        let txn = self.db.begin().await?;

        if !claim::<modules::Entity, _>(&txn, modules::Column::Id, modules::Column::UpdatedAt, id)
            .await?
        {
            return Err(MatrixError::not_found("Module", id));
        }

        let submodule_ids: Vec<i32> = submodules::Entity::find()
            .select_only()
            .column(submodules::Column::Id)
            .filter(submodules::Column::ModuleId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let permission_ids: Vec<i32> = permissions::Entity::find()
            .select_only()
            .column(permissions::Column::Id)
            .filter(
                Condition::any()
                    .add(permissions::Column::ModuleId.eq(id))
                    .add(permissions::Column::SubmoduleId.is_in(submodule_ids)),
            )
            .into_tuple()
            .all(&txn)
            .await?;

        let assignments = detach_permissions(&txn, &permission_ids).await?;
        let permissions = delete_permissions(&txn, &permission_ids).await?;
        let submodules = submodules::Entity::delete_many()
            .filter(submodules::Column::ModuleId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let deleted = modules::Entity::delete_by_id(id)
            .exec(&txn)
            .await?
            .rows_affected;
        if deleted == 0 {
            return Err(MatrixError::not_found("Module", id));
        }

        txn.commit().await?;

        Ok(CascadeReport {
            submodules,
            permissions,
            assignments,
        })
    }

    /// Delete a submodule with its permissions and their role associations.
    #[::tracing::instrument(skip(self), fields(submodule_id = id))]
    pub async fn delete_submodule(&self, id: i32) -> Result<CascadeReport, MatrixError> {
        let started = Instant::now();
        let result = self
            .cascade_submodule(id)
            .await
            .map_err(rolled_back("delete_submodule"));
        self.observe_cascade("delete_submodule", &result, started);

        if let Ok(report) = &result {
            ::tracing::info!(
                permissions = report.permissions,
                assignments = report.assignments,
                "Submodule deleted"
            );
        }

        result
    }

    async fn cascade_submodule(&self, id: i32) -> Result<CascadeReport, MatrixError> {
        let txn = self.db.begin().await?;

        if !claim::<submodules::Entity, _>(
            &txn,
            submodules::Column::Id,
            submodules::Column::UpdatedAt,
            id,
        )
        .await?
        {
            return Err(MatrixError::not_found("Submodule", id));
        }

        let permission_ids: Vec<i32> = permissions::Entity::find()
            .select_only()
            .column(permissions::Column::Id)
            .filter(permissions::Column::SubmoduleId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let assignments = detach_permissions(&txn, &permission_ids).await?;
        let permissions = delete_permissions(&txn, &permission_ids).await?;
        let submodules = submodules::Entity::delete_by_id(id)
            .exec(&txn)
            .await?
            .rows_affected;
        if submodules == 0 {
            return Err(MatrixError::not_found("Submodule", id));
        }

        txn.commit().await?;

        Ok(CascadeReport {
            submodules,
            permissions,
            assignments,
        })
    }

    /// Flip `is_active`. Submodules keep their own flag.
    #[::tracing::instrument(skip(self), fields(module_id = id))]
    pub async fn toggle_module_active(&self, id: i32) -> Result<modules::Model, MatrixError> {
        let flipped = modules::Entity::update_many()
            .col_expr(
                modules::Column::IsActive,
                Expr::col(modules::Column::IsActive).not(),
            )
            .col_expr(modules::Column::UpdatedAt, Expr::value(now()))
            .filter(modules::Column::Id.eq(id))
            .exec(&self.db)
            .await?
            .rows_affected;
        if flipped == 0 {
            return Err(MatrixError::not_found("Module", id));
        }

        let module = modules::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MatrixError::not_found("Module", id))?;

        ::tracing::info!(is_active = module.is_active, "Module status toggled");

        Ok(module)
    }

    #[::tracing::instrument(skip(self), fields(submodule_id = id))]
    pub async fn toggle_submodule_active(
        &self,
        id: i32,
    ) -> Result<submodules::Model, MatrixError> {
        let flipped = submodules::Entity::update_many()
            .col_expr(
                submodules::Column::IsActive,
                Expr::col(submodules::Column::IsActive).not(),
            )
            .col_expr(submodules::Column::UpdatedAt, Expr::value(now()))
            .filter(submodules::Column::Id.eq(id))
            .exec(&self.db)
            .await?
            .rows_affected;
        if flipped == 0 {
            return Err(MatrixError::not_found("Submodule", id));
        }

        let submodule = submodules::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MatrixError::not_found("Submodule", id))?;

        ::tracing::info!(is_active = submodule.is_active, "Submodule status toggled");

        Ok(submodule)
    }

    /// Replace every grant of a role with `grants`.
    ///
    /// Omitted grants are revoked. Missing permission rows are created. Invalid
    /// module or submodule references fail the whole call with field errors
    /// keyed `permissions.{index}.module_id` / `permissions.{index}.submodule_id`.
    #[::tracing::instrument(skip(self, grants), fields(grants = grants.len()))]
    pub async fn replace_role_permissions(
        &self,
        role_id: i32,
        grants: Vec<Grant>,
    ) -> Result<Vec<permissions::Model>, MatrixError> {
        let started = Instant::now();
        let result = self
            .replace_grants(role_id, &grants)
            .await
            .map_err(rolled_back("replace_role_permissions"));
        self.observe("replace_role_permissions", result.is_ok(), started);

        if let Ok(attached) = &result {
            ::tracing::info!(attached = attached.len(), "Role permissions replaced");
        }

        result
    }

    async fn replace_grants(
        &self,
        role_id: i32,
        grants: &[Grant],
    ) -> Result<Vec<permissions::Model>, MatrixError> {
        let txn = self.db.begin().await?;

        if !claim::<roles::Entity, _>(&txn, roles::Column::Id, roles::Column::UpdatedAt, role_id)
            .await?
        {
            return Err(MatrixError::not_found("Role", role_id));
        }

        validate_grants(&txn, grants).await?;

        permission_role::Entity::delete_many()
            .filter(permission_role::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await?;

        let mut attached = BTreeMap::new();
        for grant in grants {
            let actions: BTreeSet<Action> = grant.actions.iter().copied().collect();

            for action in actions {
                let permission =
                    find_or_create_permission(&txn, grant.module_id, grant.submodule_id, action)
                        .await?;
                attached.entry(permission.id).or_insert(permission);
            }
        }

        if !attached.is_empty() {
            permission_role::Entity::insert_many(attached.keys().map(|&permission_id| {
                permission_role::ActiveModel {
                    permission_id: Set(permission_id),
                    role_id: Set(role_id),
                    ..Default::default()
                }
            }))
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(attached.into_values().collect())
    }

    /// Modules with their submodules. Only active ones unless the actor is
    /// the super admin.
    #[::tracing::instrument(skip(self), fields(user_id = actor.user_id, role_id = actor.role_id))]
    pub async fn list_accessible_modules(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ModuleWithSubmodules>, MatrixError> {
        let mut modules = modules::Entity::find().order_by_asc(modules::Column::Id);
        let mut submodules = submodules::Entity::find().order_by_asc(submodules::Column::Id);

        if !actor.is_super_admin() {
            modules = modules.filter(modules::Column::IsActive.eq(true));
            submodules = submodules.filter(submodules::Column::IsActive.eq(true));
        }

        let modules = modules.all(&self.db).await?;
        let module_ids: Vec<i32> = modules.iter().map(|module| module.id).collect();

        let mut grouped: HashMap<i32, Vec<submodules::Model>> = HashMap::new();
        for submodule in submodules
            .filter(submodules::Column::ModuleId.is_in(module_ids))
            .all(&self.db)
            .await?
        {
            grouped.entry(submodule.module_id).or_default().push(submodule);
        }

        Ok(modules
            .into_iter()
            .map(|module| ModuleWithSubmodules {
                submodules: grouped.remove(&module.id).unwrap_or_default(),
                module,
            })
            .collect())
    }

    /// Flat submodule listing ordered by title.
    #[::tracing::instrument(skip(self), fields(user_id = actor.user_id, role_id = actor.role_id))]
    pub async fn list_accessible_submodules(
        &self,
        actor: &Actor,
    ) -> Result<Vec<SubmoduleWithModule>, MatrixError> {
        let mut query = submodules::Entity::find()
            .select_only()
            .column(submodules::Column::Id)
            .column(submodules::Column::ModuleId)
            .column_as(modules::Column::Name, "module_name")
            .column_as(modules::Column::IsActive, "module_is_active")
            .column(submodules::Column::Title)
            .column(submodules::Column::Path)
            .column(submodules::Column::IsActive)
            .join(JoinType::InnerJoin, submodules::Relation::Modules.def());

        if !actor.is_super_admin() {
            query = query
                .filter(modules::Column::IsActive.eq(true))
                .filter(submodules::Column::IsActive.eq(true));
        }

        Ok(query
            .order_by_asc(submodules::Column::Title)
            .order_by_asc(submodules::Column::Id)
            .into_model::<SubmoduleWithModule>()
            .all(&self.db)
            .await?)
    }

    /// Permissions of the actor's role whose module and submodule are both
    /// active.
    #[::tracing::instrument(skip(self), fields(user_id = actor.user_id, role_id = actor.role_id))]
    pub async fn effective_permissions(
        &self,
        actor: &Actor,
    ) -> Result<BTreeSet<EffectivePermission>, MatrixError> {
        let rows = granted_to(actor.role_id)
            .select_only()
            .column(permissions::Column::ModuleId)
            .column_as(modules::Column::Name, "module")
            .column(permissions::Column::SubmoduleId)
            .column_as(submodules::Column::Title, "submodule")
            .column(permissions::Column::Action)
            .into_model::<EffectivePermission>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    #[::tracing::instrument(skip(self), fields(user_id = actor.user_id, role_id = actor.role_id))]
    pub async fn has_permission(
        &self,
        actor: &Actor,
        module_id: i32,
        submodule_id: i32,
        action: Action,
    ) -> Result<bool, MatrixError> {
        let count = granted_to(actor.role_id)
            .filter(permissions::Column::ModuleId.eq(module_id))
            .filter(permissions::Column::SubmoduleId.eq(submodule_id))
            .filter(permissions::Column::Action.eq(action))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Check the actor may perform `action` on `module / submodule`, both given
    /// by name. The super admin always passes.
    #[::tracing::instrument(
        skip(self),
        fields(user_id = actor.user_id, role_id = actor.role_id, action = action.as_str())
    )]
    pub async fn authorize(
        &self,
        actor: &Actor,
        module: &str,
        submodule: &str,
        action: Action,
    ) -> Result<(), MatrixError> {
        let granted = actor.is_super_admin()
            || granted_to(actor.role_id)
                .filter(modules::Column::Name.eq(module))
                .filter(submodules::Column::Title.eq(submodule))
                .filter(permissions::Column::Action.eq(action))
                .count(&self.db)
                .await?
                > 0;

        if let Some(metrics) = &self.metrics {
            metrics.record_permission_check(action, granted);
        }

        if granted {
            return Ok(());
        }

        ::tracing::warn!(module, submodule, "Permission denied");

        Err(MatrixError::Forbidden {
            module: module.to_string(),
            submodule: submodule.to_string(),
            action,
        })
    }

    fn observe(&self, operation: &str, success: bool, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_db_operation(operation, success, started.elapsed().as_secs_f64());
        }
    }

    fn observe_cascade(
        &self,
        operation: &str,
        result: &Result<CascadeReport, MatrixError>,
        started: Instant,
    ) {
        self.observe(operation, result.is_ok(), started);

        if let (Some(metrics), Ok(report)) = (&self.metrics, result) {
            metrics.record_cascade("submodules", report.submodules);
            metrics.record_cascade("permissions", report.permissions);
            metrics.record_cascade("assignments", report.assignments);
        }
    }
}

/// Permissions attached to `role_id` whose module and submodule are active
fn granted_to(role_id: i32) -> Select<permissions::Entity> {
    permissions::Entity::find()
        .join(JoinType::InnerJoin, permissions::Relation::PermissionRole.def())
        .join(JoinType::InnerJoin, permissions::Relation::Modules.def())
        .join(JoinType::InnerJoin, permissions::Relation::Submodules.def())
        .filter(permission_role::Column::RoleId.eq(role_id))
        .filter(modules::Column::IsActive.eq(true))
        .filter(submodules::Column::IsActive.eq(true))
}

/// Stamps `updated_at` on the target row. Must be the first statement of the
/// transaction.
///
/// Writing first takes the row lock on Postgres and MySQL and the database
/// write lock on SQLite before anything is read, so a competing transaction
/// waits for the winner to commit and then finds nothing. A deferred SQLite
/// transaction that read first would instead fail with `SQLITE_BUSY` when it
/// tried to write. `false` when the row does not exist.
async fn claim<E, C>(
    db: &C,
    id_column: E::Column,
    updated_at: E::Column,
    id: i32,
) -> Result<bool, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let claimed = E::update_many()
        .col_expr(updated_at, Expr::value(now()))
        .filter(id_column.eq(id))
        .exec(db)
        .await?
        .rows_affected;

    Ok(claimed > 0)
}

/// Turns a database failure inside a transaction into `Transaction`, logging
/// the operation and cause. The caller's span carries the ids.
fn rolled_back(operation: &'static str) -> impl FnOnce(MatrixError) -> MatrixError {
    move |e| match e {
        MatrixError::Database(source) => {
            ::tracing::error!(operation, error = %source, "Transaction rolled back");
            MatrixError::Transaction { operation, source }
        }
        e => e,
    }
}

async fn detach_permissions<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    Ok(permission_role::Entity::delete_many()
        .filter(permission_role::Column::PermissionId.is_in(ids.iter().copied()))
        .exec(db)
        .await?
        .rows_affected)
}

async fn delete_permissions<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    Ok(permissions::Entity::delete_many()
        .filter(permissions::Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?
        .rows_affected)
}

async fn validate_grants<C: ConnectionTrait>(db: &C, grants: &[Grant]) -> Result<(), MatrixError> {
    if grants.is_empty() {
        return Ok(());
    }

    let module_ids: BTreeSet<i32> = grants.iter().map(|grant| grant.module_id).collect();
    let submodule_ids: BTreeSet<i32> = grants.iter().map(|grant| grant.submodule_id).collect();

    let modules: HashSet<i32> = modules::Entity::find()
        .select_only()
        .column(modules::Column::Id)
        .filter(modules::Column::Id.is_in(module_ids))
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    // submodule id -> owning module id
    let submodules: HashMap<i32, i32> = submodules::Entity::find()
        .select_only()
        .column(submodules::Column::Id)
        .column(submodules::Column::ModuleId)
        .filter(submodules::Column::Id.is_in(submodule_ids))
        .into_tuple::<(i32, i32)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut validation = Validation::new();
    for (index, grant) in grants.iter().enumerate() {
        if !modules.contains(&grant.module_id) {
            validation.add(
                format!("permissions.{index}.module_id"),
                "Module does not exist",
            );
        }

        match submodules.get(&grant.submodule_id) {
            None => validation.add(
                format!("permissions.{index}.submodule_id"),
                "Submodule does not exist",
            ),
            Some(&owner) if owner != grant.module_id => validation.add(
                format!("permissions.{index}.submodule_id"),
                "Submodule does not belong to the selected module",
            ),
            Some(_) => {}
        }
    }

    validation.into_result().map_err(MatrixError::Validation)
}

async fn find_or_create_permission<C: ConnectionTrait>(
    db: &C,
    module_id: i32,
    submodule_id: i32,
    action: Action,
) -> Result<permissions::Model, DbErr> {
    let existing = permissions::Entity::find()
        .filter(permissions::Column::ModuleId.eq(module_id))
        .filter(permissions::Column::SubmoduleId.eq(submodule_id))
        .filter(permissions::Column::Action.eq(action))
        .one(db)
        .await?;

    if let Some(permission) = existing {
        return Ok(permission);
    }

    permissions::ActiveModel {
        module_id: Set(module_id),
        submodule_id: Set(submodule_id),
        action: Set(action),
        ..Default::default()
    }
    .insert(db)
    .await
}
