use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::common::prelude::*;
use crate::entities::v1::users::{Column, Entity};
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};
use crate::requests::v1::user::UserPaginationRequest;
use crate::responses::v1::user::{User, UserPaginationResponse};

#[::tracing::instrument(skip(db))]
pub async fn paginate(
    db: &DatabaseConnection,
    actor: &Actor,
    request: UserPaginationRequest,
) -> Result<UserPaginationResponse, Error> {
    let mut query = Entity::find();

    if !actor.is_super_admin() {
        query = query.filter(Column::RoleId.ne(SUPER_ADMIN_ROLE_ID));
    }

    if let Some(search) = request.search() {
        let search = format!("%{}%", search);

        query = query.filter(
            Condition::any()
                .add(Column::Name.like(search.clone()))
                .add(Column::Username.like(search.clone()))
                .add(Column::Email.like(search)),
        );
    }

    let total = query.clone().count(db).await?;
    let per_page = request.per_page();

    let offset = request.offset();

    // past the last page
    let users = if offset >= total {
        vec![]
    } else {
        query
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .limit(per_page)
            .offset(offset)
            .all(db)
            .await?
    };

    Ok(UserPaginationResponse {
        total,
        page: request.page(),
        per_page,
        pages: total.div_ceil(per_page),
        data: users.into_iter().map(User::from).collect(),
    })
}
