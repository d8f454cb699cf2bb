// ============================================================================
// MODÈLE : SUBSCRIPTIONS
// ============================================================================
//
// Description:
//   Relation "user suit author". Deux clés étrangères vers users, donc
//   pas de Related<> automatique : on passe par Relation::User / Author.
//
// Points d'attention:
//   - (user_id, author_id) unique (index de la migration)
//   - user_id != author_id vérifié dans le service, pas en base
//   - ON DELETE CASCADE des deux côtés
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl ActiveModelBehavior for ActiveModel {}
