use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::menu_item;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Logical reference to `bus.id`; no foreign key.
    pub bus_id: i32,
    pub name: String,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    MenuItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::MenuItem => Entity::has_many(menu_item::Entity).into() }
    }
}

impl Related<menu_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::MenuItem.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// New categories are appended after the bus's existing ones.
pub async fn create<C: ConnectionTrait>(db: &C, bus_id: i32, name: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    let existing = Entity::find().filter(Column::BusId.eq(bus_id)).count(db).await?;
    let am = ActiveModel {
        bus_id: Set(bus_id),
        name: Set(name.trim().to_string()),
        position: Set(existing as i32),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_bus<C: ConnectionTrait>(db: &C, bus_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::BusId.eq(bus_id))
        .order_by_asc(Column::Position)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Deletes the given categories; their menu items go with them through the
/// `ON DELETE CASCADE` foreign key.
pub async fn delete_many<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, errors::ModelError> {
    if ids.is_empty() { return Ok(0); }
    let res = Entity::delete_many()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
