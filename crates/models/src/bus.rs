use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub plate_number: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Buses hold no relations: the menu store references them by id only.
#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

fn validate_plate(plate_number: &str) -> Result<(), errors::ModelError> {
    if plate_number.trim().is_empty() {
        return Err(errors::ModelError::Validation("plate number required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, plate_number: &str, description: Option<&str>) -> Result<Model, errors::ModelError> {
    validate_plate(plate_number)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        plate_number: Set(plate_number.trim().to_string()),
        description: Set(description.map(str::to_string)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_plate<C: ConnectionTrait>(db: &C, plate_number: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::PlateNumber.eq(plate_number.trim()))
        .one(db)
        .await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

/// Returns `None` when the bus does not exist.
pub async fn update<C: ConnectionTrait>(db: &C, id: i32, plate_number: &str, description: Option<&str>) -> Result<Option<Model>, errors::ModelError> {
    validate_plate(plate_number)?;
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.plate_number = Set(plate_number.trim().to_string());
    am.description = Set(description.map(str::to_string));
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

/// Returns whether a row was removed.
pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
