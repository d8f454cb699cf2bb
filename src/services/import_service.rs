// ============================================================================
// IMPORT : chargement initial des tags / ingrédients depuis des fichiers JSON
// ============================================================================
//
// Format attendu (tableau JSON) :
//   tags        : [{"name": "Breakfast", "slug": "breakfast"}, ...]
//   ingredients : [{"name": "flour", "measurement_unit": "g"}, ...]
//
// Les lignes déjà présentes (clé unique) sont ignorées : l'import est rejouable.
//
// ============================================================================

use sea_orm::*;
use sea_orm::sea_query::OnConflict;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::models::{ingredient, tag};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("unknown import kind '{0}', expected 'tags' or 'ingredients'")]
    UnknownKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImportKind {
    Tags,
    Ingredients,
}

impl std::str::FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tags" => Ok(Self::Tags),
            "ingredients" => Ok(Self::Ingredients),
            other => Err(ImportError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

pub struct ImportService;

impl ImportService {
    pub async fn import_file(
        db: &DatabaseConnection,
        kind: ImportKind,
        path: &Path,
    ) -> Result<u64, ImportError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match kind {
            ImportKind::Tags => Self::import_tags(db, serde_json::from_str(&raw)?).await,
            ImportKind::Ingredients => Self::import_ingredients(db, serde_json::from_str(&raw)?).await,
        }
    }

    /// Retourne le nombre de lignes réellement insérées
    pub async fn import_tags(db: &DatabaseConnection, records: Vec<TagRecord>) -> Result<u64, ImportError> {
        let before = tag::Entity::find().count(db).await?;

        for record in records {
            tag::Entity::insert(tag::ActiveModel {
                name: Set(record.name),
                slug: Set(record.slug),
                ..Default::default()
            })
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
        }

        let after = tag::Entity::find().count(db).await?;
        Ok(after - before)
    }

    pub async fn import_ingredients(
        db: &DatabaseConnection,
        records: Vec<IngredientRecord>,
    ) -> Result<u64, ImportError> {
        let before = ingredient::Entity::find().count(db).await?;

        for record in records {
            ingredient::Entity::insert(ingredient::ActiveModel {
                name: Set(record.name),
                measurement_unit: Set(record.measurement_unit),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([ingredient::Column::Name, ingredient::Column::MeasurementUnit])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        }

        let after = ingredient::Entity::find().count(db).await?;
        Ok(after - before)
    }
}
