//! Content repository for categories, cities and advertisements.

use std::sync::Arc;

use crate::entities::{Advertisement, Category, City, advertisement, category, city};
use abcd_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

/// Content repository for database operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ========== Categories ==========

    /// Create a category.
    pub async fn create_category(
        &self,
        model: category::ActiveModel,
    ) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: &str) -> AppResult<category::Model> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    /// List categories by name, optionally only active ones.
    pub async fn list_categories(&self, active_only: bool) -> AppResult<Vec<category::Model>> {
        let mut query = Category::find().order_by_asc(category::Column::Name);
        if active_only {
            query = query.filter(category::Column::IsActive.eq(true));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip `is_active` in place and return the updated category.
    pub async fn toggle_category_active(&self, id: &str) -> AppResult<category::Model> {
        let result = Category::update_many()
            .col_expr(
                category::Column::IsActive,
                Expr::col(category::Column::IsActive).not(),
            )
            .filter(category::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Category {id} not found")));
        }
        self.get_category(id).await
    }

    /// Delete a category.
    pub async fn delete_category(&self, id: &str) -> AppResult<()> {
        let result = Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Category {id} not found")));
        }
        Ok(())
    }

    // ========== Cities ==========

    /// Create a city.
    pub async fn create_city(&self, model: city::ActiveModel) -> AppResult<city::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a city by ID.
    pub async fn get_city(&self, id: &str) -> AppResult<city::Model> {
        City::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("City {id} not found")))
    }

    /// List cities by name, optionally only active ones.
    pub async fn list_cities(&self, active_only: bool) -> AppResult<Vec<city::Model>> {
        let mut query = City::find().order_by_asc(city::Column::Name);
        if active_only {
            query = query.filter(city::Column::IsActive.eq(true));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip `is_active` in place and return the updated city.
    pub async fn toggle_city_active(&self, id: &str) -> AppResult<city::Model> {
        let result = City::update_many()
            .col_expr(city::Column::IsActive, Expr::col(city::Column::IsActive).not())
            .filter(city::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("City {id} not found")));
        }
        self.get_city(id).await
    }

    /// Delete a city.
    pub async fn delete_city(&self, id: &str) -> AppResult<()> {
        let result = City::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("City {id} not found")));
        }
        Ok(())
    }

    // ========== Advertisements ==========

    /// Create an advertisement.
    pub async fn create_ad(
        &self,
        model: advertisement::ActiveModel,
    ) -> AppResult<advertisement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an advertisement by ID.
    pub async fn get_ad(&self, id: &str) -> AppResult<advertisement::Model> {
        Advertisement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Advertisement {id} not found")))
    }

    /// List all advertisements, newest first.
    pub async fn list_ads(&self) -> AppResult<Vec<advertisement::Model>> {
        Advertisement::find()
            .order_by_desc(advertisement::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List advertisements that are both approved and visible.
    pub async fn list_active_ads(&self) -> AppResult<Vec<advertisement::Model>> {
        Advertisement::find()
            .filter(advertisement::Column::IsApproved.eq(true))
            .filter(advertisement::Column::IsVisible.eq(true))
            .order_by_desc(advertisement::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip one boolean column of an advertisement in place and return the
    /// updated row. The other columns are not written.
    pub async fn toggle_ad_flag(
        &self,
        id: &str,
        flag: advertisement::Column,
    ) -> AppResult<advertisement::Model> {
        let result = Advertisement::update_many()
            .col_expr(flag, Expr::col(flag).not())
            .filter(advertisement::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Advertisement {id} not found")));
        }
        self.get_ad(id).await
    }

    /// Delete an advertisement.
    pub async fn delete_ad(&self, id: &str) -> AppResult<()> {
        let result = Advertisement::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Advertisement {id} not found")));
        }
        Ok(())
    }
}
