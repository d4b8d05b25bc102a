//! HTTP Handlers (`/Product`)

use std::sync::Arc;

use auth::CurrentUser;
use axum::extract::{Path, State};
use axum::{Extension, Form};
use kernel::id::ProductId;
use kernel::web::{ActionResult, ViewResult};

use crate::application::{
    CreateProductUseCase, DeleteProductUseCase, QueryProductsUseCase, UpdateProductUseCase,
};
use crate::domain::ProductRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{EditProductModel, ProductForm, ProductView};

pub const CONTROLLER: &str = "Product";

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

fn view(action: &str) -> ViewResult {
    ViewResult::new(CONTROLLER, action)
}

fn redirect_to_index() -> ActionResult {
    ActionResult::redirect_to_action(CONTROLLER, "Index")
}

/// Mutations are limited to Admin and SuperAdmin
fn require_admin(current: &CurrentUser) -> CatalogResult<()> {
    if current.is_admin_or_higher() {
        Ok(())
    } else {
        tracing::warn!(user_id = %current.user_id, "Product change attempted without Admin role");
        Err(CatalogError::Forbidden)
    }
}

// ============================================================================
// Read
// ============================================================================

/// GET /Product/Index
pub async fn index<R>(State(state): State<CatalogAppState<R>>) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let products = QueryProductsUseCase::new(state.repo.clone()).list().await?;
    let model: Vec<ProductView> = products.iter().map(ProductView::from).collect();

    Ok(view("Index").with_model(&model).into())
}

/// GET /Product/Details/{id}
pub async fn details<R>(
    State(state): State<CatalogAppState<R>>,
    Path(id): Path<ProductId>,
) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let product = QueryProductsUseCase::new(state.repo.clone()).get(&id).await?;

    Ok(view("Details")
        .with_model(&ProductView::from(&product))
        .into())
}

// ============================================================================
// Create
// ============================================================================

/// GET /Product/Create
pub async fn create_form(Extension(current): Extension<CurrentUser>) -> CatalogResult<ActionResult> {
    require_admin(&current)?;
    Ok(view("Create").with_model(&ProductForm::default()).into())
}

/// POST /Product/Create
pub async fn create<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<ProductForm>,
) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    require_admin(&current)?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(model_state) => {
            return Ok(view("Create")
                .with_model(&form)
                .with_model_state(model_state)
                .into());
        }
    };

    CreateProductUseCase::new(state.repo.clone())
        .execute(draft)
        .await?;

    Ok(redirect_to_index())
}

// ============================================================================
// Edit
// ============================================================================

/// GET /Product/Edit/{id}
pub async fn edit_form<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<ProductId>,
) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    require_admin(&current)?;

    let product = QueryProductsUseCase::new(state.repo.clone()).get(&id).await?;
    let model = EditProductModel {
        id,
        form: ProductForm::from(&product),
    };

    Ok(view("Edit").with_model(&model).into())
}

/// POST /Product/Edit/{id}
pub async fn edit<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    require_admin(&current)?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(model_state) => {
            return Ok(view("Edit")
                .with_model(&EditProductModel { id, form })
                .with_model_state(model_state)
                .into());
        }
    };

    UpdateProductUseCase::new(state.repo.clone())
        .execute(&id, draft)
        .await?;

    Ok(redirect_to_index())
}

// ============================================================================
// Delete
// ============================================================================

/// POST /Product/Delete/{id}
pub async fn delete<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<ProductId>,
) -> CatalogResult<ActionResult>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    require_admin(&current)?;

    DeleteProductUseCase::new(state.repo.clone())
        .execute(&id)
        .await?;

    Ok(redirect_to_index())
}
