//! MVC-style action results
//!
//! Controllers answer form posts either with a redirect or with a view:
//! a JSON view-model carrying the submitted model and its [`ModelState`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::validation::ModelState;

/// Rendered view: `{ "view": "<Controller>/<Action>", "model": ..., "errors": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct ViewResult {
    pub view: String,
    pub model: serde_json::Value,
    #[serde(rename = "errors")]
    pub model_state: ModelState,
}

impl ViewResult {
    pub fn new(controller: &str, action: &str) -> Self {
        Self {
            view: format!("{controller}/{action}"),
            model: serde_json::Value::Null,
            model_state: ModelState::new(),
        }
    }

    /// Attach the view-model. Serialization failures degrade to `null`.
    pub fn with_model<M: Serialize>(mut self, model: &M) -> Self {
        self.model = serde_json::to_value(model).unwrap_or(serde_json::Value::Null);
        self
    }

    pub fn with_model_state(mut self, model_state: ModelState) -> Self {
        self.model_state = model_state;
        self
    }

    pub fn status(&self) -> StatusCode {
        if self.model_state.is_valid() {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

/// Outcome of a controller action
#[derive(Debug, Clone)]
pub enum ActionResult {
    /// Redirect to another action, addressed by name
    RedirectToAction {
        controller: &'static str,
        action: &'static str,
    },
    /// Redirect to a literal path
    Redirect(String),
    View(ViewResult),
}

impl ActionResult {
    pub fn redirect_to_action(controller: &'static str, action: &'static str) -> Self {
        Self::RedirectToAction { controller, action }
    }

    pub fn redirect(path: impl Into<String>) -> Self {
        Self::Redirect(path.into())
    }

    pub fn view(view: ViewResult) -> Self {
        Self::View(view)
    }

    /// Target action name for action-name redirects.
    pub fn action_name(&self) -> Option<&'static str> {
        match self {
            Self::RedirectToAction { action, .. } => Some(action),
            _ => None,
        }
    }

    /// Location a redirect points at.
    pub fn url(&self) -> Option<String> {
        match self {
            Self::RedirectToAction { controller, action } => {
                Some(format!("/{controller}/{action}"))
            }
            Self::Redirect(path) => Some(path.clone()),
            Self::View(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        !matches!(self, Self::View(_))
    }
}

impl From<ViewResult> for ActionResult {
    fn from(view: ViewResult) -> Self {
        Self::View(view)
    }
}

impl IntoResponse for ViewResult {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        match self {
            Self::View(view) => view.into_response(),
            redirect => match redirect.url() {
                Some(url) => Redirect::to(&url).into_response(),
                None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            },
        }
    }
}
