use std::io;

use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, Response, StatusCode},
    response::{Html, IntoResponse},
    Form,
};
use log::{debug, info};
use serde::Deserialize;

use crate::errors::{StoreError, WikiError};
use crate::types::{AppState, Page};
use crate::utils::{content_type_for, ensure_safe_path, generate_page_id, last_modified_html, normalize_path};
use crate::validator::PageId;

/// Form fields posted by the edit page
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub body: String,
    #[serde(default, rename = "displayTitle")]
    pub display_title: String,
}

/// Run filesystem work off the async workers.
async fn blocking<T, E, F>(work: F) -> Result<T, WikiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<WikiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}

fn found(location: String) -> Response<Body> {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Handle root path requests
pub async fn handle_home(State(state): State<AppState>) -> Result<Html<String>, WikiError> {
    let store = state.store.clone();
    let pages = blocking(move || Ok::<_, StoreError>(store.list())).await?;
    debug!("Home listing {} catalogue records", pages.len());
    Ok(Html(state.templates.render_home(&pages, &generate_page_id())))
}

/// Render a page, or invite the reader to start a new one when the id is unknown.
pub async fn handle_view(
    State(state): State<AppState>,
    PageId(id): PageId,
) -> Result<Response<Body>, WikiError> {
    info!("view '{}'", id);

    let store = state.store.clone();
    let lookup = blocking(move || {
        let page = store.load(&id)?;
        let meta = last_modified_html(&page.page_path);
        Ok::<_, StoreError>((page, meta))
    })
    .await;

    let (page, meta) = match lookup {
        Ok(found_page) => found_page,
        Err(WikiError::Store(StoreError::NotFound { id })) => {
            let fresh = generate_page_id();
            info!("No page '{}', redirecting to new page '{}'", id, fresh);
            return Ok(found(format!("/edit/{fresh}")));
        }
        Err(e) => return Err(e),
    };

    let body_html = state.markdown.render(page.body_bytes());
    let html = state.templates.render_view(&page, &body_html, &meta, &generate_page_id());
    Ok(Html(html).into_response())
}

/// Edit form; never fails on a missing page, it just starts blank.
pub async fn handle_edit(
    State(state): State<AppState>,
    PageId(id): PageId,
) -> Result<Html<String>, WikiError> {
    info!("edit '{}'", id);

    let store = state.store.clone();
    let requested = id.clone();
    let page = match blocking(move || store.load(&requested)).await {
        Ok(page) => page,
        Err(e) => {
            debug!("Editing '{}' from a blank form: {}", id, e);
            Page::blank(&id)
        }
    };

    Ok(Html(state.templates.render_edit(&page)))
}

/// Persist the submitted body, record it in the catalogue, then show it.
pub async fn handle_save(
    State(state): State<AppState>,
    PageId(id): PageId,
    Form(form): Form<SaveForm>,
) -> Result<Response<Body>, WikiError> {
    info!("save '{}' ({} bytes)", id, form.body.len());

    let store = state.store.clone();
    let page = Page {
        page_path: store.derive_path(&id),
        id: id.clone(),
        display_title: form.display_title,
        body: Some(form.body.into_bytes()),
    };

    // body first: a failed body write must not leave a record pointing nowhere
    blocking(move || {
        store.save(&page)?;
        store.append_metadata(&page.id, &page.page_path, &page.display_title)
    })
    .await?;

    Ok(found(format!("/view/{id}")))
}

/// Handle static file requests
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    let normalized = normalize_path(&path);
    ensure_safe_path(&normalized)?;
    let requested = state.static_dir.join(&normalized);

    let content_type = content_type_for(&requested);
    let bytes = blocking(move || match std::fs::read(&requested) {
        Ok(bytes) => Ok(bytes),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::IsADirectory) => {
            debug!("Static asset not found: {:?}", requested);
            Err(WikiError::NotFound)
        }
        Err(e) => Err(WikiError::Io(e)),
    })
    .await?;
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(content_type));
    Ok(resp)
}
